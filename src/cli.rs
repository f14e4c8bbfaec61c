// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every setting can also come from a `WATCHER_DAEMON_*` environment
//! variable; an explicit flag wins over the variable.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::config::{parse_exclusion_list, RawWatchConfig};
use crate::types::LogLevel;

/// Command-line arguments for `watcher-daemon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watcher-daemon",
    version,
    about = "Poll a directory tree and run a command when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a TOML config file.
    ///
    /// Default: `WatcherDaemon.toml` in the current working directory, if it
    /// exists.
    #[arg(long, env = "WATCHER_DAEMON_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch (default `.`).
    #[arg(long, env = "WATCHER_DAEMON_BASE_PATH", value_name = "PATH")]
    pub base_path: Option<String>,

    /// Extension of the files to watch (default `.go`).
    #[arg(long, env = "WATCHER_DAEMON_EXTENSION", value_name = "EXT")]
    pub extension: Option<String>,

    /// Comma separated exclusion rules. Rules containing any of
    /// `*?{}[]()+` are regular expressions, others match literally.
    #[arg(long, env = "WATCHER_DAEMON_EXCLUDED", value_name = "RULES")]
    pub excluded: Option<String>,

    /// Scan frequency in seconds (default 5).
    #[arg(long, env = "WATCHER_DAEMON_FREQUENCY", value_name = "SECONDS")]
    pub frequency: Option<u64>,

    /// Command to run when a change is detected.
    #[arg(long, env = "WATCHER_DAEMON_COMMAND", value_name = "CMD")]
    pub command: Option<String>,

    /// Run the command through the platform shell (`sh -c`) so quoting works.
    #[arg(
        long,
        env = "WATCHER_DAEMON_SHELL",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub shell: Option<bool>,

    /// Artificial delay before each per-file check, in milliseconds.
    #[arg(long, env = "WATCHER_DAEMON_CHECK_DELAY_MS", value_name = "MS")]
    pub check_delay_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(
        long,
        env = "WATCHER_DAEMON_LOG_LEVEL",
        value_name = "LEVEL",
        value_parser = LogLevel::from_str
    )]
    pub log_level: Option<LogLevel>,

    /// Run a single scan cycle, run the command if something changed, exit.
    #[arg(long)]
    pub once: bool,

    /// Print the effective configuration and the watched files, run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The settings given on the command line or in the environment, as the
    /// top configuration layer.
    pub fn overrides(&self) -> RawWatchConfig {
        RawWatchConfig {
            base_path: self.base_path.clone(),
            extension: self.extension.clone(),
            excluded: self.excluded.as_deref().map(parse_exclusion_list),
            frequency: self.frequency,
            command: self.command.clone(),
            shell: self.shell,
            check_delay_ms: self.check_delay_ms,
            log_level: self.log_level,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
