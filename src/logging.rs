// src/logging.rs

//! Logging setup for `watcher-daemon` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `WATCHER_DAEMON_LOG_LEVEL` environment variable
//! 3. `log_level` in the config file
//! 4. default to `info`
//!
//! Logs are written to STDOUT, interleaved with the output of the watched
//! command.

use anyhow::{anyhow, Result};
use tracing_subscriber::fmt;

use crate::types::LogLevel;

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup; a second call returns an error.
pub fn init_logging(level: LogLevel) -> Result<()> {
    fmt()
        .with_max_level(tracing_level(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

pub fn tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}
