// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::CommandSpec;
use crate::types::LogLevel;

pub const DEFAULT_BASE_PATH: &str = ".";
pub const DEFAULT_EXTENSION: &str = ".go";
pub const DEFAULT_FREQUENCY_SECS: u64 = 5;
pub const DEFAULT_COMMAND: &str = "echo \"Hello world\"";

/// Unvalidated settings, as read from one configuration layer.
///
/// Every field is optional so layers can be merged: a value set in a higher
/// layer (CLI / environment) wins over the same value from the TOML file,
/// which wins over the built-in default.
///
/// ```toml
/// base_path = "src"
/// extension = ".go"
/// excluded = ["vendor", "src/gen/*"]
/// frequency = 5
/// command = "go build ./..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWatchConfig {
    #[serde(default)]
    pub base_path: Option<String>,

    /// File extension filter, with or without the leading dot.
    #[serde(default)]
    pub extension: Option<String>,

    /// Exclusion rules, literal or pattern.
    #[serde(default)]
    pub excluded: Option<Vec<String>>,

    /// Scan frequency in whole seconds.
    #[serde(default)]
    pub frequency: Option<u64>,

    #[serde(default)]
    pub command: Option<String>,

    /// Run the command through the platform shell instead of splitting it.
    #[serde(default)]
    pub shell: Option<bool>,

    /// Artificial latency before each per-file check, in milliseconds.
    #[serde(default)]
    pub check_delay_ms: Option<u64>,

    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl RawWatchConfig {
    /// Overlay `over` on top of `self`: fields set in `over` win.
    pub fn merge(self, over: RawWatchConfig) -> RawWatchConfig {
        RawWatchConfig {
            base_path: over.base_path.or(self.base_path),
            extension: over.extension.or(self.extension),
            excluded: over.excluded.or(self.excluded),
            frequency: over.frequency.or(self.frequency),
            command: over.command.or(self.command),
            shell: over.shell.or(self.shell),
            check_delay_ms: over.check_delay_ms.or(self.check_delay_ms),
            log_level: over.log_level.or(self.log_level),
        }
    }
}

/// Validated watcher settings. Built once at startup and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub base_path: PathBuf,
    /// Always starts with `.` (e.g. `".go"`).
    pub extension: String,
    /// Non-empty rules in configured order.
    pub exclusions: Vec<String>,
    /// Scan cadence and width of the change window. Never zero.
    pub frequency: Duration,
    pub command: CommandSpec,
    pub check_delay: Duration,
    pub log_level: LogLevel,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            extension: DEFAULT_EXTENSION.to_string(),
            exclusions: Vec::new(),
            frequency: Duration::from_secs(DEFAULT_FREQUENCY_SECS),
            command: default_command(),
            check_delay: Duration::ZERO,
            log_level: LogLevel::default(),
        }
    }
}

/// [`DEFAULT_COMMAND`], already split.
fn default_command() -> CommandSpec {
    CommandSpec::from_parts("echo", vec!["\"Hello".to_string(), "world\"".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_the_split_default_string() {
        let spec = default_command();
        assert_eq!(spec.raw(), DEFAULT_COMMAND);
        assert_eq!(spec, CommandSpec::parse(DEFAULT_COMMAND, false).unwrap());
    }

    #[test]
    fn later_layer_wins_on_merge() {
        let file = RawWatchConfig {
            frequency: Some(10),
            command: Some("make".to_string()),
            ..RawWatchConfig::default()
        };
        let cli = RawWatchConfig {
            frequency: Some(2),
            ..RawWatchConfig::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.frequency, Some(2));
        assert_eq!(merged.command.as_deref(), Some("make"));
    }
}
