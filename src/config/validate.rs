// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    RawWatchConfig, WatchConfig, DEFAULT_BASE_PATH, DEFAULT_COMMAND, DEFAULT_EXTENSION,
    DEFAULT_FREQUENCY_SECS,
};
use crate::errors::{Result, WatcherError};
use crate::exec::CommandSpec;

impl TryFrom<RawWatchConfig> for WatchConfig {
    type Error = WatcherError;

    fn try_from(raw: RawWatchConfig) -> std::result::Result<Self, Self::Error> {
        let base_path = validate_base_path(raw.base_path.as_deref())?;
        let extension = validate_extension(raw.extension.as_deref())?;
        let frequency = validate_frequency(raw.frequency)?;
        let command = CommandSpec::parse(
            raw.command.as_deref().unwrap_or(DEFAULT_COMMAND),
            raw.shell.unwrap_or(false),
        )?;

        Ok(WatchConfig {
            base_path,
            extension,
            exclusions: normalize_exclusions(raw.excluded.unwrap_or_default()),
            frequency,
            command,
            check_delay: Duration::from_millis(raw.check_delay_ms.unwrap_or(0)),
            log_level: raw.log_level.unwrap_or_default(),
        })
    }
}

fn validate_base_path(raw: Option<&str>) -> Result<PathBuf> {
    let path = raw.unwrap_or(DEFAULT_BASE_PATH).trim();
    if path.is_empty() {
        return Err(WatcherError::ConfigError(
            "base path must not be empty".to_string(),
        ));
    }
    Ok(PathBuf::from(path))
}

fn validate_extension(raw: Option<&str>) -> Result<String> {
    let ext = raw.unwrap_or(DEFAULT_EXTENSION).trim();
    if ext.is_empty() || ext == "." {
        return Err(WatcherError::ConfigError(
            "file extension filter must not be empty".to_string(),
        ));
    }
    if ext.starts_with('.') {
        Ok(ext.to_string())
    } else {
        Ok(format!(".{ext}"))
    }
}

fn validate_frequency(raw: Option<u64>) -> Result<Duration> {
    let secs = raw.unwrap_or(DEFAULT_FREQUENCY_SECS);
    if secs == 0 {
        return Err(WatcherError::ConfigError(
            "frequency must be >= 1 second (got 0)".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn normalize_exclusions(rules: Vec<String>) -> Vec<String> {
    rules
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Split a comma separated rule list (`"a,b, c"`), dropping empty entries.
pub fn parse_exclusion_list(csv: &str) -> Vec<String> {
    normalize_exclusions(csv.split(',').map(str::to_string).collect())
}
