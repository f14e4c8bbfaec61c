// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawWatchConfig, WatchConfig};
use crate::errors::{Result, WatcherError};

/// Load a configuration file from a given path and return the raw
/// `RawWatchConfig`.
///
/// This only performs TOML deserialization; validation happens when the
/// merged layers are turned into a [`WatchConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWatchConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        WatcherError::ConfigError(format!("reading config file {}: {e}", path.display()))
    })?;

    let config: RawWatchConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective configuration.
///
/// - `file`: an explicit config file; it must exist. When `None`, the
///   [`default_config_path`] is used if present and skipped otherwise.
/// - `overrides`: values from the CLI / environment, which win over the file.
///
/// Anything still unset falls back to the built-in defaults.
pub fn load_and_validate(file: Option<&Path>, overrides: RawWatchConfig) -> Result<WatchConfig> {
    let from_file = match file {
        Some(path) => load_from_path(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                debug!(path = %default_path.display(), "loading default config file");
                load_from_path(&default_path)?
            } else {
                RawWatchConfig::default()
            }
        }
    };

    WatchConfig::try_from(from_file.merge(overrides))
}

/// Config file picked up from the working directory when none is given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("WatcherDaemon.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn file_values_are_used() {
        let file = write_config(
            r#"
base_path = "src"
extension = "rs"
excluded = ["target", "src/gen/*"]
frequency = 2
command = "cargo check"
"#,
        );

        let cfg = load_and_validate(Some(file.path()), RawWatchConfig::default()).unwrap();
        assert_eq!(cfg.base_path, PathBuf::from("src"));
        assert_eq!(cfg.extension, ".rs");
        assert_eq!(cfg.exclusions, vec!["target", "src/gen/*"]);
        assert_eq!(cfg.frequency, Duration::from_secs(2));
        assert_eq!(cfg.command.raw(), "cargo check");
    }

    #[test]
    fn overrides_win_over_file() {
        let file = write_config("frequency = 2\ncommand = \"make\"\n");
        let overrides = RawWatchConfig {
            frequency: Some(9),
            ..Default::default()
        };

        let cfg = load_and_validate(Some(file.path()), overrides).unwrap();
        assert_eq!(cfg.frequency, Duration::from_secs(9));
        assert_eq!(cfg.command.raw(), "make");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("frequncy = 2\n");
        let err = load_and_validate(Some(file.path()), RawWatchConfig::default()).unwrap_err();
        assert!(matches!(err, WatcherError::TomlError(_)));
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let err = load_and_validate(
            Some(Path::new("/definitely/not/here/WatcherDaemon.toml")),
            RawWatchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, WatcherError::ConfigError(_)));
    }
}
