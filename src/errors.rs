// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A pattern exclusion rule that is not a valid regular expression.
    ///
    /// Only the collection call that reached the rule fails; the watch loop
    /// logs it and tries again on the next tick.
    #[error("invalid exclusion pattern '{rule}': {source}")]
    InvalidExclusionPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("error collecting files from {path}: {source}")]
    CollectionError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("command '{command}' failed: {reason}")]
    CommandExecution {
        command: String,
        exit_code: Option<i32>,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatcherError>;
