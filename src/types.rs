use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use serde::Deserialize;

/// One file discovered during a scan cycle.
///
/// Records are rebuilt from scratch on every cycle and never mutated; no
/// identity survives from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as joined from the configured base path
    /// (e.g. `fixtures/basepath/subdir1/test.go`).
    pub path: PathBuf,
    /// Final path component (e.g. `test.go`).
    pub name: String,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            modified,
        }
    }

    /// The path with forward slashes, as matched by exclusion rules.
    pub fn path_str(&self) -> String {
        slash_path(&self.path)
    }

    /// Whether the file was modified after `cutoff`.
    pub fn modified_after(&self, cutoff: SystemTime) -> bool {
        self.modified > cutoff
    }
}

/// Notification emitted by the change detector for the first changed file of
/// a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub path: PathBuf,
    pub name: String,
    pub modified: SystemTime,
}

impl From<&FileRecord> for ChangeNotice {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.clone(),
            name: record.name.clone(),
            modified: record.modified,
        }
    }
}

/// Log verbosity, shared by the CLI and the config file.
///
/// The CLI parses it through [`FromStr`] (case-insensitive, `warning` is
/// accepted for `warn`); the config file through serde with the same alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[serde(alias = "warning")]
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

/// Render a path with forward slashes regardless of platform.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
