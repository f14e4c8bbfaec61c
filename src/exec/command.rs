// src/exec/command.rs

use std::fmt;

use crate::errors::{Result, WatcherError};

/// The command to run when a change is detected.
///
/// By default the raw string is split on whitespace into a program and its
/// arguments; quotes are not interpreted, so `echo "Hello world"` runs `echo`
/// with the two arguments `"Hello` and `world"`. In shell mode the raw string
/// is handed to `sh -c` (`cmd /C` on Windows) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    raw: String,
    program: String,
    args: Vec<String>,
    shell: bool,
}

impl CommandSpec {
    pub fn parse(raw: &str, shell: bool) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WatcherError::ConfigError(
                "command to execute must not be empty".to_string(),
            ));
        }

        let (program, args) = if shell {
            shell_invocation(trimmed)
        } else {
            let mut parts = trimmed.split_whitespace().map(str::to_string);
            // `trimmed` is non-empty, so there is at least one part.
            let program = parts.next().unwrap_or_default();
            (program, parts.collect())
        };

        Ok(Self {
            raw: trimmed.to_string(),
            program,
            args,
            shell,
        })
    }

    /// A command run as given: no splitting, no shell.
    pub fn from_parts(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let raw = std::iter::once(program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            raw,
            program,
            args,
            shell: false,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_shell(&self) -> bool {
        self.shell
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn shell_invocation(raw: &str) -> (String, Vec<String>) {
    if cfg!(windows) {
        ("cmd".to_string(), vec!["/C".to_string(), raw.to_string()])
    } else {
        ("sh".to_string(), vec!["-c".to_string(), raw.to_string()])
    }
}
