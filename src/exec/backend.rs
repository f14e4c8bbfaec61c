// src/exec/backend.rs

//! Pluggable command backend abstraction.
//!
//! The runner talks to a `CommandBackend` instead of spawning processes
//! itself. Production code uses [`ProcessBackend`]; tests can substitute a
//! backend that records invocations without starting real processes.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, WatcherError};
use crate::exec::command::CommandSpec;

/// Trait abstracting how the configured command is executed.
pub trait CommandBackend: Send + Sync {
    /// Run the command to completion.
    ///
    /// Returns `WatcherError::CommandExecution` if the command could not be
    /// launched or exited unsuccessfully.
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Real backend: spawns the program with inherited stdout/stderr and waits
/// for it to exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessBackend;

impl CommandBackend for ProcessBackend {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            debug!(program = %spec.program(), args = ?spec.args(), "spawning command process");

            let status = Command::new(spec.program())
                .args(spec.args())
                .stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true)
                .status()
                .await
                .map_err(|e| WatcherError::CommandExecution {
                    command: spec.raw().to_string(),
                    exit_code: None,
                    reason: format!("failed to launch: {e}"),
                })?;

            if status.success() {
                Ok(())
            } else {
                Err(WatcherError::CommandExecution {
                    command: spec.raw().to_string(),
                    exit_code: status.code(),
                    reason: format!("process exited with {status}"),
                })
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_process_is_ok() {
        let spec = CommandSpec::parse("true", false).unwrap();
        ProcessBackend.run(&spec).await.unwrap();
    }

    #[tokio::test]
    async fn nonzero_exit_reports_code() {
        let spec = CommandSpec::parse("exit 3", true).unwrap();
        let err = ProcessBackend.run(&spec).await.unwrap_err();
        match err {
            WatcherError::CommandExecution { exit_code, .. } => assert_eq!(exit_code, Some(3)),
            other => panic!("expected CommandExecution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_launch_failure() {
        let spec = CommandSpec::parse("watcher-daemon-no-such-program --flag", false).unwrap();
        let err = ProcessBackend.run(&spec).await.unwrap_err();
        match err {
            WatcherError::CommandExecution {
                exit_code, reason, ..
            } => {
                assert_eq!(exit_code, None);
                assert!(reason.contains("failed to launch"));
            }
            other => panic!("expected CommandExecution, got {other:?}"),
        }
    }
}
