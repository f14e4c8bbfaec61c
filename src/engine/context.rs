// src/engine/context.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::WatchConfig;
use crate::errors::{Result, WatcherError};
use crate::exec::{CommandBackend, CommandRunner, ProcessBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::scan::{collect_files, ExclusionMatcher};
use crate::types::FileRecord;

/// Everything the watch loop and its tasks share, built once at startup.
///
/// Holds the validated configuration, the filesystem handle, the compiled
/// exclusion rules, the command runner (which owns the command-execution
/// lock) and the done-signal lock that serializes hand-over of detected
/// changes to the command handler.
pub struct WatchContext {
    config: WatchConfig,
    fs: Arc<dyn FileSystem>,
    matcher: ExclusionMatcher,
    runner: CommandRunner,
    done_lock: Mutex<()>,
}

impl fmt::Debug for WatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchContext")
            .field("config", &self.config)
            .field("fs", &self.fs)
            .field("matcher", &self.matcher)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl WatchContext {
    pub fn new(
        config: WatchConfig,
        fs: Arc<dyn FileSystem>,
        backend: Arc<dyn CommandBackend>,
    ) -> Self {
        let matcher = ExclusionMatcher::new(&config.exclusions);
        Self {
            config,
            fs,
            matcher,
            runner: CommandRunner::new(backend),
            done_lock: Mutex::new(()),
        }
    }

    /// Context backed by the real filesystem and real processes.
    pub fn production(config: WatchConfig) -> Self {
        Self::new(config, Arc::new(RealFileSystem), Arc::new(ProcessBackend))
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn matcher(&self) -> &ExclusionMatcher {
        &self.matcher
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    pub fn done_lock(&self) -> &Mutex<()> {
        &self.done_lock
    }

    /// Collect the candidate files for a new cycle.
    pub fn collect_files(&self) -> Result<Vec<FileRecord>> {
        collect_files(self.fs.as_ref(), &self.config, &self.matcher)
    }

    /// [`collect_files`](Self::collect_files) on the blocking thread pool.
    pub async fn collect_files_blocking(self: &Arc<Self>) -> Result<Vec<FileRecord>> {
        let ctx = Arc::clone(self);
        tokio::task::spawn_blocking(move || ctx.collect_files())
            .await
            .map_err(|e| {
                WatcherError::Other(anyhow::Error::new(e).context("file collection task failed"))
            })?
    }

    /// Run the configured command under the command-execution lock.
    pub async fn run_command(&self) -> Result<()> {
        self.runner.run(&self.config.command).await
    }
}
