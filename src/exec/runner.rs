// src/exec/runner.rs

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::backend::CommandBackend;
use crate::exec::command::CommandSpec;

/// Runs the configured command, one invocation at a time.
///
/// Every call goes through the command-execution lock, so concurrent
/// triggers queue up behind the running process instead of overlapping.
pub struct CommandRunner {
    backend: Arc<dyn CommandBackend>,
    lock: Mutex<()>,
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl CommandRunner {
    pub fn new(backend: Arc<dyn CommandBackend>) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    /// Whether a command is currently running.
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    pub async fn run(&self, spec: &CommandSpec) -> Result<()> {
        let _guard = self.lock.lock().await;
        info!(cmd = %spec, "running command");

        let started = Instant::now();
        let result = self.backend.run(spec).await;
        debug!(
            cmd = %spec,
            elapsed_ms = started.elapsed().as_millis() as u64,
            success = result.is_ok(),
            "command finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct OverlapProbe {
        active: AtomicUsize,
        max_active: AtomicUsize,
        calls: AtomicUsize,
    }

    impl CommandBackend for OverlapProbe {
        fn run<'a>(
            &'a self,
            _spec: &'a CommandSpec,
        ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
            Box::pin(async move {
                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(15)).await;
                self.active.fetch_sub(1, Ordering::SeqCst);
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_runs_never_overlap() {
        let probe = Arc::new(OverlapProbe::default());
        let runner = Arc::new(CommandRunner::new(probe.clone()));
        let spec = CommandSpec::parse("make build", false).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let runner = Arc::clone(&runner);
            let spec = spec.clone();
            handles.push(tokio::spawn(async move { runner.run(&spec).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(probe.calls.load(Ordering::SeqCst), 8);
        assert_eq!(probe.max_active.load(Ordering::SeqCst), 1);
        assert!(!runner.is_busy());
    }
}
