use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use watcher_daemon::errors::{Result, WatcherError};
use watcher_daemon::exec::{CommandBackend, CommandSpec};

/// A fake command backend that:
/// - records every command it was asked to run
/// - tracks how many invocations were in flight at once
/// - optionally takes some time and/or fails.
#[derive(Debug, Default)]
pub struct CountingBackend {
    executed: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    fail: AtomicBool,
    delay: Duration,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation sleeps `delay` before finishing.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Make subsequent invocations fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.executed.lock().unwrap().len()
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Highest number of invocations observed running at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl CommandBackend for CountingBackend {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.executed.lock().unwrap().push(spec.raw().to_string());
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.fail.load(Ordering::SeqCst) {
                Err(WatcherError::CommandExecution {
                    command: spec.raw().to_string(),
                    exit_code: Some(1),
                    reason: "fake failure".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }
}
