// src/scan/group.rs

//! Cancellable task group used by the change detector.
//!
//! A `TaskGroup` couples a Tokio `JoinSet` with a child `CancellationToken`:
//! members race their work against the token, the first report is handed to
//! the caller, and whatever is still running when the caller is done is
//! cancelled and joined by [`TaskGroup::drain`]. No member outlives the
//! group; dropping the group aborts anything left.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub struct TaskGroup<T> {
    set: JoinSet<Option<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Create a group whose token is a child of `parent`, so cancelling the
    /// parent (e.g. the scan cycle) cancels every member.
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            set: JoinSet::new(),
            token: parent.child_token(),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Number of members not yet joined.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawn a member. If the group is cancelled before `fut` completes, the
    /// member finishes without a report.
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let token = self.token.clone();
        self.set.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                out = fut => Some(out),
            }
        });
    }

    /// Wait for the next member report.
    ///
    /// Returns `None` once the group is cancelled or has no members left.
    /// Members that panicked are logged and skipped.
    pub async fn join_next(&mut self) -> Option<T> {
        loop {
            let joined = tokio::select! {
                biased;
                _ = self.token.cancelled() => return None,
                joined = self.set.join_next() => joined,
            };

            match joined {
                None => return None,
                Some(Ok(Some(report))) => return Some(report),
                Some(Ok(None)) => continue,
                Some(Err(err)) => {
                    warn!(error = %err, "scan task failed");
                    continue;
                }
            }
        }
    }

    /// Signal every member to stop.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel the remaining members and wait for all of them to finish.
    ///
    /// Returns how many members were still pending.
    pub async fn drain(&mut self) -> usize {
        self.token.cancel();
        let mut drained = 0;
        while let Some(res) = self.set.join_next().await {
            if let Err(err) = res {
                if err.is_panic() {
                    warn!(error = %err, "scan task panicked while draining");
                }
            }
            drained += 1;
        }
        drained
    }
}
