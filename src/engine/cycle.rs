// src/engine/cycle.rs

//! One scan cycle: collect, detect, hand a detected change to the command
//! handler.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use crate::engine::context::WatchContext;
use crate::engine::CycleId;
use crate::scan::{completion_channel, detect_change, DetectOutcome};
use crate::types::{ChangeNotice, FileRecord};

/// The file set of one tick together with its cancellation token.
#[derive(Debug)]
pub struct ScanCycle {
    pub id: CycleId,
    pub files: Vec<FileRecord>,
    pub token: CancellationToken,
}

/// What the watch loop keeps for a spawned cycle.
#[derive(Debug)]
pub struct CycleHandle {
    pub id: CycleId,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl CycleHandle {
    /// Cancel the cycle's in-flight file checks.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawn the cycle `id` as its own task.
pub fn spawn_cycle(
    ctx: Arc<WatchContext>,
    id: CycleId,
    token: CancellationToken,
    change_tx: mpsc::Sender<ChangeNotice>,
) -> CycleHandle {
    let handle = tokio::spawn(run_cycle(ctx, id, token.clone(), change_tx).in_current_span());
    CycleHandle { id, token, handle }
}

/// Body of a cycle task.
///
/// Collection failures end the cycle with a warning; the loop tries again on
/// the next tick.
pub async fn run_cycle(
    ctx: Arc<WatchContext>,
    id: CycleId,
    token: CancellationToken,
    change_tx: mpsc::Sender<ChangeNotice>,
) {
    let files = match ctx.collect_files_blocking().await {
        Ok(files) => files,
        Err(err) => {
            warn!(cycle = id, error = %err, "file collection failed; retrying on next tick");
            return;
        }
    };

    let cycle = ScanCycle { id, files, token };
    let (done_tx, done_rx) = completion_channel(cycle.files.len());

    tokio::spawn(forward_result(Arc::clone(&ctx), id, done_rx, change_tx).in_current_span());

    let config = ctx.config();
    let outcome = detect_change(
        cycle.files,
        config.frequency,
        config.check_delay,
        &cycle.token,
        done_tx,
    )
    .await;

    match outcome {
        DetectOutcome::Changed(notice) => {
            debug!(cycle = id, file = %notice.path.display(), "cycle detected a change")
        }
        DetectOutcome::Unchanged => debug!(cycle = id, "no changes detected"),
        DetectOutcome::Cancelled => debug!(cycle = id, "cycle cancelled"),
    }
}

/// Wait for the cycle's completion notice and pass it on to the command
/// handler under the done-signal lock.
///
/// Gives up after twice the scan frequency: such a cycle is stale and
/// triggers nothing. Ends early when the detector finishes without a notice.
pub async fn forward_result(
    ctx: Arc<WatchContext>,
    id: CycleId,
    mut done_rx: mpsc::Receiver<ChangeNotice>,
    change_tx: mpsc::Sender<ChangeNotice>,
) {
    let stale_after = ctx.config().frequency * 2;

    tokio::select! {
        received = done_rx.recv() => {
            let Some(notice) = received else {
                return;
            };
            let _guard = ctx.done_lock().lock().await;
            if change_tx.send(notice).await.is_err() {
                debug!(cycle = id, "command handler gone; dropping change notice");
            }
        }
        _ = tokio::time::sleep(stale_after) => {
            debug!(cycle = id, "stale cycle abandoned without a result");
        }
    }
}
