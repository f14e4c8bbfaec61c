// src/scan/detector.rs

//! Per-cycle change detection with first-change-wins semantics.

use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::scan::group::TaskGroup;
use crate::types::{ChangeNotice, FileRecord};

/// Result of checking a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Changed(ChangeNotice),
    Unchanged,
}

/// How a detector run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectOutcome {
    /// A changed file was found and its notice delivered.
    Changed(ChangeNotice),
    /// Every file was checked and none changed.
    Unchanged,
    /// The cycle was cancelled before a verdict.
    Cancelled,
}

/// Create the completion channel for a cycle over `file_count` files.
///
/// The channel is sized to the file count so any producer can always deliver
/// without blocking, even after the receiving side has stopped listening.
pub fn completion_channel(
    file_count: usize,
) -> (mpsc::Sender<ChangeNotice>, mpsc::Receiver<ChangeNotice>) {
    mpsc::channel(file_count.max(1))
}

/// Lower bound of the change window ending now.
pub fn cutoff(window: Duration) -> SystemTime {
    SystemTime::now()
        .checked_sub(window)
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Check one file: wait `check_delay`, then compare its modification time
/// against `now - window`.
pub async fn check_file(file: FileRecord, window: Duration, check_delay: Duration) -> CheckOutcome {
    if !check_delay.is_zero() {
        tokio::time::sleep(check_delay).await;
    }

    if file.modified_after(cutoff(window)) {
        CheckOutcome::Changed(ChangeNotice::from(&file))
    } else {
        CheckOutcome::Unchanged
    }
}

/// Decide whether any of `files` changed within the last `window`.
///
/// Files are considered in order. Each one is checked by its own task in a
/// [`TaskGroup`] and the detector waits for that task's verdict before
/// launching the next. The first changed file produces exactly one notice on
/// `done_tx` and ends the run; nothing is sent when no file changed or when
/// `cancel` fires first. All tasks are joined before returning.
pub async fn detect_change(
    files: Vec<FileRecord>,
    window: Duration,
    check_delay: Duration,
    cancel: &CancellationToken,
    done_tx: mpsc::Sender<ChangeNotice>,
) -> DetectOutcome {
    let total = files.len();
    let mut group = TaskGroup::new(cancel);
    let mut outcome = DetectOutcome::Unchanged;

    for (idx, file) in files.into_iter().enumerate() {
        if group.is_cancelled() {
            outcome = DetectOutcome::Cancelled;
            break;
        }

        debug!(file = %file.path_str(), idx, total, "checking file");
        group.spawn(check_file(file, window, check_delay));

        match group.join_next().await {
            Some(CheckOutcome::Changed(notice)) => {
                info!(file = %notice.path.display(), "file has changed");
                if let Err(err) = done_tx.try_send(notice.clone()) {
                    debug!(error = %err, "completion channel no longer accepting notices");
                }
                outcome = DetectOutcome::Changed(notice);
                break;
            }
            Some(CheckOutcome::Unchanged) => continue,
            None => {
                outcome = DetectOutcome::Cancelled;
                break;
            }
        }
    }

    let drained = group.drain().await;
    if drained > 0 {
        debug!(drained, "abandoned pending file checks");
    }

    outcome
}
