// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::engine::context::WatchContext;
use crate::engine::cycle::{spawn_cycle, CycleHandle};
use crate::engine::{CycleCancel, CycleId, CycleReport};
use crate::errors::Result;
use crate::scan::{completion_channel, detect_change, DetectOutcome};
use crate::types::{slash_path, ChangeNotice};

/// Drives scan cycles on a timer and runs the command when a cycle reports a
/// change.
///
/// Tasks involved:
/// - the loop itself: ticker, cycle bookkeeping, cancellation notices,
///   shutdown;
/// - one command handler: receives change notices, runs the command, reports
///   failures back to the loop;
/// - one task per cycle (plus its result forwarder and file checks).
pub struct WatchLoop {
    ctx: Arc<WatchContext>,
}

impl fmt::Debug for WatchLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl WatchLoop {
    pub fn new(ctx: Arc<WatchContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<WatchContext> {
        &self.ctx
    }

    /// Watch until `shutdown` resolves.
    ///
    /// The first scan happens one frequency period after start. Collection
    /// and command failures are logged and never end the loop.
    pub async fn run<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send,
    {
        let span = self.span();
        self.run_inner(shutdown).instrument(span).await
    }

    async fn run_inner<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send,
    {
        info!("starting the watcher daemon");
        self.warn_invalid_rules();

        let (change_tx, change_rx) = mpsc::channel::<ChangeNotice>(1);
        let (cancel_tx, mut cancel_rx) = mpsc::channel::<CycleCancel>(8);
        let root = CancellationToken::new();

        let handler = tokio::spawn(
            handle_changes(Arc::clone(&self.ctx), change_rx, cancel_tx).in_current_span(),
        );

        let frequency = self.ctx.config().frequency;
        let mut ticker = interval_at(Instant::now() + frequency, frequency);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        let mut current: Option<CycleHandle> = None;
        let mut next_id: CycleId = 0;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutdown requested; stopping the watcher");
                    break;
                }

                Some(notice) = cancel_rx.recv() => {
                    match &current {
                        Some(cycle) if !cycle.is_cancelled() => {
                            warn!(cycle = cycle.id, reason = %notice.reason, "cancelling current scan cycle");
                            cycle.cancel();
                        }
                        _ => debug!(reason = %notice.reason, "no active scan cycle to cancel"),
                    }
                }

                _ = ticker.tick() => {
                    // The new tick supersedes whatever the previous cycle
                    // still has in flight.
                    if let Some(previous) = current.take() {
                        if !previous.is_finished() {
                            debug!(cycle = previous.id, "superseding unfinished scan cycle");
                        }
                        previous.cancel();
                    }

                    next_id += 1;
                    debug!(cycle = next_id, "starting scan cycle");
                    current = Some(spawn_cycle(
                        Arc::clone(&self.ctx),
                        next_id,
                        root.child_token(),
                        change_tx.clone(),
                    ));
                }
            }
        }

        root.cancel();
        handler.abort();
        Ok(())
    }

    /// Run a single cycle in the foreground: collect, detect, and run the
    /// command if a file changed within the last frequency period.
    pub async fn run_once(&self) -> Result<CycleReport> {
        let files = self.ctx.collect_files_blocking().await?;
        let files_scanned = files.len();

        let config = self.ctx.config();
        let token = CancellationToken::new();
        let (done_tx, _done_rx) = completion_channel(files_scanned);
        let outcome = detect_change(
            files,
            config.frequency,
            config.check_delay,
            &token,
            done_tx,
        )
        .await;

        let changed = match outcome {
            DetectOutcome::Changed(notice) => Some(notice),
            DetectOutcome::Unchanged | DetectOutcome::Cancelled => None,
        };

        if let Some(notice) = &changed {
            info!(file = %notice.path.display(), "change detected; running command");
            self.ctx.run_command().await?;
            info!("command completed successfully");
        } else {
            info!(files_scanned, "no changes detected");
        }

        Ok(CycleReport {
            files_scanned,
            changed,
        })
    }

    fn span(&self) -> tracing::Span {
        let config = self.ctx.config();
        info_span!(
            "watcher",
            base_dir = %slash_path(&config.base_path),
            frequency = ?config.frequency,
            excluded = ?config.exclusions,
            extension = %config.extension,
        )
    }

    fn warn_invalid_rules(&self) {
        for (rule, err) in self.ctx.matcher().invalid_rules() {
            warn!(
                rule,
                error = %err,
                "exclusion pattern does not compile; every scan will fail until it is fixed"
            );
        }
    }
}

/// Command handler: run the command for every change notice, and tell the
/// loop to cancel the current cycle when the command fails.
async fn handle_changes(
    ctx: Arc<WatchContext>,
    mut change_rx: mpsc::Receiver<ChangeNotice>,
    cancel_tx: mpsc::Sender<CycleCancel>,
) {
    while let Some(notice) = change_rx.recv().await {
        info!(file = %notice.path.display(), "change detected; running command");

        match ctx.run_command().await {
            Ok(()) => info!("command completed successfully"),
            Err(err) => {
                error!(error = %err, "error occurred running command after file change");
                let cancel = CycleCancel {
                    reason: err.to_string(),
                };
                if cancel_tx.send(cancel).await.is_err() {
                    debug!("watch loop gone; command handler exiting");
                    break;
                }
            }
        }
    }
    debug!("command handler finished");
}
