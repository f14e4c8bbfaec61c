// src/engine/mod.rs

//! Orchestration engine for the watcher.
//!
//! This module ties together:
//! - the shared [`WatchContext`] (config, filesystem, exclusion rules, locks)
//! - scan cycles, one per timer tick ([`cycle`])
//! - the watch loop that reacts to:
//!   - timer ticks
//!   - command failures (cancelling the current cycle)
//!   - shutdown signals
//!
//! The loop itself is implemented in [`runtime`].

use crate::types::ChangeNotice;

/// Monotonic number of a scan cycle within one run.
pub type CycleId = u64;

/// Sent by the command handler when the command failed; the loop cancels
/// the current cycle on receipt.
#[derive(Debug, Clone)]
pub struct CycleCancel {
    pub reason: String,
}

/// Summary of a foreground cycle (`--once`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub files_scanned: usize,
    /// The file that triggered the command, if any.
    pub changed: Option<ChangeNotice>,
}

pub mod context;
pub mod cycle;
pub mod runtime;
pub mod signals;

pub use context::WatchContext;
pub use cycle::{CycleHandle, ScanCycle};
pub use runtime::WatchLoop;
pub use signals::shutdown_signal;
