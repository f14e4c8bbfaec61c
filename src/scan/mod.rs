// src/scan/mod.rs

//! Polling scan: which files to look at, and whether any of them changed.
//!
//! - [`exclusion`] classifies and evaluates exclusion rules.
//! - [`collector`] walks the base path and builds the cycle's file set.
//! - [`detector`] checks the file set against the change window.
//! - [`group`] is the cancellable task group the detector runs its checks in.
//!
//! Nothing here keeps state between cycles; change detection is always
//! relative to `now - frequency`.

pub mod collector;
pub mod detector;
pub mod exclusion;
pub mod group;

pub use collector::{collect_files, file_extension};
pub use detector::{completion_channel, detect_change, CheckOutcome, DetectOutcome};
pub use exclusion::{ExclusionMatcher, ExclusionRule};
pub use group::TaskGroup;
