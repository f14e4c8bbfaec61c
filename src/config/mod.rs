// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the layered data model (`model.rs`).
//! - Load an optional TOML file and merge CLI / environment overrides
//!   (`loader.rs`).
//! - Validate invariants such as a non-zero frequency (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{RawWatchConfig, WatchConfig};
pub use validate::parse_exclusion_list;
