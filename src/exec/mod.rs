// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] parses the configured command string into a `CommandSpec`.
//! - [`backend`] provides the `CommandBackend` trait and the production
//!   `ProcessBackend`, which tests can replace with a fake.
//! - [`runner`] serializes invocations behind the command-execution lock.

pub mod backend;
pub mod command;
pub mod runner;

pub use backend::{CommandBackend, ProcessBackend};
pub use command::CommandSpec;
pub use runner::CommandRunner;
