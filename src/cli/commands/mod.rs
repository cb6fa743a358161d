//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command builds what it needs
//! from the loaded [`TutorialConfig`](crate::config::TutorialConfig), so
//! `--config` and `--progress-file` apply uniformly.

pub mod cleanup;
pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod reset;
pub mod run;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
