//! Command-line interface for yt-tutorial.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CleanupArgs, Cli, Commands, CompletionsArgs, ListArgs, ResetArgs, RunArgs, StatusArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
