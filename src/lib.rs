//! yt-tutorial - Interactive, resumable tutorials for the yt CLI.
//!
//! Tutorials are modules of ordered steps. Each step explains a yt command,
//! may run an action to check the user's setup, and ends with a menu for
//! moving on, repeating, running the example or quitting. Progress is kept
//! in a JSON file so a module resumes where it was left.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration discovery and loading
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Shell command execution
//! - [`tutorial`] - Steps, modules, progress and the tutorial engine
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use yt_tutorial::tutorial::CommandExecutor;
//!
//! let executor = CommandExecutor::new();
//! assert!(executor.is_command_allowed("yt issues list --project DEMO"));
//! assert!(!executor.is_command_allowed("rm -rf /"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod tutorial;
pub mod ui;

pub use error::{Result, TutorialError};
