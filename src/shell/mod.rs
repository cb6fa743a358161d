//! Shell command execution.

pub mod command;
pub mod platform;

pub use command::{execute, execute_async, execute_check, CommandOptions, CommandResult};
pub use platform::{is_ci, shell_flag, shell_program};
