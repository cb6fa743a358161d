//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use async_trait::async_trait;

use crate::cli::args::{Cli, Commands, ListArgs};
use crate::config::TutorialConfig;
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
/// Commands drive the UI across await points, so their futures are not `Send`.
#[async_trait(?Send)]
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success or exit code 1.
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: TutorialConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for a loaded configuration.
    pub fn new(config: TutorialConfig) -> Self {
        Self { config }
    }

    /// Get the configuration commands run with.
    pub fn config(&self) -> &TutorialConfig {
        &self.config
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub async fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(&self.config, args.clone());
                cmd.execute(ui).await
            }
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(&self.config, args.clone());
                cmd.execute(ui).await
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.config, args.clone());
                cmd.execute(ui).await
            }
            Some(Commands::Reset(args)) => {
                let cmd = super::reset::ResetCommand::new(&self.config, args.clone());
                cmd.execute(ui).await
            }
            Some(Commands::Cleanup(args)) => {
                let cmd = super::cleanup::CleanupCommand::new(&self.config, args.clone());
                cmd.execute(ui).await
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui).await
            }
            None => {
                // Default to listing the available tutorials
                let cmd = super::list::ListCommand::new(&self.config, ListArgs::default());
                cmd.execute(ui).await
            }
        }
    }
}
