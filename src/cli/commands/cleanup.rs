//! Cleanup command implementation.
//!
//! The `yt-tutorial cleanup` command undoes what a tutorial's step actions
//! created, last step first.

use crate::cli::args::CleanupArgs;
use crate::config::TutorialConfig;
use crate::error::Result;
use crate::tutorial::TutorialEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The cleanup command implementation.
pub struct CleanupCommand {
    config: TutorialConfig,
    args: CleanupArgs,
}

impl CleanupCommand {
    /// Create a new cleanup command.
    pub fn new(config: &TutorialConfig, args: CleanupArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CleanupArgs {
        &self.args
    }
}

#[async_trait::async_trait(?Send)]
impl Command for CleanupCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = TutorialEngine::from_config(&self.config)?;
        let ok = engine.cleanup_module(&self.args.module, ui).await;
        Ok(CommandResult::from_bool(ok))
    }
}
