//! Run command implementation.
//!
//! The `yt-tutorial run` command walks through one tutorial module.

use crate::cli::args::RunArgs;
use crate::config::TutorialConfig;
use crate::error::Result;
use crate::tutorial::TutorialEngine;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    config: TutorialConfig,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config: &TutorialConfig, args: RunArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

#[async_trait::async_trait(?Send)]
impl Command for RunCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut engine = TutorialEngine::from_config(&self.config)?;

        let completed = engine
            .run_module(&self.args.module, self.args.step, ui)
            .await;

        Ok(CommandResult::from_bool(completed))
    }
}
