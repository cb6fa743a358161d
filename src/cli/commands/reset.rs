//! Reset command implementation.
//!
//! The `yt-tutorial reset` command forgets stored progress.

use crate::cli::args::ResetArgs;
use crate::config::TutorialConfig;
use crate::error::Result;
use crate::tutorial::ProgressTracker;
use crate::ui::{confirm, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Prompt key for confirming `reset --all`.
pub const RESET_ALL_PROMPT_KEY: &str = "reset_all";

/// The reset command implementation.
pub struct ResetCommand {
    config: TutorialConfig,
    args: ResetArgs,
}

impl ResetCommand {
    /// Create a new reset command.
    pub fn new(config: &TutorialConfig, args: ResetArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ResetArgs {
        &self.args
    }

    fn reset_all(&self, tracker: &mut ProgressTracker, ui: &mut dyn UserInterface) -> CommandResult {
        let tracked = tracker.get_all_progress().len();
        if tracked == 0 {
            ui.message("No tutorial progress to reset");
            return CommandResult::success();
        }

        if ui.is_interactive()
            && !confirm(
                ui,
                RESET_ALL_PROMPT_KEY,
                &format!("Forget progress for {} tutorial(s)?", tracked),
                false,
            )
        {
            ui.message("Reset cancelled");
            return CommandResult::success();
        }

        let removed = tracker.reset_all();
        ui.success(&format!("Reset progress for {} tutorial(s)", removed));
        CommandResult::success()
    }
}

#[async_trait::async_trait(?Send)]
impl Command for ResetCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut tracker = ProgressTracker::new(self.config.progress_path());

        if self.args.all {
            return Ok(self.reset_all(&mut tracker, ui));
        }

        let Some(module_id) = self.args.module.as_deref() else {
            ui.error("Name a tutorial to reset, or pass --all");
            return Ok(CommandResult::failure(2));
        };

        if tracker.reset_progress(module_id) {
            ui.success(&format!("Reset progress for '{}'", module_id));
            Ok(CommandResult::success())
        } else {
            ui.error(&format!("No progress recorded for '{}'", module_id));
            ui.show_hint("See `yt-tutorial status` for tracked tutorials");
            Ok(CommandResult::failure(1))
        }
    }
}
