//! List command implementation.
//!
//! The `yt-tutorial list` command lists tutorials with their progress.

use crate::cli::args::ListArgs;
use crate::config::TutorialConfig;
use crate::error::Result;
use crate::tutorial::{ModuleStatus, TutorialEngine};
use crate::ui::{Table, TutorialTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    config: TutorialConfig,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(config: &TutorialConfig, args: ListArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

/// Status cell styled by state.
pub(crate) fn styled_status(theme: &TutorialTheme, status: ModuleStatus) -> String {
    let style = match status {
        ModuleStatus::Completed => &theme.success,
        ModuleStatus::InProgress => &theme.warning,
        ModuleStatus::NotStarted => &theme.dim,
    };
    style.apply_to(status.to_string()).to_string()
}

#[async_trait::async_trait(?Send)]
impl Command for ListCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = TutorialEngine::from_config(&self.config)?;
        let summaries = engine.module_summaries();

        if self.args.ids {
            for summary in &summaries {
                ui.message(&summary.module_id);
            }
            return Ok(CommandResult::success());
        }

        if summaries.is_empty() {
            ui.message("No tutorials available");
            return Ok(CommandResult::success());
        }

        let theme = TutorialTheme::detect();
        let mut table = Table::new(&["Module", "Title", "Steps", "Status"]);
        for summary in &summaries {
            table.add_row([
                theme.highlight.apply_to(&summary.module_id).to_string(),
                summary.title.clone(),
                summary.step_count.to_string(),
                styled_status(&theme, summary.status),
            ]);
        }

        ui.message(&table.render());
        ui.show_hint(&format!(
            "Start one with {}",
            theme.command.apply_to("yt-tutorial run <module>")
        ));

        Ok(CommandResult::success())
    }
}
