//! Status command implementation.
//!
//! The `yt-tutorial status` command shows completion across all tutorials.

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::config::TutorialConfig;
use crate::error::{Result, TutorialError};
use crate::tutorial::{CompletionStats, ModuleStatus, ModuleSummary, TutorialEngine};
use crate::ui::progress::completion_bar;
use crate::ui::{format_relative_time, Table, TutorialTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::list::styled_status;

const BAR_WIDTH: usize = 10;

#[derive(Serialize)]
struct StatusReport<'a> {
    stats: CompletionStats,
    modules: &'a [ModuleSummary],
}

/// The status command implementation.
pub struct StatusCommand {
    config: TutorialConfig,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(config: &TutorialConfig, args: StatusArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

fn last_activity(summary: &ModuleSummary) -> String {
    summary
        .progress
        .as_ref()
        .and_then(|p| p.completed_at.or(p.started_at))
        .map(format_relative_time)
        .unwrap_or_else(|| "-".to_string())
}

#[async_trait::async_trait(?Send)]
impl Command for StatusCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = TutorialEngine::from_config(&self.config)?;
        let summaries = engine.module_summaries();
        let stats = engine.tracker().get_completion_stats();

        if self.args.json {
            let report = StatusReport {
                stats,
                modules: &summaries,
            };
            ui.message(
                &serde_json::to_string_pretty(&report)
                    .map_err(|e| TutorialError::Other(e.into()))?,
            );
            return Ok(CommandResult::success());
        }

        let theme = TutorialTheme::detect();
        ui.show_header("Tutorial progress");

        let mut table = Table::new(&["Module", "Progress", "Status", "Last activity"]);
        for summary in &summaries {
            let done = summary
                .progress
                .as_ref()
                .map(|p| p.completed_steps.len())
                .unwrap_or(0);
            table.add_row([
                theme.highlight.apply_to(&summary.module_id).to_string(),
                format!(
                    "{} {}/{}",
                    completion_bar(done, summary.step_count, BAR_WIDTH),
                    done,
                    summary.step_count
                ),
                styled_status(&theme, summary.status),
                last_activity(summary),
            ]);
        }
        ui.message(&table.render());

        let count = |status: ModuleStatus| summaries.iter().filter(|s| s.status == status).count();
        ui.message(&format!(
            "{} completed, {} in progress, {} not started",
            count(ModuleStatus::Completed),
            count(ModuleStatus::InProgress),
            count(ModuleStatus::NotStarted)
        ));

        if let Some(next) = summaries
            .iter()
            .find(|s| s.status == ModuleStatus::InProgress)
        {
            ui.show_hint(&format!(
                "Continue with {}",
                theme
                    .command
                    .apply_to(format!("yt-tutorial run {}", next.module_id))
            ));
        }

        Ok(CommandResult::success())
    }
}
