//! The tutorial engine.
//!
//! [`TutorialEngine`] owns the module registry, the progress tracker and the
//! command executor, and drives one module at a time through its steps:
//!
//! 1. show the step
//! 2. run its action, if it has one, and decide success
//! 3. ask where to go next
//! 4. apply the transition and persist progress
//!
//! The loop ends when the cursor walks past the last step (completed) or the
//! user quits (not completed, resumable).

use chrono::Utc;
use serde::Serialize;
use std::fmt;

use crate::config::TutorialConfig;
use crate::error::{Result, TutorialError};
use crate::ui::UserInterface;

use super::builtin::builtin_modules;
use super::display::{show_module_intro, show_step};
use super::executor::CommandExecutor;
use super::module::TutorialModule;
use super::navigation::{prompt_navigation, NavigationChoice, StepTransition};
use super::progress::{ProgressTracker, TutorialProgress};
use super::step::{ActionSpec, TutorialStep};

/// Where a module stands for the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ModuleStatus {
    /// Status implied by a stored record, or its absence.
    pub fn of(progress: Option<&TutorialProgress>) -> Self {
        match progress {
            Some(p) if p.is_completed() => Self::Completed,
            Some(p) if p.current_step > 0 => Self::InProgress,
            _ => Self::NotStarted,
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// One registered module with its stored progress.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub module_id: String,
    pub title: String,
    pub description: String,
    pub step_count: usize,
    pub status: ModuleStatus,
    pub progress: Option<TutorialProgress>,
}

/// Zero-based index to start a run at.
///
/// An explicit 1-based `start_step` is clamped into the module. Otherwise
/// the stored cursor is used, restarting at 0 once it has run off the end.
pub fn resume_index(start_step: Option<usize>, stored: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }

    match start_step {
        Some(step) => step.saturating_sub(1).min(total - 1),
        None if stored < total => stored,
        None => 0,
    }
}

/// Drives tutorial modules step by step.
#[derive(Debug)]
pub struct TutorialEngine {
    modules: Vec<TutorialModule>,
    tracker: ProgressTracker,
    executor: CommandExecutor,
    confirm_destructive: bool,
}

impl TutorialEngine {
    /// Create an engine with no modules.
    pub fn new(tracker: ProgressTracker, executor: CommandExecutor) -> Self {
        Self {
            modules: Vec::new(),
            tracker,
            executor,
            confirm_destructive: true,
        }
    }

    /// Build an engine from configuration with the built-in and configured modules.
    pub fn from_config(config: &TutorialConfig) -> Result<Self> {
        let tracker = ProgressTracker::new(config.progress_path());
        let executor =
            CommandExecutor::new().with_allowed_commands(config.allowed_commands.iter().cloned());

        let mut engine =
            Self::new(tracker, executor).with_confirmation(config.confirm_destructive);

        for module in builtin_modules()? {
            engine.register_module(TutorialModule::new(module));
        }
        for module in &config.modules {
            module.validate()?;
            engine.register_module(TutorialModule::new(module.clone()));
        }

        Ok(engine)
    }

    /// Whether destructive example commands ask for confirmation.
    pub fn with_confirmation(mut self, confirm_destructive: bool) -> Self {
        self.confirm_destructive = confirm_destructive;
        self
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ProgressTracker {
        &mut self.tracker
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Register a module. A module with the same id is replaced in place.
    pub fn register_module(&mut self, module: TutorialModule) {
        match self
            .modules
            .iter_mut()
            .find(|m| m.module_id() == module.module_id())
        {
            Some(existing) => {
                tracing::info!("Replacing tutorial module '{}'", module.module_id());
                *existing = module;
            }
            None => {
                tracing::debug!("Registered tutorial module '{}'", module.module_id());
                self.modules.push(module);
            }
        }
    }

    pub fn get_module(&self, module_id: &str) -> Option<&TutorialModule> {
        self.modules.iter().find(|m| m.module_id() == module_id)
    }

    /// Registered modules in registration order.
    pub fn list_modules(&self) -> &[TutorialModule] {
        &self.modules
    }

    /// Registered modules with their progress, in registration order.
    pub fn module_summaries(&self) -> Vec<ModuleSummary> {
        self.modules
            .iter()
            .map(|module| {
                let progress = self.tracker.get_progress(module.module_id()).cloned();
                ModuleSummary {
                    module_id: module.module_id().to_string(),
                    title: module.title().to_string(),
                    description: module.description().to_string(),
                    step_count: module.step_count(),
                    status: ModuleStatus::of(progress.as_ref()),
                    progress,
                }
            })
            .collect()
    }

    fn report_unknown(&self, module_id: &str, ui: &mut dyn UserInterface) {
        ui.error(
            &TutorialError::UnknownModule {
                module_id: module_id.to_string(),
            }
            .to_string(),
        );
        let ids: Vec<&str> = self.modules.iter().map(|m| m.module_id()).collect();
        if !ids.is_empty() {
            ui.show_hint(&format!("Available modules: {}", ids.join(", ")));
        }
    }

    /// Run a module from its resume point. Returns true if it was completed.
    ///
    /// `start_step` is 1-based and overrides the stored position.
    pub async fn run_module(
        &mut self,
        module_id: &str,
        start_step: Option<usize>,
        ui: &mut dyn UserInterface,
    ) -> bool {
        let Some(module) = self.modules.iter().find(|m| m.module_id() == module_id) else {
            self.report_unknown(module_id, ui);
            return false;
        };

        let steps = module.steps();
        let total = steps.len();

        let mut progress = self
            .tracker
            .get_progress(module_id)
            .cloned()
            .unwrap_or_else(|| TutorialProgress::new(module_id));

        let mut index = resume_index(start_step, progress.current_step, total);
        tracing::debug!(
            "Starting '{}' at step {} of {} (stored {})",
            module_id,
            index + 1,
            total,
            progress.current_step
        );

        show_module_intro(ui, module, index);
        progress.current_step = index;
        self.tracker.save_progress(&mut progress);

        while index < total {
            let step = &steps[index];
            show_step(ui, step, index, total);

            let succeeded = match step.action() {
                Some(action) => run_step_action(action, ui).await,
                None => true,
            };

            let choice = match prompt_navigation(ui, step, succeeded) {
                Ok(choice) => choice,
                Err(e) => {
                    tracing::warn!("Navigation prompt failed, quitting: {}", e);
                    NavigationChoice::Quit
                }
            };
            tracing::debug!("Step {} of '{}': {}", index + 1, module_id, choice.value());

            let transition = match &choice {
                NavigationChoice::Execute => {
                    if let Some(command) = step.get_command_example() {
                        self.executor
                            .execute_command(command, self.confirm_destructive, ui)
                            .await;
                    }
                    StepTransition::Stay
                }
                NavigationChoice::Custom(value) => resolve_custom_choice(step, value, ui).await,
                other => other.transition().unwrap_or(StepTransition::Stay),
            };

            transition.apply(&mut progress, index);
            self.tracker.save_progress(&mut progress);

            if transition == StepTransition::Quit {
                ui.message(&format!(
                    "Progress saved at step {} of {}. Run `yt-tutorial run {}` to continue.",
                    index + 1,
                    total,
                    module_id
                ));
                return false;
            }

            index = progress.current_step;
        }

        progress.current_step = total;
        progress.completed_at = Some(Utc::now());
        self.tracker.save_progress(&mut progress);
        tracing::info!("Completed tutorial module '{}'", module_id);

        ui.success(&format!("You completed '{}'", module.title()));
        true
    }

    /// Run the cleanup actions of a module's steps, last step first.
    ///
    /// Every cleanup runs even if an earlier one fails. Returns true when
    /// all of them succeeded.
    pub async fn cleanup_module(&self, module_id: &str, ui: &mut dyn UserInterface) -> bool {
        let Some(module) = self.get_module(module_id) else {
            self.report_unknown(module_id, ui);
            return false;
        };

        let mut ran = 0;
        let mut all_ok = true;

        for (index, step) in module.steps().iter().enumerate().rev() {
            let Some(cleanup) = step.action().and_then(ActionSpec::run_cleanup) else {
                continue;
            };
            ran += 1;

            let mut spinner =
                ui.start_spinner(&format!("Cleaning up step {}: {}", index + 1, step.title()));
            match cleanup.await {
                Ok(()) => spinner.finish_success(&format!("Cleaned up '{}'", step.title())),
                Err(e) => {
                    spinner.finish_error(&format!("Cleanup failed for '{}'", step.title()));
                    ui.error(&format!("{:#}", e));
                    all_ok = false;
                }
            }
        }

        if ran == 0 {
            ui.message(&format!("'{}' has nothing to clean up", module.title()));
        } else if all_ok {
            ui.success(&format!("Cleaned up '{}'", module.title()));
        }

        all_ok
    }
}

/// Run a step's action and decide whether the step succeeded.
///
/// With a validation check, the check decides. Without one, the action
/// succeeds unless it returned an error.
pub async fn run_step_action(action: &ActionSpec, ui: &mut dyn UserInterface) -> bool {
    let mut spinner = ui.start_spinner("Running step action...");

    if let Err(e) = action.run().await {
        spinner.finish_error("Step action failed");
        ui.error(&format!("{:#}", e));
        return false;
    }

    match action.validation() {
        Some(check) if check() => {
            spinner.finish_success("Check passed");
            true
        }
        Some(_) => {
            spinner.finish_error("Check did not pass");
            ui.warning("The step's check did not pass");
            false
        }
        None => {
            spinner.finish_success("Done");
            true
        }
    }
}

async fn resolve_custom_choice(
    step: &TutorialStep,
    value: &str,
    ui: &mut dyn UserInterface,
) -> StepTransition {
    let Some(prompt) = step.custom_prompt() else {
        return StepTransition::Stay;
    };

    match prompt.handle(value.to_string()).await {
        Ok(true) => StepTransition::Advance { completed: true },
        Ok(false) => {
            ui.warning(&format!("'{}' did not succeed, showing the step again", value));
            StepTransition::Stay
        }
        Err(e) => {
            ui.error(&format!("'{}' failed: {:#}", value, e));
            StepTransition::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::module::TutorialContent;
    use crate::tutorial::navigation::NAVIGATION_PROMPT_KEY;
    use crate::tutorial::step::CustomPrompt;
    use crate::ui::MockUI;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Fixed {
        id: &'static str,
        steps: fn() -> Vec<TutorialStep>,
    }

    impl TutorialContent for Fixed {
        fn module_id(&self) -> &str {
            self.id
        }

        fn title(&self) -> &str {
            "Fixed"
        }

        fn description(&self) -> &str {
            "Fixed steps for tests"
        }

        fn build_steps(&self) -> Vec<TutorialStep> {
            (self.steps)()
        }
    }

    fn three_plain() -> Vec<TutorialStep> {
        vec![
            TutorialStep::new("One", "first"),
            TutorialStep::new("Two", "second"),
            TutorialStep::new("Three", "third"),
        ]
    }

    fn demo_engine(temp: &TempDir) -> TutorialEngine {
        let tracker = ProgressTracker::new(temp.path().join("progress.json"));
        let mut engine = TutorialEngine::new(tracker, CommandExecutor::new());
        engine.register_module(TutorialModule::new(Fixed {
            id: "demo",
            steps: three_plain,
        }));
        engine
    }

    fn scripted(answers: Vec<&str>) -> MockUI {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(NAVIGATION_PROMPT_KEY, answers);
        ui
    }

    #[test]
    fn resume_index_rules() {
        assert_eq!(resume_index(None, 0, 3), 0);
        assert_eq!(resume_index(None, 2, 3), 2);
        assert_eq!(resume_index(None, 3, 3), 0);
        assert_eq!(resume_index(Some(2), 0, 3), 1);
        assert_eq!(resume_index(Some(0), 2, 3), 0);
        assert_eq!(resume_index(Some(99), 0, 3), 2);
        assert_eq!(resume_index(Some(2), 0, 0), 0);
    }

    #[tokio::test]
    async fn next_through_every_step_completes() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = scripted(vec!["next", "next", "next"]);

        assert!(engine.run_module("demo", None, &mut ui).await);

        let progress = engine.tracker().get_progress("demo").unwrap();
        assert_eq!(progress.completed_steps.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(progress.current_step, 3);
        assert!(progress.completed_at.is_some());
        assert!(progress.started_at.is_some());
        assert_eq!(
            ui.headers(),
            &["Fixed", "[1/3] One", "[2/3] Two", "[3/3] Three"]
        );
    }

    #[tokio::test]
    async fn quit_persists_position_and_resumes() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = scripted(vec!["next", "quit"]);

        assert!(!engine.run_module("demo", None, &mut ui).await);
        assert_eq!(engine.tracker().get_progress("demo").unwrap().current_step, 1);

        let mut reloaded = demo_engine(&temp);
        assert_eq!(reloaded.tracker().get_progress("demo").unwrap().current_step, 1);

        let mut ui = scripted(vec!["next", "next"]);
        assert!(reloaded.run_module("demo", None, &mut ui).await);
        assert!(ui.has_message("Resuming at step 2 of 3"));
        assert_eq!(ui.headers()[1], "[2/3] Two");
    }

    #[tokio::test]
    async fn start_step_overrides_stored_position() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = scripted(vec!["quit"]);

        assert!(!engine.run_module("demo", Some(3), &mut ui).await);
        assert_eq!(ui.headers()[1], "[3/3] Three");
        assert_eq!(engine.tracker().get_progress("demo").unwrap().current_step, 2);
    }

    #[tokio::test]
    async fn skip_does_not_mark_completed() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = scripted(vec!["skip", "next", "skip"]);

        assert!(engine.run_module("demo", None, &mut ui).await);
        let progress = engine.tracker().get_progress("demo").unwrap();
        assert_eq!(progress.completed_steps.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn repeat_shows_step_again() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = scripted(vec!["repeat", "quit"]);

        assert!(!engine.run_module("demo", None, &mut ui).await);
        assert_eq!(ui.headers(), &["Fixed", "[1/3] One", "[1/3] One"]);
        assert_eq!(engine.tracker().get_progress("demo").unwrap().current_step, 0);
    }

    #[tokio::test]
    async fn unknown_module_returns_false() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = MockUI::new();

        assert!(!engine.run_module("missing", None, &mut ui).await);
        assert!(ui.has_error("Unknown tutorial module: missing"));
        assert!(ui.has_hint("demo"));
        assert!(engine.tracker().get_progress("missing").is_none());
    }

    #[tokio::test]
    async fn empty_module_completes_immediately() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Fixed {
            id: "empty",
            steps: Vec::new,
        }));
        let mut ui = MockUI::new();

        assert!(engine.run_module("empty", None, &mut ui).await);
        assert!(ui.prompts_shown().is_empty());
        assert!(engine.tracker().get_progress("empty").unwrap().is_completed());
    }

    #[tokio::test]
    async fn prompt_failure_is_treated_as_quit() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut ui = MockUI::new();
        ui.set_prompt_error(NAVIGATION_PROMPT_KEY);

        assert!(!engine.run_module("demo", None, &mut ui).await);
        assert!(ui.has_message("Progress saved"));
    }

    fn failing_action() -> Vec<TutorialStep> {
        vec![TutorialStep::new("Install", "Check yt")
            .command_example("yt --version")
            .with_action(ActionSpec::new(|| async { anyhow::bail!("yt not found") }))]
    }

    #[tokio::test]
    async fn failed_action_narrows_choices() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Fixed {
            id: "failing",
            steps: failing_action,
        }));
        let mut ui = scripted(vec!["retry", "quit"]);

        assert!(!engine.run_module("failing", None, &mut ui).await);
        assert_eq!(
            ui.last_offered(NAVIGATION_PROMPT_KEY).unwrap(),
            &["retry".to_string(), "skip".to_string(), "quit".to_string()]
        );
        assert_eq!(ui.spinners().len(), 2);
        assert!(ui.has_error("yt not found"));
    }

    #[tokio::test]
    async fn unattended_failure_defaults_to_skip() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Fixed {
            id: "failing",
            steps: failing_action,
        }));
        let mut ui = MockUI::new();

        assert!(engine.run_module("failing", None, &mut ui).await);
        assert!(engine
            .tracker()
            .get_progress("failing")
            .unwrap()
            .completed_steps
            .is_empty());
    }

    #[tokio::test]
    async fn validation_check_decides_success() {
        let step = TutorialStep::new("Check", "Validate")
            .with_action(ActionSpec::new(|| async { Ok(()) }).with_validation(|| false));
        let mut ui = MockUI::new();
        assert!(!run_step_action(step.action().unwrap(), &mut ui).await);
        assert!(ui.has_warning("check did not pass"));

        let passing = ActionSpec::new(|| async { Ok(()) }).with_validation(|| true);
        assert!(run_step_action(&passing, &mut ui).await);

        let erroring =
            ActionSpec::new(|| async { anyhow::bail!("boom") }).with_validation(|| true);
        assert!(!run_step_action(&erroring, &mut ui).await);
    }

    fn custom_steps() -> Vec<TutorialStep> {
        vec![TutorialStep::new("Board", "Pick a board").with_custom_prompt(
            CustomPrompt::new(["good", "bad", "broken"], |choice| async move {
                match choice.as_str() {
                    "good" => Ok(true),
                    "bad" => Ok(false),
                    _ => anyhow::bail!("handler exploded"),
                }
            }),
        )]
    }

    #[tokio::test]
    async fn custom_choice_outcomes() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Fixed {
            id: "custom",
            steps: custom_steps,
        }));
        let mut ui = scripted(vec!["bad", "broken", "good"]);

        assert!(engine.run_module("custom", None, &mut ui).await);
        assert!(ui.has_warning("'bad' did not succeed"));
        assert!(ui.has_error("handler exploded"));
        assert_eq!(ui.prompts_shown().len(), 3);

        let progress = engine.tracker().get_progress("custom").unwrap();
        assert!(progress.completed_steps.contains(&0));
    }

    #[tokio::test]
    async fn cleanup_runs_in_reverse_and_continues_after_failure() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = |name: &'static str, fail: bool| {
            let order = Arc::clone(&order);
            move || {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(name);
                    if fail {
                        anyhow::bail!("{} cleanup failed", name);
                    }
                    Ok(())
                }
            }
        };

        let first = TutorialStep::new("First", "").with_action(
            ActionSpec::new(|| async { Ok(()) }).with_cleanup(record("first", false)),
        );
        let second = TutorialStep::new("Second", "").with_action(
            ActionSpec::new(|| async { Ok(()) }).with_cleanup(record("second", true)),
        );

        struct Owned(Vec<TutorialStep>);
        impl TutorialContent for Owned {
            fn module_id(&self) -> &str {
                "owned"
            }
            fn title(&self) -> &str {
                "Owned"
            }
            fn description(&self) -> &str {
                ""
            }
            fn build_steps(&self) -> Vec<TutorialStep> {
                self.0.clone()
            }
        }

        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Owned(vec![first, second])));
        let mut ui = MockUI::new();

        assert!(!engine.cleanup_module("owned", &mut ui).await);
        assert_eq!(*order.lock().unwrap(), vec!["second", "first"]);
        assert!(ui.has_error("second cleanup failed"));
    }

    #[tokio::test]
    async fn cleanup_without_actions_succeeds() {
        let temp = TempDir::new().unwrap();
        let engine = demo_engine(&temp);
        let mut ui = MockUI::new();

        assert!(engine.cleanup_module("demo", &mut ui).await);
        assert!(ui.has_message("nothing to clean up"));
        assert!(!engine.cleanup_module("missing", &mut ui).await);
    }

    #[test]
    fn register_replaces_in_place() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        engine.register_module(TutorialModule::new(Fixed {
            id: "other",
            steps: Vec::new,
        }));
        engine.register_module(TutorialModule::new(Fixed {
            id: "demo",
            steps: Vec::new,
        }));

        let ids: Vec<&str> = engine.list_modules().iter().map(|m| m.module_id()).collect();
        assert_eq!(ids, vec!["demo", "other"]);
        assert_eq!(engine.get_module("demo").unwrap().step_count(), 0);
    }

    #[test]
    fn summaries_report_status() {
        let temp = TempDir::new().unwrap();
        let mut engine = demo_engine(&temp);
        let mut progress = TutorialProgress::new("demo");
        progress.current_step = 1;
        engine.tracker_mut().save_progress(&mut progress);

        let summaries = engine.module_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].step_count, 3);
        assert_eq!(summaries[0].status, ModuleStatus::InProgress);
        assert_eq!(summaries[0].status.to_string(), "in progress");
    }

    #[test]
    fn from_config_registers_builtins_and_extras() {
        let temp = TempDir::new().unwrap();
        let config: TutorialConfig = serde_yaml::from_str(&format!(
            r#"
progress_file: {}
allowed_commands: [yt reports list]
modules:
  - id: reports
    title: Reports
    steps:
      - title: List reports
"#,
            temp.path().join("progress.json").display()
        ))
        .unwrap();

        let engine = TutorialEngine::from_config(&config).unwrap();
        let ids: Vec<&str> = engine.list_modules().iter().map(|m| m.module_id()).collect();

        assert_eq!(ids, vec!["getting-started", "issues", "reports"]);
        assert!(engine.executor().is_command_allowed("yt reports list"));
        assert_eq!(engine.tracker().path(), temp.path().join("progress.json"));
    }
}
