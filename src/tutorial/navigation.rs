//! Between-step navigation.
//!
//! After a step is shown (and its action run) the user picks what happens
//! next. The offered set depends on whether the action succeeded. Choices
//! that need no async work map straight to a [`StepTransition`], which is
//! applied to the progress record without touching the UI.

use crate::error::Result;
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::progress::TutorialProgress;
use super::step::TutorialStep;

/// Prompt key of the navigation menu.
pub const NAVIGATION_PROMPT_KEY: &str = "navigation";

/// Values reserved by the navigation menu; custom choices may not use them.
pub const RESERVED_CHOICES: &[&str] = &["next", "repeat", "retry", "skip", "quit", "execute"];

/// A navigation choice offered after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationChoice {
    /// Mark the step completed and move on.
    Next,
    /// Show the step again.
    Repeat,
    /// Show the step again after a failed action.
    Retry,
    /// Move on without marking the step completed.
    Skip,
    /// Save and stop.
    Quit,
    /// Run the step's example command, then stay on the step.
    Execute,
    /// A step-specific choice resolved by the step's handler.
    Custom(String),
}

impl NavigationChoice {
    /// Value returned by the prompt for this choice.
    pub fn value(&self) -> &str {
        match self {
            Self::Next => "next",
            Self::Repeat => "repeat",
            Self::Retry => "retry",
            Self::Skip => "skip",
            Self::Quit => "quit",
            Self::Execute => "execute",
            Self::Custom(choice) => choice,
        }
    }

    /// Menu label.
    pub fn label(&self) -> String {
        match self {
            Self::Next => "Next step".to_string(),
            Self::Repeat => "Repeat this step".to_string(),
            Self::Retry => "Retry".to_string(),
            Self::Skip => "Skip this step".to_string(),
            Self::Quit => "Quit (progress is saved)".to_string(),
            Self::Execute => "Run the example command".to_string(),
            Self::Custom(choice) => choice.clone(),
        }
    }

    /// Find the offered choice with this value.
    pub fn parse(value: &str, offered: &[NavigationChoice]) -> Option<Self> {
        offered.iter().find(|c| c.value() == value).cloned()
    }

    /// Transition for choices that need no further work.
    ///
    /// `Execute` and custom choices return `None`: their outcome depends on
    /// running something first.
    pub fn transition(&self) -> Option<StepTransition> {
        match self {
            Self::Next => Some(StepTransition::Advance { completed: true }),
            Self::Skip => Some(StepTransition::Advance { completed: false }),
            Self::Repeat | Self::Retry => Some(StepTransition::Stay),
            Self::Quit => Some(StepTransition::Quit),
            Self::Execute | Self::Custom(_) => None,
        }
    }
}

/// How a resolved choice moves the step cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    /// Move to the following step, optionally recording this one as done.
    Advance { completed: bool },
    /// Stay on the current step.
    Stay,
    /// Stop the run at the current step.
    Quit,
}

impl StepTransition {
    /// Apply to `progress` for the step at `index`.
    pub fn apply(self, progress: &mut TutorialProgress, index: usize) {
        match self {
            Self::Advance { completed } => {
                if completed {
                    progress.completed_steps.insert(index);
                }
                progress.current_step = index + 1;
            }
            Self::Stay | Self::Quit => progress.current_step = index,
        }
    }
}

/// Choices offered after a step, in menu order.
pub fn available_choices(step: &TutorialStep, action_succeeded: bool) -> Vec<NavigationChoice> {
    if !action_succeeded {
        return vec![
            NavigationChoice::Retry,
            NavigationChoice::Skip,
            NavigationChoice::Quit,
        ];
    }

    let mut choices = vec![NavigationChoice::Next, NavigationChoice::Repeat];
    if step.get_command_example().is_some() {
        choices.push(NavigationChoice::Execute);
    }
    choices.extend(
        step.custom_choices()
            .iter()
            .filter(|c| !RESERVED_CHOICES.contains(&c.as_str()))
            .map(|c| NavigationChoice::Custom(c.clone())),
    );
    choices.push(NavigationChoice::Skip);
    choices.push(NavigationChoice::Quit);
    choices
}

/// Ask what to do next.
///
/// The default is `next` after success. After a failure it is `retry` on an
/// interactive terminal and `skip` otherwise, so an unattended run cannot
/// retry the same failing action forever. An answer outside the offered set
/// is treated as `quit`.
pub fn prompt_navigation(
    ui: &mut dyn UserInterface,
    step: &TutorialStep,
    action_succeeded: bool,
) -> Result<NavigationChoice> {
    let choices = available_choices(step, action_succeeded);

    let default = if action_succeeded {
        NavigationChoice::Next
    } else if ui.is_interactive() {
        NavigationChoice::Retry
    } else {
        NavigationChoice::Skip
    };

    let prompt = Prompt {
        key: NAVIGATION_PROMPT_KEY.to_string(),
        question: "What would you like to do?".to_string(),
        prompt_type: PromptType::Select {
            options: choices
                .iter()
                .map(|c| PromptOption::new(c.label(), c.value()))
                .collect(),
        },
        default: Some(default.value().to_string()),
    };

    let answer = ui.prompt(&prompt)?.as_string();
    match NavigationChoice::parse(&answer, &choices) {
        Some(choice) => Ok(choice),
        None => {
            tracing::warn!("Unrecognized navigation choice '{}', quitting", answer);
            Ok(NavigationChoice::Quit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::step::CustomPrompt;
    use crate::ui::MockUI;

    fn values(choices: &[NavigationChoice]) -> Vec<&str> {
        choices.iter().map(NavigationChoice::value).collect()
    }

    #[test]
    fn success_offers_forward_choices() {
        let step = TutorialStep::new("Intro", "Welcome");
        assert_eq!(
            values(&available_choices(&step, true)),
            vec!["next", "repeat", "skip", "quit"]
        );
    }

    #[test]
    fn command_example_adds_execute() {
        let step = TutorialStep::new("List", "List issues").command_example("yt issues list");
        assert!(available_choices(&step, true).contains(&NavigationChoice::Execute));
    }

    #[test]
    fn custom_choices_are_appended_without_reserved_values() {
        let step = TutorialStep::new("Board", "Pick a board").with_custom_prompt(
            CustomPrompt::new(["scrum", "next", "kanban"], |_| async { Ok(true) }),
        );
        assert_eq!(
            values(&available_choices(&step, true)),
            vec!["next", "repeat", "scrum", "kanban", "skip", "quit"]
        );
    }

    #[test]
    fn failure_narrows_choices() {
        let step = TutorialStep::new("List", "List issues").command_example("yt issues list");
        assert_eq!(
            values(&available_choices(&step, false)),
            vec!["retry", "skip", "quit"]
        );
    }

    #[test]
    fn transitions_update_progress() {
        let mut progress = TutorialProgress::new("issues");

        StepTransition::Advance { completed: true }.apply(&mut progress, 0);
        assert_eq!(progress.current_step, 1);
        assert!(progress.completed_steps.contains(&0));

        StepTransition::Advance { completed: false }.apply(&mut progress, 1);
        assert_eq!(progress.current_step, 2);
        assert!(!progress.completed_steps.contains(&1));

        StepTransition::Stay.apply(&mut progress, 2);
        assert_eq!(progress.current_step, 2);

        StepTransition::Quit.apply(&mut progress, 2);
        assert_eq!(progress.current_step, 2);
    }

    #[test]
    fn simple_choices_map_to_transitions() {
        assert_eq!(
            NavigationChoice::Next.transition(),
            Some(StepTransition::Advance { completed: true })
        );
        assert_eq!(
            NavigationChoice::Skip.transition(),
            Some(StepTransition::Advance { completed: false })
        );
        assert_eq!(NavigationChoice::Retry.transition(), Some(StepTransition::Stay));
        assert_eq!(NavigationChoice::Quit.transition(), Some(StepTransition::Quit));
        assert_eq!(NavigationChoice::Execute.transition(), None);
        assert_eq!(NavigationChoice::Custom("x".into()).transition(), None);
    }

    #[test]
    fn prompt_defaults_to_next_after_success() {
        let mut ui = MockUI::new();
        let step = TutorialStep::new("Intro", "Welcome");
        assert_eq!(
            prompt_navigation(&mut ui, &step, true).unwrap(),
            NavigationChoice::Next
        );
    }

    #[test]
    fn failure_default_depends_on_interactivity() {
        let step = TutorialStep::new("Intro", "Welcome");

        let mut scripted = MockUI::new();
        assert_eq!(
            prompt_navigation(&mut scripted, &step, false).unwrap(),
            NavigationChoice::Skip
        );

        let mut interactive = MockUI::new();
        interactive.set_interactive(true);
        assert_eq!(
            prompt_navigation(&mut interactive, &step, false).unwrap(),
            NavigationChoice::Retry
        );
    }

    #[test]
    fn answer_outside_offered_set_quits() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(NAVIGATION_PROMPT_KEY, "execute");
        let step = TutorialStep::new("Intro", "Welcome");

        assert_eq!(
            prompt_navigation(&mut ui, &step, true).unwrap(),
            NavigationChoice::Quit
        );
    }

    #[test]
    fn custom_answer_is_recognized() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(NAVIGATION_PROMPT_KEY, "kanban");
        let step = TutorialStep::new("Board", "Pick a board")
            .with_custom_prompt(CustomPrompt::new(["kanban"], |_| async { Ok(true) }));

        assert_eq!(
            prompt_navigation(&mut ui, &step, true).unwrap(),
            NavigationChoice::Custom("kanban".to_string())
        );
    }

    #[test]
    fn prompt_error_propagates() {
        let mut ui = MockUI::new();
        ui.set_prompt_error(NAVIGATION_PROMPT_KEY);
        let step = TutorialStep::new("Intro", "Welcome");
        assert!(prompt_navigation(&mut ui, &step, true).is_err());
    }
}
