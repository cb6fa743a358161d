//! Tutorial modules described in YAML.
//!
//! A [`ModuleDefinition`] is plain data. Its actions, checks, cleanups and
//! custom choices are shell commands, turned into step closures when the
//! module builds its steps. These commands come from the tool's own content
//! or the user's config and run directly in a subshell without going
//! through the example-command allow-list.
//!
//! ```yaml
//! id: boards
//! title: Agile boards
//! description: Find your way around boards
//! steps:
//!   - title: Pick a board type
//!     description: Show boards of one kind
//!     choices:
//!       - name: scrum
//!         run: yt boards list --type scrum
//!       - name: kanban
//!         run: yt boards list --type kanban
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, TutorialError};
use crate::shell::{execute_async, execute_check, CommandOptions};

use super::module::TutorialContent;
use super::navigation::RESERVED_CHOICES;
use super::step::{ActionSpec, CustomPrompt, TutorialStep};

/// A module described as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// A step described as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepDefinition {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_command: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDefinition>,
}

/// Commands backing an actionable step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDefinition {
    /// Run when the step is shown; fails on non-zero exit.
    pub run: String,
    /// Exit status decides whether the step succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    /// Run during module cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<String>,
}

/// A custom navigation choice and the command it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceDefinition {
    pub name: String,
    pub run: String,
}

impl ModuleDefinition {
    /// Parse one module from YAML.
    pub fn from_yaml(source: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Check the content contracts the engine relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| TutorialError::InvalidModule {
            module_id: self.id.clone(),
            message,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("module id must not be empty".to_string()));
        }

        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;

            if step.action.is_some() && !step.choices.is_empty() {
                return Err(invalid(format!(
                    "step {} declares both an action and choices",
                    number
                )));
            }

            if step
                .action
                .as_ref()
                .is_some_and(|a| a.run.trim().is_empty())
            {
                return Err(invalid(format!("step {} has an empty action command", number)));
            }

            let mut seen = HashSet::new();
            for choice in &step.choices {
                if RESERVED_CHOICES.contains(&choice.name.as_str()) {
                    return Err(invalid(format!(
                        "step {} uses reserved choice '{}'",
                        number, choice.name
                    )));
                }
                if !seen.insert(choice.name.as_str()) {
                    return Err(invalid(format!(
                        "step {} repeats choice '{}'",
                        number, choice.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Run a command, failing with its stderr on non-zero exit.
async fn run_command(command: String) -> anyhow::Result<()> {
    let result = execute_async(&command, &CommandOptions::captured()).await?;
    if result.success {
        Ok(())
    } else {
        anyhow::bail!(
            "`{}` exited with code {}: {}",
            command,
            result
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            result.stderr.trim()
        )
    }
}

/// Run the command mapped to a custom choice with the terminal attached.
async fn run_choice(choice: String, command: Option<String>) -> anyhow::Result<bool> {
    let Some(command) = command else {
        anyhow::bail!("no command for choice '{}'", choice);
    };
    let result = execute_async(&command, &CommandOptions::default()).await?;
    Ok(result.success)
}

impl StepDefinition {
    fn to_step(&self) -> TutorialStep {
        let mut step = TutorialStep::new(&self.title, &self.description)
            .instructions(self.instructions.iter().cloned())
            .tips(self.tips.iter().cloned());

        if let Some(command) = &self.command_example {
            step = step.command_example(command);
        }
        if let Some(command) = &self.validation_command {
            step = step.validation_command(command);
        }

        if let Some(action) = &self.action {
            step = step.with_action(action.to_spec());
        } else if !self.choices.is_empty() {
            let commands: Vec<(String, String)> = self
                .choices
                .iter()
                .map(|c| (c.name.clone(), c.run.clone()))
                .collect();
            let names: Vec<String> = commands.iter().map(|(name, _)| name.clone()).collect();

            step = step.with_custom_prompt(CustomPrompt::new(names, move |choice: String| {
                let command = commands
                    .iter()
                    .find(|(name, _)| *name == choice)
                    .map(|(_, run)| run.clone());
                run_choice(choice, command)
            }));
        }

        step
    }
}

impl ActionDefinition {
    fn to_spec(&self) -> ActionSpec {
        let run = self.run.clone();
        let mut spec = ActionSpec::new(move || run_command(run.clone()));

        if let Some(check) = self.validate.clone() {
            spec = spec.with_validation(move || execute_check(&check, None));
        }
        if let Some(cleanup) = self.cleanup.clone() {
            spec = spec.with_cleanup(move || run_command(cleanup.clone()));
        }

        spec
    }
}

impl TutorialContent for ModuleDefinition {
    fn module_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn build_steps(&self) -> Vec<TutorialStep> {
        self.steps.iter().map(StepDefinition::to_step).collect()
    }
}
