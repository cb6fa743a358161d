//! Tutorial step descriptors.
//!
//! A [`TutorialStep`] is built once by its module and never mutated. What
//! the engine may do with a step beyond displaying it is decided by its
//! [`StepKind`]: plain steps only navigate, actionable steps run an action
//! (optionally validated) when shown, and custom-prompt steps add their own
//! choices to the navigation prompt together with the handler for them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

/// Future returned by a step action.
pub type ActionFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Zero-argument asynchronous action run when a step is shown.
pub type StepActionFn = Arc<dyn Fn() -> ActionFuture + Send + Sync>;

/// Synchronous predicate confirming an action had its real-world effect.
pub type ValidationFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Future returned by a custom prompt handler.
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<bool>>;

/// Handler for a custom prompt choice; receives the chosen value.
pub type PromptHandlerFn = Arc<dyn Fn(String) -> HandlerFuture + Send + Sync>;

/// The action half of an actionable step.
#[derive(Clone)]
pub struct ActionSpec {
    action: StepActionFn,
    validation: Option<ValidationFn>,
    cleanup: Option<StepActionFn>,
}

impl ActionSpec {
    /// Wrap an async closure as the step's action.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            action: Arc::new(move || action().boxed()),
            validation: None,
            cleanup: None,
        }
    }

    /// Decide success by this predicate instead of by the action's result.
    pub fn with_validation<F>(mut self, check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.validation = Some(Arc::new(check));
        self
    }

    /// Action that undoes this step's effects during module cleanup.
    pub fn with_cleanup<F, Fut>(mut self, cleanup: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.cleanup = Some(Arc::new(move || cleanup().boxed()));
        self
    }

    /// Start the action.
    pub fn run(&self) -> ActionFuture {
        (self.action)()
    }

    /// The validation predicate, if any.
    pub fn validation(&self) -> Option<&ValidationFn> {
        self.validation.as_ref()
    }

    /// Start the cleanup action, if any.
    pub fn run_cleanup(&self) -> Option<ActionFuture> {
        self.cleanup.as_ref().map(|cleanup| cleanup())
    }

    /// Whether a cleanup action is attached.
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("validation", &self.validation.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Extra navigation choices and the handler that resolves them.
#[derive(Clone)]
pub struct CustomPrompt {
    choices: Vec<String>,
    handler: PromptHandlerFn,
}

impl CustomPrompt {
    /// Create a custom prompt. Duplicate choices keep their first position.
    pub fn new<I, S, F, Fut>(choices: I, handler: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        let mut unique: Vec<String> = Vec::new();
        for choice in choices.into_iter().map(Into::into) {
            if !unique.contains(&choice) {
                unique.push(choice);
            }
        }

        Self {
            choices: unique,
            handler: Arc::new(move |choice| handler(choice).boxed()),
        }
    }

    /// Choices in display order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether `value` is one of this prompt's choices.
    pub fn offers(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c == value)
    }

    /// Start the handler for a chosen value.
    pub fn handle(&self, choice: String) -> HandlerFuture {
        (self.handler)(choice)
    }
}

impl fmt::Debug for CustomPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPrompt")
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}

/// What the engine can do with a step besides showing it.
#[derive(Debug, Clone, Default)]
pub enum StepKind {
    /// Display and navigate only.
    #[default]
    Plain,
    /// Run an action when displayed.
    Actionable(ActionSpec),
    /// Offer extra prompt choices.
    CustomPrompt(CustomPrompt),
}

/// One displayed unit of a tutorial.
#[derive(Debug, Clone)]
pub struct TutorialStep {
    title: String,
    description: String,
    instructions: Vec<String>,
    command_example: Option<String>,
    validation_command: Option<String>,
    tips: Vec<String>,
    kind: StepKind,
}

impl TutorialStep {
    /// Create a plain step.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            instructions: Vec::new(),
            command_example: None,
            validation_command: None,
            tips: Vec::new(),
            kind: StepKind::Plain,
        }
    }

    /// Append an instruction.
    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.instructions.push(text.into());
        self
    }

    /// Append several instructions.
    pub fn instructions<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Command shown as an example and run by the "execute" choice.
    pub fn command_example(mut self, command: impl Into<String>) -> Self {
        self.command_example = Some(command.into());
        self
    }

    /// Command the user can run to check their work (display only).
    pub fn validation_command(mut self, command: impl Into<String>) -> Self {
        self.validation_command = Some(command.into());
        self
    }

    /// Append a tip.
    pub fn tip(mut self, text: impl Into<String>) -> Self {
        self.tips.push(text.into());
        self
    }

    /// Append several tips.
    pub fn tips<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tips.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Make this an actionable step.
    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.kind = StepKind::Actionable(action);
        self
    }

    /// Make this a custom-prompt step.
    pub fn with_custom_prompt(mut self, prompt: CustomPrompt) -> Self {
        self.kind = StepKind::CustomPrompt(prompt);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn get_instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn get_command_example(&self) -> Option<&str> {
        self.command_example.as_deref()
    }

    pub fn get_validation_command(&self) -> Option<&str> {
        self.validation_command.as_deref()
    }

    pub fn get_tips(&self) -> &[String] {
        &self.tips
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    /// The step's action, for actionable steps.
    pub fn action(&self) -> Option<&ActionSpec> {
        match &self.kind {
            StepKind::Actionable(action) => Some(action),
            _ => None,
        }
    }

    /// The step's custom prompt, for custom-prompt steps.
    pub fn custom_prompt(&self) -> Option<&CustomPrompt> {
        match &self.kind {
            StepKind::CustomPrompt(prompt) => Some(prompt),
            _ => None,
        }
    }

    /// Custom choices offered by this step (empty for other kinds).
    pub fn custom_choices(&self) -> &[String] {
        self.custom_prompt().map(CustomPrompt::choices).unwrap_or(&[])
    }
}
