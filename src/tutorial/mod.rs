//! Interactive, resumable tutorials.
//!
//! - [`step`]: immutable step descriptors and their kinds
//! - [`module`]: the content trait and the caching module wrapper
//! - [`progress`]: progress records and their JSON store
//! - [`executor`]: allow-list gated example commands
//! - [`navigation`]: the between-step menu and cursor transitions
//! - [`engine`]: the step loop
//! - [`declarative`] and [`builtin`]: modules described in YAML
//!
//! # Example
//!
//! ```
//! use yt_tutorial::tutorial::{
//!     CommandExecutor, ProgressTracker, TutorialContent, TutorialEngine, TutorialModule,
//!     TutorialStep,
//! };
//! use yt_tutorial::ui::MockUI;
//! use tempfile::TempDir;
//!
//! struct Hello;
//!
//! impl TutorialContent for Hello {
//!     fn module_id(&self) -> &str { "hello" }
//!     fn title(&self) -> &str { "Hello" }
//!     fn description(&self) -> &str { "A one-step tour" }
//!     fn build_steps(&self) -> Vec<TutorialStep> {
//!         vec![TutorialStep::new("Say hello", "Nothing to do here")]
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let temp = TempDir::new().unwrap();
//! let tracker = ProgressTracker::new(temp.path().join("progress.json"));
//! let mut engine = TutorialEngine::new(tracker, CommandExecutor::new());
//! engine.register_module(TutorialModule::new(Hello));
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("navigation", "next");
//! assert!(engine.run_module("hello", None, &mut ui).await);
//! # });
//! ```

pub mod builtin;
pub mod declarative;
pub mod display;
pub mod engine;
pub mod executor;
pub mod module;
pub mod navigation;
pub mod progress;
pub mod step;

pub use builtin::builtin_modules;
pub use declarative::{ActionDefinition, ChoiceDefinition, ModuleDefinition, StepDefinition};
pub use engine::{resume_index, ModuleStatus, ModuleSummary, TutorialEngine};
pub use executor::{CommandExecutor, CommandRunner, ShellRunner, DEFAULT_ALLOWED_COMMANDS};
pub use module::{TutorialContent, TutorialModule};
pub use navigation::{NavigationChoice, StepTransition, NAVIGATION_PROMPT_KEY};
pub use progress::{CompletionStats, ProgressTracker, TutorialProgress};
pub use step::{ActionSpec, CustomPrompt, StepKind, TutorialStep};
