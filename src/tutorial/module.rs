//! Tutorial modules.
//!
//! Content is supplied through the [`TutorialContent`] trait. The engine
//! stores each content source inside a [`TutorialModule`], which builds the
//! step sequence on first access and hands out the same slice afterwards.

use std::fmt;
use std::sync::OnceLock;

use super::step::TutorialStep;

/// A source of tutorial content: one guided topic.
pub trait TutorialContent: Send + Sync {
    /// Unique id used for registration and progress keys.
    fn module_id(&self) -> &str;

    /// Human readable title.
    fn title(&self) -> &str;

    /// Short description shown in listings.
    fn description(&self) -> &str;

    /// Build the ordered step sequence.
    fn build_steps(&self) -> Vec<TutorialStep>;
}

/// A registered module with a lazily built, cached step sequence.
pub struct TutorialModule {
    content: Box<dyn TutorialContent>,
    steps: OnceLock<Vec<TutorialStep>>,
}

impl TutorialModule {
    /// Wrap a content source.
    pub fn new(content: impl TutorialContent + 'static) -> Self {
        Self::from_boxed(Box::new(content))
    }

    /// Wrap an already boxed content source.
    pub fn from_boxed(content: Box<dyn TutorialContent>) -> Self {
        Self {
            content,
            steps: OnceLock::new(),
        }
    }

    pub fn module_id(&self) -> &str {
        self.content.module_id()
    }

    pub fn title(&self) -> &str {
        self.content.title()
    }

    pub fn description(&self) -> &str {
        self.content.description()
    }

    /// The step sequence, built on first call.
    pub fn steps(&self) -> &[TutorialStep] {
        self.steps.get_or_init(|| {
            let steps = self.content.build_steps();
            tracing::debug!(
                "Built {} steps for module '{}'",
                steps.len(),
                self.content.module_id()
            );
            steps
        })
    }

    /// Number of steps.
    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    /// Step at a zero-based index.
    pub fn step(&self, index: usize) -> Option<&TutorialStep> {
        self.steps().get(index)
    }
}

impl fmt::Debug for TutorialModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TutorialModule")
            .field("module_id", &self.module_id())
            .field("built", &self.steps.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        builds: Arc<AtomicUsize>,
    }

    impl TutorialContent for Counting {
        fn module_id(&self) -> &str {
            "counting"
        }

        fn title(&self) -> &str {
            "Counting"
        }

        fn description(&self) -> &str {
            "Counts how often steps are built"
        }

        fn build_steps(&self) -> Vec<TutorialStep> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            vec![
                TutorialStep::new("One", "first"),
                TutorialStep::new("Two", "second"),
            ]
        }
    }

    fn counting() -> (TutorialModule, Arc<AtomicUsize>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let module = TutorialModule::new(Counting {
            builds: Arc::clone(&builds),
        });
        (module, builds)
    }

    #[test]
    fn steps_are_built_lazily() {
        let (module, builds) = counting();
        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert_eq!(module.module_id(), "counting");
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        assert_eq!(module.step_count(), 2);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn steps_are_referentially_stable() {
        let (module, builds) = counting();
        let first = module.steps();
        let second = module.steps();

        assert!(std::ptr::eq(first, second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn step_lookup_by_index() {
        let (module, _) = counting();
        assert_eq!(module.step(1).map(TutorialStep::title), Some("Two"));
        assert!(module.step(2).is_none());
    }

    #[test]
    fn debug_reports_build_state() {
        let (module, _) = counting();
        assert!(format!("{:?}", module).contains("built: false"));
        module.steps();
        assert!(format!("{:?}", module).contains("built: true"));
    }
}
