//! Progress spinners shown while a step action runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::TutorialTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running step actions.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: TutorialTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner:.magenta} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme: TutorialTheme::detect(),
        }
    }

    /// Create a spinner that doesn't show (for quiet and silent modes).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: TutorialTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes_without_panic() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("Checking installation");
        spinner.finish_success("Installed");
        assert!(spinner.bar.is_finished());
    }

    #[test]
    fn hidden_spinner_finishes_with_error() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.finish_error("Not installed");
        assert!(spinner.bar.is_finished());
    }
}
