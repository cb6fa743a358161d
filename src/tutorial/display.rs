//! Rendering steps through the UI.

use crate::ui::UserInterface;

use super::module::TutorialModule;
use super::step::TutorialStep;

/// Show the module banner before the first displayed step.
pub fn show_module_intro(ui: &mut dyn UserInterface, module: &TutorialModule, start_index: usize) {
    ui.show_header(module.title());
    if !module.description().is_empty() {
        ui.message(module.description());
    }
    if start_index > 0 {
        ui.message(&format!(
            "Resuming at step {} of {}",
            start_index + 1,
            module.step_count()
        ));
    }
}

/// Show one step: position and title, then its content.
pub fn show_step(ui: &mut dyn UserInterface, step: &TutorialStep, index: usize, total: usize) {
    ui.show_header(&format!("[{}/{}] {}", index + 1, total, step.title()));

    if !step.description().is_empty() {
        ui.message(step.description());
    }

    if !step.get_instructions().is_empty() {
        ui.message("");
        for (n, text) in step.get_instructions().iter().enumerate() {
            ui.message(&format!("  {}. {}", n + 1, text));
        }
    }

    if let Some(command) = step.get_command_example() {
        ui.message("");
        ui.message("Example:");
        ui.message(&format!("  $ {}", command));
    }

    if let Some(command) = step.get_validation_command() {
        ui.message(&format!("Check your work with: {}", command));
    }

    for tip in step.get_tips() {
        ui.show_hint(tip);
    }
}
