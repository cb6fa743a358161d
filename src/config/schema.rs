//! Configuration schema definitions.
//!
//! This module contains the struct that maps to the YAML configuration
//! file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tutorial::declarative::ModuleDefinition;
use crate::tutorial::progress::ProgressTracker;

/// Root configuration structure for `config.yml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TutorialConfig {
    /// Where tutorial progress is stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_file: Option<PathBuf>,

    /// Extra command prefixes the example runner accepts
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_commands: Vec<String>,

    /// Ask before running example commands that look destructive
    #[serde(default = "default_true")]
    pub confirm_destructive: bool,

    /// Additional tutorial modules
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleDefinition>,
}

fn default_true() -> bool {
    true
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            progress_file: None,
            allowed_commands: Vec::new(),
            confirm_destructive: true,
            modules: Vec::new(),
        }
    }
}

impl TutorialConfig {
    /// Progress file location, falling back to the user config directory.
    pub fn progress_path(&self) -> PathBuf {
        self.progress_file
            .clone()
            .unwrap_or_else(ProgressTracker::default_path)
    }
}
