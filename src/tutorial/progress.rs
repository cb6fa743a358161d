//! Resumable tutorial progress.
//!
//! Progress for every module lives in one JSON document keyed by module id.
//! [`ProgressTracker`] keeps the whole document in memory and rewrites it
//! on each change. Persistence is best effort: failures are logged and the
//! tutorial carries on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the progress document inside the config directory.
pub const PROGRESS_FILE_NAME: &str = "tutorial_progress.json";

/// Resumable state for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialProgress {
    pub module_id: String,

    /// Zero-based index of the step to resume at.
    #[serde(default)]
    pub current_step: usize,

    /// Indices of steps finished with "next".
    #[serde(default)]
    pub completed_steps: BTreeSet<usize>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// Set once the whole step sequence has been walked.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TutorialProgress {
    /// Fresh progress positioned at the first step.
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            current_step: 0,
            completed_steps: BTreeSet::new(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_in_progress(&self) -> bool {
        !self.is_completed() && self.current_step > 0
    }
}

/// Aggregate counts over stored progress records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub total: usize,
}

/// Loads, caches, and persists progress records.
#[derive(Debug)]
pub struct ProgressTracker {
    path: PathBuf,
    cache: BTreeMap<String, TutorialProgress>,
}

impl ProgressTracker {
    /// Open the tracker backed by `path`, loading whatever is readable.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = Self::load(&path);
        tracing::debug!(
            "Loaded {} progress record(s) from {}",
            cache.len(),
            path.display()
        );
        Self { path, cache }
    }

    /// Default location of the progress document.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yt-tutorial")
            .join(PROGRESS_FILE_NAME)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> BTreeMap<String, TutorialProgress> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read progress file {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable progress file {}: {}",
                    path.display(),
                    e
                );
                BTreeMap::new()
            }
        }
    }

    fn write(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(&self.cache)
            .map_err(|e| anyhow::anyhow!("Failed to serialize progress: {}", e))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.write() {
            tracing::warn!(
                "Failed to save tutorial progress to {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Stored progress for a module.
    pub fn get_progress(&self, module_id: &str) -> Option<&TutorialProgress> {
        self.cache.get(module_id)
    }

    /// Upsert a record and rewrite the document.
    ///
    /// Stamps `started_at` on the caller's record the first time it is saved.
    pub fn save_progress(&mut self, progress: &mut TutorialProgress) {
        if progress.started_at.is_none() {
            progress.started_at = Some(Utc::now());
        }

        self.cache
            .insert(progress.module_id.clone(), progress.clone());
        self.persist();
    }

    /// Remove a module's record. Returns false if there was none.
    pub fn reset_progress(&mut self, module_id: &str) -> bool {
        if self.cache.remove(module_id).is_none() {
            return false;
        }

        tracing::info!("Reset progress for '{}'", module_id);
        self.persist();
        true
    }

    /// Remove every record, returning how many there were.
    pub fn reset_all(&mut self) -> usize {
        let count = self.cache.len();
        if count > 0 {
            self.cache.clear();
            self.persist();
        }
        count
    }

    /// A copy of every stored record.
    pub fn get_all_progress(&self) -> BTreeMap<String, TutorialProgress> {
        self.cache.clone()
    }

    /// Counts over stored records only; modules never started are absent.
    pub fn get_completion_stats(&self) -> CompletionStats {
        let mut stats = CompletionStats {
            total: self.cache.len(),
            ..Default::default()
        };

        for progress in self.cache.values() {
            if progress.is_completed() {
                stats.completed += 1;
            } else if progress.current_step > 0 {
                stats.in_progress += 1;
            } else {
                stats.not_started += 1;
            }
        }

        stats
    }
}
