//! Built-in tutorials embedded at compile time.

use include_dir::{include_dir, Dir};
use std::collections::HashSet;

use crate::error::{Result, TutorialError};

use super::declarative::ModuleDefinition;

/// Embedded tutorials directory.
static TUTORIALS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/tutorials");

/// Load every built-in module, ordered by file name.
pub fn builtin_modules() -> Result<Vec<ModuleDefinition>> {
    let mut files: Vec<_> = TUTORIALS_DIR
        .files()
        .filter(|f| {
            f.path()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
        })
        .collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut seen = HashSet::new();
    let mut modules = Vec::with_capacity(files.len());

    for file in files {
        let content = file
            .contents_utf8()
            .ok_or_else(|| TutorialError::ConfigParseError {
                path: file.path().to_path_buf(),
                message: "Invalid UTF-8".to_string(),
            })?;

        let module =
            ModuleDefinition::from_yaml(content).map_err(|e| TutorialError::ConfigParseError {
                path: file.path().to_path_buf(),
                message: e.to_string(),
            })?;
        module.validate()?;

        if !seen.insert(module.id.clone()) {
            return Err(TutorialError::InvalidModule {
                module_id: module.id,
                message: "duplicate built-in module id".to_string(),
            });
        }

        modules.push(module);
    }

    Ok(modules)
}
