//! Configuration loading and parsing.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use yt_tutorial::config::{load_config, ConfigSource};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//! fs::write(&path, "allowed_commands: [yt reports list]").unwrap();
//!
//! let config = load_config(&ConfigSource::Explicit(path)).unwrap();
//! assert_eq!(config.allowed_commands, vec!["yt reports list"]);
//! assert!(config.confirm_destructive);
//! ```
//!
//! # Configuration File Locations
//!
//! The first match wins:
//! 1. `--config <path>`
//! 2. `$YT_TUTORIAL_CONFIG`
//! 3. `<config dir>/yt-tutorial/config.yml` (optional)

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config, ConfigSource, CONFIG_ENV_VAR};
pub use schema::TutorialConfig;
