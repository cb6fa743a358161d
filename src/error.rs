//! Error types for tutorial operations.
//!
//! This module defines [`TutorialError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TutorialError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TutorialError::Other`) for unexpected errors
//! - Author-supplied step actions return `anyhow::Result`; the engine turns
//!   their failures into the retry/skip/quit path instead of propagating them

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tutorial operations.
#[derive(Debug, Error)]
pub enum TutorialError {
    /// No module is registered under the given id.
    #[error("Unknown tutorial module: {module_id}")]
    UnknownModule { module_id: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or tutorial file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A module definition breaks a content contract.
    #[error("Invalid tutorial module '{module_id}': {message}")]
    InvalidModule { module_id: String, message: String },

    /// Command is not on the executor's allow-list.
    #[error("Command not allowed: {command}")]
    CommandRejected { command: String },

    /// Command could not be split into arguments.
    #[error("Could not parse command '{command}': {message}")]
    CommandParse { command: String, message: String },

    /// Shell could not be started for a command.
    #[error("Failed to start '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for tutorial operations.
pub type Result<T> = std::result::Result<T, TutorialError>;
