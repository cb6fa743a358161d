//! Shell command execution.
//!
//! Synchronous execution backs step validation checks, which are plain
//! predicates. Asynchronous execution backs step actions and the command
//! executor, which are awaited from the tutorial engine.

use crate::error::{Result, TutorialError};
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use super::platform::{shell_flag, shell_program};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    fn from_output(output: Output, options: &CommandOptions, duration: Duration) -> Self {
        let stdout = if options.capture_stdout {
            String::from_utf8_lossy(&output.stdout).to_string()
        } else {
            String::new()
        };

        let stderr = if options.capture_stderr {
            String::from_utf8_lossy(&output.stderr).to_string()
        } else {
            String::new()
        };

        if output.status.success() {
            Self::success(stdout, stderr, duration)
        } else {
            Self::failure(output.status.code(), stdout, stderr, duration)
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<std::path::PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Options that capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    fn stdio(capture: bool) -> Stdio {
        if capture {
            Stdio::piped()
        } else {
            Stdio::inherit()
        }
    }
}

/// Execute a shell command.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(shell_program());
    cmd.arg(shell_flag());
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(CommandOptions::stdio(options.capture_stdout));
    cmd.stderr(CommandOptions::stdio(options.capture_stderr));

    let output = cmd.output().map_err(|source| {
        tracing::warn!("Failed to start '{}': {}", command, source);
        TutorialError::CommandSpawn {
            command: command.to_string(),
            source,
        }
    })?;

    Ok(CommandResult::from_output(output, options, start.elapsed()))
}

/// Execute a command and return success/failure.
pub fn execute_check(command: &str, cwd: Option<&Path>) -> bool {
    let options = CommandOptions {
        cwd: cwd.map(|p| p.to_path_buf()),
        ..CommandOptions::captured()
    };

    execute(command, &options)
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Execute a shell command without blocking the async runtime.
pub async fn execute_async(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = tokio::process::Command::new(shell_program());
    cmd.arg(shell_flag());
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(CommandOptions::stdio(options.capture_stdout));
    cmd.stderr(CommandOptions::stdio(options.capture_stderr));
    cmd.kill_on_drop(true);

    let output = cmd.output().await.map_err(|source| {
        tracing::warn!("Failed to start '{}': {}", command, source);
        TutorialError::CommandSpawn {
            command: command.to_string(),
            source,
        }
    })?;

    Ok(CommandResult::from_output(output, options, start.elapsed()))
}
