//! Allow-list gated execution of tutorial example commands.
//!
//! Only commands starting with an allowed `yt` prefix are run. Commands that
//! look like they change data ask for confirmation first. Every failure
//! (rejection, decline, parse error, non-zero exit) is reported through the
//! UI and returned as `false`.

use async_trait::async_trait;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use crate::error::{Result, TutorialError};
use crate::shell::{execute_async, CommandOptions, CommandResult};
use crate::ui::{confirm, UserInterface};

/// Prefixes every executor allows unless removed.
pub const DEFAULT_ALLOWED_COMMANDS: &[&str] = &[
    "yt --help",
    "yt --version",
    "yt auth login",
    "yt auth token",
    "yt config list",
    "yt config get",
    "yt config set",
    "yt projects list",
    "yt projects show",
    "yt issues list",
    "yt issues search",
    "yt issues show",
    "yt issues create",
    "yt issues update",
    "yt issues delete",
    "yt issues comments",
    "yt articles list",
    "yt boards list",
    "yt time list",
    "yt users list",
    "yt tutorial",
];

/// Substrings that mark a command as possibly destructive.
const DESTRUCTIVE_KEYWORDS: &[&str] = &["delete", "remove", "rm", "update", "modify", "create"];

/// Prompt key used for the destructive-command confirmation.
pub const CONFIRM_PROMPT_KEY: &str = "confirm_command";

/// `source <file> &&` or `source <file>;`. The file must be a plain path.
static SOURCE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*source\s+([A-Za-z0-9_./~-]+)\s*(&&|;)\s*").expect("valid regex")
});

static SHELL_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;&|`<>\n]|\$\(").expect("valid regex"));

/// Runs a command line and reports its outcome.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<CommandResult>;
}

/// Runs commands in a subshell, capturing output.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    options: CommandOptions,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            options: CommandOptions::captured(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandResult> {
        let command = dot_source(command);
        tracing::debug!("Running '{}'", command);
        execute_async(&command, &self.options).await
    }
}

/// Rewrite a leading `source <file>` to the POSIX `. <file>`.
///
/// `sh` has no `source` builtin, and its `.` searches `PATH` for a bare
/// file name, so such names are anchored to the working directory.
pub fn dot_source(command: &str) -> Cow<'_, str> {
    let Some(caps) = SOURCE_PREFIX.captures(command) else {
        return Cow::Borrowed(command);
    };
    let (Some(whole), Some(file), Some(separator)) = (caps.get(0), caps.get(1), caps.get(2))
    else {
        return Cow::Borrowed(command);
    };

    let file = file.as_str();
    let path = if file.contains('/') || file.starts_with('~') {
        file.to_string()
    } else {
        format!("./{}", file)
    };

    Cow::Owned(format!(
        ". {} {} {}",
        path,
        separator.as_str(),
        &command[whole.end()..]
    ))
}

/// Allow-list gated command executor.
pub struct CommandExecutor {
    allowed: BTreeSet<String>,
    runner: Arc<dyn CommandRunner>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("allowed", &self.allowed)
            .finish_non_exhaustive()
    }
}

impl CommandExecutor {
    /// Executor with the default allow-list that runs commands in a subshell.
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ShellRunner::new()))
    }

    /// Executor with the default allow-list and a custom runner.
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            allowed: DEFAULT_ALLOWED_COMMANDS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            runner,
        }
    }

    /// Add extra allowed prefixes.
    pub fn with_allowed_commands<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in prefixes {
            self.add_allowed_command(prefix);
        }
        self
    }

    /// Allow commands starting with `prefix` on this executor.
    pub fn add_allowed_command(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into().trim().to_string();
        if !prefix.is_empty() {
            self.allowed.insert(prefix);
        }
    }

    /// Stop allowing `prefix`. Returns false if it was not allowed.
    pub fn remove_allowed_command(&mut self, prefix: &str) -> bool {
        self.allowed.remove(prefix.trim())
    }

    /// Allowed prefixes in sorted order.
    pub fn allowed_commands(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    /// Drop a leading `source <file> &&` or `source <file>;`.
    pub fn strip_source_prefix(command: &str) -> &str {
        match SOURCE_PREFIX.find(command) {
            Some(m) => &command[m.end()..],
            None => command,
        }
    }

    /// Whether the command starts with an allowed prefix on a word boundary.
    pub fn is_command_allowed(&self, command: &str) -> bool {
        let body = Self::strip_source_prefix(command).trim();
        if body.is_empty() || SHELL_CONTROL.is_match(body) {
            return false;
        }

        self.allowed.iter().any(|prefix| {
            body == prefix
                || body
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with(char::is_whitespace))
        })
    }

    /// Whether the command looks like it changes data.
    pub fn is_destructive(command: &str) -> bool {
        let lower = command.to_lowercase();
        DESTRUCTIVE_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Split a command line into arguments using shell quoting rules.
    ///
    /// Supports single quotes, double quotes with backslash escapes, and
    /// backslash escapes outside quotes.
    pub fn parse_command(command: &str) -> Result<Vec<String>> {
        let parse_error = |message: &str| TutorialError::CommandParse {
            command: command.to_string(),
            message: message.to_string(),
        };

        let mut args = Vec::new();
        let mut current = String::new();
        let mut in_word = false;
        let mut chars = command.chars();

        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    in_word = true;
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some(ch) => current.push(ch),
                            None => return Err(parse_error("unterminated single quote")),
                        }
                    }
                }
                '"' => {
                    in_word = true;
                    loop {
                        match chars.next() {
                            Some('"') => break,
                            Some('\\') => match chars.next() {
                                Some(ch @ ('"' | '\\' | '$' | '`')) => current.push(ch),
                                Some(ch) => {
                                    current.push('\\');
                                    current.push(ch);
                                }
                                None => return Err(parse_error("unterminated double quote")),
                            },
                            Some(ch) => current.push(ch),
                            None => return Err(parse_error("unterminated double quote")),
                        }
                    }
                }
                '\\' => match chars.next() {
                    Some(ch) => {
                        in_word = true;
                        current.push(ch);
                    }
                    None => return Err(parse_error("trailing backslash")),
                },
                c if c.is_whitespace() => {
                    if in_word {
                        args.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    in_word = true;
                    current.push(c);
                }
            }
        }

        if in_word {
            args.push(current);
        }

        Ok(args)
    }

    /// Run an example command if allowed, confirming destructive ones.
    pub async fn execute_command(
        &self,
        command: &str,
        require_confirmation: bool,
        ui: &mut dyn UserInterface,
    ) -> bool {
        if !self.is_command_allowed(command) {
            tracing::warn!("Rejected command not on the allow-list: {}", command);
            ui.error(&TutorialError::CommandRejected {
                command: command.to_string(),
            }
            .to_string());
            ui.show_hint("Only yt commands used in the tutorials can be run from here");
            return false;
        }

        if let Err(e) = Self::parse_command(command) {
            ui.error(&e.to_string());
            return false;
        }

        if require_confirmation && Self::is_destructive(command) {
            let question = format!("'{}' may modify data. Run it?", command);
            if !confirm(ui, CONFIRM_PROMPT_KEY, &question, false) {
                ui.warning("Command cancelled");
                return false;
            }
        }

        ui.message(&format!("$ {}", command));
        let result = match self.runner.run(command).await {
            Ok(result) => result,
            Err(e) => {
                ui.error(&format!("Failed to run command: {}", e));
                return false;
            }
        };

        tracing::debug!("Command '{}' exited with {:?}", command, result.exit_code);

        if ui.output_mode().shows_command_output() {
            let stdout = result.stdout.trim_end();
            if !stdout.is_empty() {
                ui.message(stdout);
            }
        }

        if result.success {
            ui.success("Command completed successfully");
            true
        } else {
            let stderr = result.stderr.trim_end();
            if !stderr.is_empty() {
                ui.warning(stderr);
            }
            let code = result
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            ui.error(&format!("Command failed with exit code {}", code));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<String>>,
        exit_code: i32,
    }

    impl RecordingRunner {
        fn failing(exit_code: i32) -> Self {
            Self {
                exit_code,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &str) -> Result<CommandResult> {
            self.calls.lock().unwrap().push(command.to_string());
            if self.exit_code == 0 {
                Ok(CommandResult::success(
                    "PROJ-1 Fix login\n".to_string(),
                    String::new(),
                    Duration::ZERO,
                ))
            } else {
                Ok(CommandResult::failure(
                    Some(self.exit_code),
                    String::new(),
                    "not authorized\n".to_string(),
                    Duration::ZERO,
                ))
            }
        }
    }

    fn recording() -> (CommandExecutor, Arc<RecordingRunner>) {
        let runner = Arc::new(RecordingRunner::default());
        (CommandExecutor::with_runner(runner.clone()), runner)
    }

    #[test]
    fn allows_default_prefixes() {
        let executor = CommandExecutor::new();
        assert!(executor.is_command_allowed("yt --help"));
        assert!(executor.is_command_allowed("yt issues list --project DEMO"));
        assert!(executor.is_command_allowed("yt issues delete PROJ-1"));
        assert!(!executor.is_command_allowed("rm -rf /"));
        assert!(!executor.is_command_allowed(""));
    }

    #[test]
    fn prefix_must_end_on_word_boundary() {
        let executor = CommandExecutor::new();
        assert!(!executor.is_command_allowed("yt issues listall"));
        assert!(!executor.is_command_allowed("yt"));
    }

    #[test]
    fn source_prefix_is_stripped() {
        let executor = CommandExecutor::new();
        assert!(executor.is_command_allowed("source .env && yt projects list"));
        assert!(executor.is_command_allowed("source ~/.yt.env; yt issues list"));
        assert!(!executor.is_command_allowed("source .env && rm -rf /"));
        assert_eq!(
            CommandExecutor::strip_source_prefix("source .env && yt --help"),
            "yt --help"
        );
    }

    #[test]
    fn source_file_cannot_hide_a_second_command() {
        let executor = CommandExecutor::new();
        assert!(!executor.is_command_allowed("source a;touch${IFS}x; yt --help"));
        assert!(!executor.is_command_allowed("source .env;touch${IFS}/tmp/x; yt --help"));
        assert!(!executor.is_command_allowed("source $(id) && yt --help"));
        assert!(!executor.is_command_allowed("source `id` && yt --help"));
        assert!(!executor.is_command_allowed("source a|b && yt --help"));
        assert!(executor.is_command_allowed("source ./env/yt-prod.sh && yt --help"));
    }

    #[tokio::test]
    async fn smuggled_command_is_never_run() {
        let temp = tempfile::TempDir::new().unwrap();
        let marker = temp.path().join("marker");
        let executor = CommandExecutor::new();
        let mut ui = MockUI::new();

        let command = format!("source a;touch${{IFS}}{}; yt --help", marker.display());
        assert!(!executor.execute_command(&command, false, &mut ui).await);
        assert!(!marker.exists());
        assert!(ui.has_error("Command not allowed"));
    }

    #[test]
    fn dot_source_rewrites_for_posix_sh() {
        assert_eq!(dot_source("source .env && yt --help"), ". ./.env && yt --help");
        assert_eq!(dot_source("source ~/.yt.env; yt issues list"), ". ~/.yt.env ; yt issues list");
        assert_eq!(dot_source("source /etc/yt.env&&yt --help"), ". /etc/yt.env && yt --help");
        assert_eq!(dot_source("yt issues list"), "yt issues list");
    }

    #[tokio::test]
    async fn shell_runner_sources_environment_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let env_file = temp.path().join("env.sh");
        std::fs::write(&env_file, "export YT_TUTORIAL_GREETING=reached\n").unwrap();

        let result = ShellRunner::new()
            .run(&format!(
                "source {} && echo $YT_TUTORIAL_GREETING",
                env_file.display()
            ))
            .await
            .unwrap();

        assert!(result.success, "stderr: {}", result.stderr);
        assert!(result.stdout.contains("reached"));
    }

    #[test]
    fn chained_commands_are_rejected() {
        let executor = CommandExecutor::new();
        assert!(!executor.is_command_allowed("yt issues list && rm -rf /"));
        assert!(!executor.is_command_allowed("yt issues list | sh"));
        assert!(!executor.is_command_allowed("yt issues list $(whoami)"));
        assert!(!executor.is_command_allowed("yt issues list > out.txt"));
    }

    #[test]
    fn allow_list_is_per_instance() {
        let mut first = CommandExecutor::new();
        first.add_allowed_command("yt reports list");
        assert!(first.remove_allowed_command("yt issues list"));
        assert!(!first.remove_allowed_command("yt issues list"));

        let second = CommandExecutor::new();
        assert!(first.is_command_allowed("yt reports list"));
        assert!(!first.is_command_allowed("yt issues list"));
        assert!(!second.is_command_allowed("yt reports list"));
        assert!(second.is_command_allowed("yt issues list"));
    }

    #[test]
    fn with_allowed_commands_ignores_blank_prefixes() {
        let executor = CommandExecutor::new().with_allowed_commands(["  ", "yt reports list"]);
        assert!(executor.allowed_commands().all(|c| !c.is_empty()));
        assert!(executor.is_command_allowed("yt reports list --top 5"));
    }

    #[test]
    fn destructive_detection_is_case_insensitive() {
        assert!(CommandExecutor::is_destructive("yt issues DELETE PROJ-1"));
        assert!(CommandExecutor::is_destructive("yt issues create DEMO \"Title\""));
        assert!(!CommandExecutor::is_destructive("yt issues list"));
    }

    #[test]
    fn parse_command_handles_quotes() {
        let args =
            CommandExecutor::parse_command(r#"yt issues create DEMO "Fix the bug" --tag 'needs review'"#)
                .unwrap();
        assert_eq!(
            args,
            vec!["yt", "issues", "create", "DEMO", "Fix the bug", "--tag", "needs review"]
        );
    }

    #[test]
    fn parse_command_handles_escapes_and_empty_quotes() {
        let args = CommandExecutor::parse_command(r#"yt a\ b "say \"hi\"" ''"#).unwrap();
        assert_eq!(args, vec!["yt", "a b", "say \"hi\"", ""]);
    }

    #[test]
    fn parse_command_rejects_unbalanced_quotes() {
        assert!(matches!(
            CommandExecutor::parse_command("yt issues create \"oops"),
            Err(TutorialError::CommandParse { .. })
        ));
        assert!(CommandExecutor::parse_command("yt 'oops").is_err());
        assert!(CommandExecutor::parse_command("yt oops\\").is_err());
    }

    #[tokio::test]
    async fn rejected_command_never_runs() {
        let (executor, runner) = recording();
        let mut ui = MockUI::new();

        assert!(!executor.execute_command("rm -rf /", true, &mut ui).await);
        assert!(runner.calls().is_empty());
        assert!(ui.has_error("Command not allowed"));
    }

    #[tokio::test]
    async fn declined_confirmation_never_runs() {
        let (executor, runner) = recording();
        let mut ui = MockUI::new();
        ui.set_prompt_response(CONFIRM_PROMPT_KEY, "no");

        assert!(
            !executor
                .execute_command("yt issues delete PROJ-1", true, &mut ui)
                .await
        );
        assert!(runner.calls().is_empty());
        assert_eq!(ui.prompts_shown(), &[CONFIRM_PROMPT_KEY]);
        assert!(ui.has_warning("cancelled"));
    }

    #[tokio::test]
    async fn accepted_confirmation_runs() {
        let (executor, runner) = recording();
        let mut ui = MockUI::new();
        ui.set_prompt_response(CONFIRM_PROMPT_KEY, "yes");

        assert!(
            executor
                .execute_command("yt issues update PROJ-1 --state Fixed", true, &mut ui)
                .await
        );
        assert_eq!(runner.calls(), vec!["yt issues update PROJ-1 --state Fixed"]);
    }

    #[tokio::test]
    async fn confirmation_can_be_disabled() {
        let (executor, runner) = recording();
        let mut ui = MockUI::new();

        assert!(
            executor
                .execute_command("yt issues delete PROJ-1", false, &mut ui)
                .await
        );
        assert!(ui.prompts_shown().is_empty());
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn successful_run_shows_output() {
        let (executor, _) = recording();
        let mut ui = MockUI::new();

        assert!(executor.execute_command("yt issues list", true, &mut ui).await);
        assert!(ui.has_message("$ yt issues list"));
        assert!(ui.has_message("PROJ-1 Fix login"));
        assert!(ui.has_success("completed successfully"));
    }

    #[tokio::test]
    async fn non_zero_exit_returns_false() {
        let runner = Arc::new(RecordingRunner::failing(3));
        let executor = CommandExecutor::with_runner(runner.clone());
        let mut ui = MockUI::new();

        assert!(!executor.execute_command("yt projects list", true, &mut ui).await);
        assert!(ui.has_warning("not authorized"));
        assert!(ui.has_error("exit code 3"));
    }

    #[tokio::test]
    async fn unparsable_command_returns_false() {
        let (executor, runner) = recording();
        let mut ui = MockUI::new();

        assert!(
            !executor
                .execute_command("yt issues search \"unterminated", true, &mut ui)
                .await
        );
        assert!(runner.calls().is_empty());
        assert!(ui.has_error("Could not parse"));
    }

    #[tokio::test]
    async fn shell_runner_runs_in_subshell() {
        let result = ShellRunner::new().run("echo tutorial").await.unwrap();
        assert!(result.success);
        assert!(result.stdout.contains("tutorial"));
    }
}
