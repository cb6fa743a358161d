//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// yt-tutorial - Interactive, resumable tutorials for the yt command-line client.
#[derive(Debug, Parser)]
#[command(name = "yt-tutorial")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides $YT_TUTORIAL_CONFIG and the user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the progress file (overrides the config setting)
    #[arg(long, global = true, value_name = "PATH")]
    pub progress_file: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available tutorials (default if no command specified)
    List(ListArgs),

    /// Run a tutorial from where you left off
    Run(RunArgs),

    /// Show tutorial progress
    Status(StatusArgs),

    /// Forget progress for a tutorial
    Reset(ResetArgs),

    /// Undo what a tutorial's steps set up
    Cleanup(CleanupArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Print only module ids, one per line
    #[arg(long)]
    pub ids: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Tutorial module id (see `yt-tutorial list`)
    pub module: String,

    /// Start at this step (1-based) instead of the saved position
    #[arg(short, long)]
    pub step: Option<usize>,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reset` command.
#[derive(Debug, Clone, Default, clap::Args)]
#[command(group(ArgGroup::new("target").required(true).args(["module", "all"])))]
pub struct ResetArgs {
    /// Tutorial module id
    pub module: Option<String>,

    /// Reset every tutorial
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `cleanup` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CleanupArgs {
    /// Tutorial module id
    pub module: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
