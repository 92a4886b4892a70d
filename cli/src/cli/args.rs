//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Desktop Git client core.
///
/// Gitdock manages per-repository contexts and runs opinionated git
/// workflows on the active one: pulls that shelve and restore your
/// uncommitted edits automatically, and commits that warn before you
/// diverge from the remote.
#[derive(Parser, Debug)]
#[command(name = "gitdock")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a repository and make it the active one.
    ///
    /// Any path inside the repository works; it is normalized to the
    /// repository root. Defaults to the current directory.
    Open {
        /// Path inside the repository to open.
        path: Option<PathBuf>,
    },

    /// Show the active repository and its git status.
    Status,

    /// Pull the current branch, auto-stashing uncommitted changes.
    ///
    /// Local edits are shelved before the rebase pull and restored
    /// afterwards; conflicts are only surfaced when they actually occur.
    Pull,

    /// Commit staged changes, warning if the remote has moved ahead.
    Commit {
        /// Commit message.
        #[arg(short, long)]
        message: String,

        /// Optional extended description (commit body).
        #[arg(short, long)]
        description: Option<String>,

        /// Commit even if the branch is behind the remote.
        #[arg(short, long)]
        force: bool,
    },

    /// List recently opened repositories.
    Repos {
        /// Maximum number of entries to show.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Close the active repository.
    Close,

    /// Generate shell completion scripts.
    ///
    /// Outputs completion script for the specified shell.
    /// Follow shell-specific instructions to install.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: ShellType,
    },
}

/// Supported shell types for the completions command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}
