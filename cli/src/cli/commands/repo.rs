//! Repository command handlers for the gitdock CLI.
//!
//! This module implements the repository management commands:
//! - [`handle_open`] - Open a repository and make it active (`gitdock open`)
//! - [`handle_status`] - Show the active repository status (`gitdock status`)
//! - [`handle_repos`] - List recently opened repositories (`gitdock repos`)
//! - [`handle_close`] - Close the active repository (`gitdock close`)
//! - [`handle_completions`] - Generate shell completions
//!
//! These commands use the [`crate::repository`] module for context
//! management and persist the last opened repository in [`ClientState`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::ShellType;
use crate::config::state::ClientState;
use crate::error::Result;
use crate::repository::context::RepositoryContext;
use crate::repository::{RepositoryError, RepositoryManager};

/// Handles the `gitdock open [path]` command.
///
/// Opens the repository containing `path` (default: current directory),
/// marks it active, and records it as the last opened repository.
///
/// # Errors
///
/// Returns an error if the path is not inside a git repository or state
/// persistence fails.
pub async fn handle_open(manager: &RepositoryManager, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let context = manager.open(&path).await?;

    let mut state = ClientState::load()?;
    state.set_last_repository(context.path());
    state.save()?;

    println!("Opened repository '{}'.", context.name());
    println!("  Path:           {}", context.path().display());
    println!("  Default branch: {}", context.metadata().default_branch);
    println!("  Provider:       {}", context.metadata().provider);
    if let Some(url) = &context.metadata().remote_url {
        println!("  Remote:         {url}");
    }

    Ok(())
}

/// Handles the `gitdock status` command.
///
/// Shows the active repository with branch, commit, uncommitted-change
/// counts, and stash count.
///
/// # Errors
///
/// Returns an error if no repository can be resolved.
pub async fn handle_status(manager: &RepositoryManager) -> Result<()> {
    let context = restore_active(manager).await?;
    let backend = context.backend();

    let status = backend.status().await?;

    println!("Repository: {}\n", context.name());
    println!("  Path:   {}", context.path().display());
    println!("  Branch: {}", status.branch);
    println!("  Commit: {}", &status.commit_sha[..7]);

    if status.has_changes() {
        println!("  Status: dirty");
        if status.staged_count > 0 {
            println!("    Staged: {} file(s)", status.staged_count);
        }
        if status.modified_count > 0 {
            println!("    Modified: {} file(s)", status.modified_count);
        }
        if status.deleted_count > 0 {
            println!("    Deleted: {} file(s)", status.deleted_count);
        }
        if status.untracked_count > 0 {
            println!("    Untracked: {} file(s)", status.untracked_count);
        }
    } else {
        println!("  Status: clean");
    }

    let stashes = backend.stash_list().await?;
    if !stashes.is_empty() {
        println!("\n  Stashes: {}", stashes.len());
    }

    if let Some(fetched) = context.last_fetched() {
        println!("\n  Last fetched: {}", fetched.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

/// Handles the `gitdock repos` command.
///
/// Lists recently opened repositories, most recent first.
///
/// # Errors
///
/// Returns an error if state cannot be loaded.
pub fn handle_repos(limit: usize) -> Result<()> {
    let state = ClientState::load()?;
    let recent = state.recent(limit);

    if recent.is_empty() {
        println!("No repositories opened yet.");
        println!("\nOpen one with: gitdock open <path>");
        return Ok(());
    }

    println!("Recent repositories:\n");
    for entry in recent {
        let marker = if state.last_repository.as_deref() == Some(entry.path.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "  {marker} {}  ({})",
            entry.path,
            entry.opened_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Handles the `gitdock close` command.
///
/// Closes the active repository context. No other repository is promoted;
/// the next command must open one explicitly.
///
/// # Errors
///
/// Returns an error if state persistence fails.
pub async fn handle_close(manager: &RepositoryManager) -> Result<()> {
    let mut state = ClientState::load()?;

    let context = match manager.get_active() {
        Some(context) => Some(context),
        None => match &state.last_repository {
            Some(last) => manager.open(Path::new(last)).await.ok(),
            None => None,
        },
    };

    match context {
        Some(context) => {
            manager.close(context.id());
            state.clear_last_repository();
            state.save()?;
            println!("Closed repository '{}'.", context.name());
        }
        None => {
            println!("No repository is open.");
        }
    }

    Ok(())
}

/// Handles the `gitdock completions <shell>` command.
///
/// Generates shell completion scripts.
pub fn handle_completions(shell: ShellType) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell};

    let mut cmd = crate::cli::Cli::command();
    let shell = match shell {
        ShellType::Bash => Shell::Bash,
        ShellType::Zsh => Shell::Zsh,
        ShellType::Fish => Shell::Fish,
    };

    generate(shell, &mut cmd, "gitdock", &mut std::io::stdout());

    Ok(())
}

/// Resolves the active context, re-opening the last used repository when
/// this process has not opened one yet.
pub(crate) async fn restore_active(
    manager: &RepositoryManager,
) -> Result<Arc<RepositoryContext>> {
    if let Some(context) = manager.get_active() {
        return Ok(context);
    }

    let state = ClientState::load()?;
    match state.last_repository {
        Some(last) => Ok(manager.open(Path::new(&last)).await?),
        None => Err(RepositoryError::NoRepositorySelected.into()),
    }
}
