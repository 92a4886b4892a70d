//! Remote-synchronization command handlers for the gitdock CLI.
//!
//! This module implements the opinionated git workflows:
//! - [`handle_pull`] - Auto-stash-aware pull (`gitdock pull`)
//! - [`handle_commit`] - Behind-check-aware commit (`gitdock commit`)
//!
//! Handlers restore the last opened repository when needed, invoke the
//! operation, print its structured result, and map failures to a non-zero
//! exit code. The operations themselves never print.

use crate::cli::commands::repo::restore_active;
use crate::config::settings::GitdockConfig;
use crate::error::Result;
use crate::ops::{commit_changes, pull_current_branch};
use crate::repository::RepositoryManager;

/// Handles the `gitdock pull` command.
///
/// # Errors
///
/// Returns an error only for setup failures (no repository resolvable);
/// pull outcomes, including failures, are printed from the result record.
pub async fn handle_pull(manager: &RepositoryManager, config: &GitdockConfig) -> Result<()> {
    restore_active(manager).await?;

    let result = pull_current_branch(manager, &config.git).await;

    println!("{}", result.message);
    if result.had_conflicts {
        println!("\nResolve the conflicted files, then commit the result.");
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Handles the `gitdock commit` command.
///
/// # Errors
///
/// Returns an error only for setup failures (no repository resolvable);
/// commit outcomes are printed from the result record.
pub async fn handle_commit(
    manager: &RepositoryManager,
    config: &GitdockConfig,
    message: &str,
    description: Option<&str>,
    force: bool,
) -> Result<()> {
    restore_active(manager).await?;

    let result = commit_changes(manager, &config.git, message, description, force).await;

    println!("{}", result.message);
    if result.behind_remote {
        println!("\nRun 'gitdock pull' first, or 'gitdock commit --force' to commit anyway.");
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
