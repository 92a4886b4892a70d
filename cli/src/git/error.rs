//! Git-specific error types.
//!
//! This module defines error types for git operations:
//! - [`GitError`] - All git-related errors with user-friendly messages

use thiserror::Error;

use crate::git::cli::GitCliError;

/// Errors specific to git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Not in a git repository.
    #[error("Not a git repository. Run 'git init' or select a git repository.")]
    NotARepository,

    /// HEAD is not attached to a branch.
    #[error("HEAD is detached. Check out a branch before pulling.")]
    DetachedHead,

    /// The current branch has no remote counterpart configured.
    #[error("Branch '{0}' has no tracking branch. It will be created on push.")]
    NoTrackingBranch(String),

    /// Branch not found.
    #[error("Branch '{0}' not found.")]
    BranchNotFound(String),

    /// The incoming changes conflict with local commits.
    #[error("Git operation failed due to conflicts: {0}")]
    Conflict(String),

    /// Restoring stashed changes produced conflicts.
    #[error("Restoring stashed changes produced conflicts: {0}")]
    StashConflict(String),

    /// A git CLI invocation failed.
    #[error(transparent)]
    Cli(#[from] GitCliError),

    /// General git2 library error.
    #[error("Git error: {0}")]
    Git2(String),

    /// Failed to determine repository state.
    #[error("Failed to get repository status: {0}")]
    StatusFailed(String),
}

#[allow(dead_code)]
impl GitError {
    /// Checks if this error indicates a repository is not found.
    #[must_use]
    pub const fn is_not_repository(&self) -> bool {
        matches!(self, Self::NotARepository)
    }

    /// Checks if this error is due to conflicts, from either a rebase or a
    /// stash restore.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::StashConflict(_))
    }

    /// Checks if this error is the benign "no tracking branch" state.
    #[must_use]
    pub const fn is_no_tracking(&self) -> bool {
        matches!(self, Self::NoTrackingBranch(_))
    }
}
