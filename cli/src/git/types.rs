//! Git-related types for gitdock.
//!
//! This module defines data structures for git operations:
//! - [`RepoStatus`] - Current repository state (branch, changes, etc.)
//! - [`StashEntry`] - A git stash entry

use serde::{Deserialize, Serialize};

/// Status of a git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    /// Current branch name, or a detached-HEAD description.
    pub branch: String,

    /// Current commit SHA.
    pub commit_sha: String,

    /// Number of staged files.
    pub staged_count: usize,

    /// Number of modified (unstaged) files.
    pub modified_count: usize,

    /// Number of deleted (unstaged) files.
    pub deleted_count: usize,

    /// Number of untracked files.
    pub untracked_count: usize,
}

impl RepoStatus {
    /// Returns true if there are any uncommitted changes (staged, modified,
    /// deleted, or untracked).
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.staged_count > 0
            || self.modified_count > 0
            || self.deleted_count > 0
            || self.untracked_count > 0
    }

    /// Returns the total count of changed files.
    #[allow(dead_code)]
    #[must_use]
    pub const fn total_changes(&self) -> usize {
        self.staged_count + self.modified_count + self.deleted_count + self.untracked_count
    }
}

/// Represents a git stash entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashEntry {
    /// Stash index (e.g., 0 for stash@{0}).
    pub index: usize,

    /// Stash message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_status() -> RepoStatus {
        RepoStatus {
            branch: "main".to_string(),
            commit_sha: "abc123".to_string(),
            staged_count: 0,
            modified_count: 0,
            deleted_count: 0,
            untracked_count: 0,
        }
    }

    #[test]
    fn repo_status_has_changes() {
        let clean = clean_status();
        assert!(!clean.has_changes());

        let with_staged = RepoStatus {
            staged_count: 1,
            ..clean.clone()
        };
        assert!(with_staged.has_changes());

        let with_modified = RepoStatus {
            modified_count: 2,
            ..clean.clone()
        };
        assert!(with_modified.has_changes());

        let with_deleted = RepoStatus {
            deleted_count: 1,
            ..clean.clone()
        };
        assert!(with_deleted.has_changes());

        let with_untracked = RepoStatus {
            untracked_count: 3,
            ..clean
        };
        assert!(with_untracked.has_changes());
    }

    #[test]
    fn repo_status_total_changes() {
        let status = RepoStatus {
            staged_count: 1,
            modified_count: 2,
            deleted_count: 1,
            untracked_count: 3,
            ..clean_status()
        };
        assert_eq!(status.total_changes(), 7);
    }
}
