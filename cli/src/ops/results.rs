//! Structured result records for the opinionated operations.
//!
//! These are the plain records that cross the caller boundary: primitive
//! fields only, no error types, serializable as-is.

use serde::Serialize;

/// Outcome of [`crate::ops::pull_current_branch`].
#[derive(Debug, Clone, Serialize)]
pub struct PullResult {
    /// The pull itself reached a good terminal state.
    pub success: bool,

    /// Human-readable summary of what happened.
    pub message: String,

    /// Nothing to pull; no stash or pull command was run.
    pub up_to_date: bool,

    /// Conflicts occurred, during the rebase or while restoring the
    /// stash.
    pub had_conflicts: bool,

    /// Number of commits pulled.
    pub commits_pulled: usize,

    /// Uncommitted local edits were stashed before the pull.
    pub stashed_changes: bool,

    /// Local edits could not be restored and remain in the stash list.
    pub changes_left_in_stash: bool,
}

impl PullResult {
    /// Local branch already matches the remote.
    #[must_use]
    pub fn up_to_date() -> Self {
        Self {
            success: true,
            message: "Already up to date.".to_string(),
            up_to_date: true,
            had_conflicts: false,
            commits_pulled: 0,
            stashed_changes: false,
            changes_left_in_stash: false,
        }
    }

    /// Pull succeeded; local edits (if any) were stashed and restored.
    #[must_use]
    pub fn pulled(commits: usize, restored_changes: bool) -> Self {
        let message = if restored_changes {
            format!("Pulled {commits} commit(s) and restored your local changes.")
        } else {
            format!("Pulled {commits} commit(s).")
        };
        Self {
            success: true,
            message,
            up_to_date: false,
            had_conflicts: false,
            commits_pulled: commits,
            stashed_changes: restored_changes,
            changes_left_in_stash: false,
        }
    }

    /// Pull succeeded but restoring the stash produced conflicts the user
    /// must resolve in the working tree.
    #[must_use]
    pub fn restore_conflict(commits: usize) -> Self {
        Self {
            success: true,
            message: format!(
                "Pulled {commits} commit(s), but restoring your local changes produced conflicts. Resolve them in the working tree."
            ),
            up_to_date: false,
            had_conflicts: true,
            commits_pulled: commits,
            stashed_changes: true,
            changes_left_in_stash: false,
        }
    }

    /// Pull succeeded but the stash could not be popped; the edits stay in
    /// the stash list for manual recovery.
    #[must_use]
    pub fn left_in_stash(commits: usize) -> Self {
        Self {
            success: true,
            message: format!(
                "Pulled {commits} commit(s). Your local changes could not be restored automatically and remain stashed; run 'git stash pop' to recover them."
            ),
            up_to_date: false,
            had_conflicts: false,
            commits_pulled: commits,
            stashed_changes: true,
            changes_left_in_stash: true,
        }
    }

    /// The branch has no remote counterpart yet; an expected state for new
    /// branches, not a failure.
    #[must_use]
    pub fn no_tracking(branch: &str) -> Self {
        Self {
            success: true,
            message: format!(
                "Branch '{branch}' has no remote branch yet. It will be created on push."
            ),
            up_to_date: true,
            had_conflicts: false,
            commits_pulled: 0,
            stashed_changes: false,
            changes_left_in_stash: false,
        }
    }

    /// The remote's changes structurally conflict with local commits.
    #[must_use]
    pub fn conflict(message: String) -> Self {
        Self {
            success: false,
            message: format!("Pull failed with conflicts: {message}"),
            up_to_date: false,
            had_conflicts: true,
            commits_pulled: 0,
            stashed_changes: false,
            changes_left_in_stash: false,
        }
    }

    /// Unclassified failure, surfaced with the raw message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            up_to_date: false,
            had_conflicts: false,
            commits_pulled: 0,
            stashed_changes: false,
            changes_left_in_stash: false,
        }
    }
}

/// Outcome of [`crate::ops::commit_changes`].
#[derive(Debug, Clone, Serialize)]
pub struct CommitResult {
    /// A commit was created.
    pub success: bool,

    /// Human-readable summary of what happened.
    pub message: String,

    /// The remote has moved ahead; no commit was made and the caller must
    /// decide (pull first, or re-invoke with force).
    pub behind_remote: bool,

    /// Commits present on the remote but absent locally.
    pub behind_count: usize,

    /// SHA of the created commit.
    pub commit_sha: Option<String>,
}

impl CommitResult {
    /// A commit was created.
    #[must_use]
    pub fn committed(sha: String, behind_count: usize) -> Self {
        Self {
            success: true,
            message: format!("Created commit {}.", &sha[..sha.len().min(7)]),
            behind_remote: false,
            behind_count,
            commit_sha: Some(sha),
        }
    }

    /// The behind-gate fired: the caller must pull or force.
    #[must_use]
    pub fn behind(behind_count: usize) -> Self {
        Self {
            success: false,
            message: format!(
                "The remote has {behind_count} new commit(s). Pull first, or commit anyway with force."
            ),
            behind_remote: true,
            behind_count,
            commit_sha: None,
        }
    }

    /// Commit failed; raw message surfaced.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            behind_remote: false,
            behind_count: 0,
            commit_sha: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_to_date_runs_nothing() {
        let result = PullResult::up_to_date();
        assert!(result.success);
        assert!(result.up_to_date);
        assert!(!result.stashed_changes);
        assert_eq!(result.commits_pulled, 0);
    }

    #[test]
    fn restore_conflict_is_success_with_conflicts() {
        let result = PullResult::restore_conflict(3);
        assert!(result.success);
        assert!(result.had_conflicts);
        assert!(!result.changes_left_in_stash);
    }

    #[test]
    fn left_in_stash_points_at_recovery() {
        let result = PullResult::left_in_stash(2);
        assert!(result.success);
        assert!(result.changes_left_in_stash);
        assert!(result.message.contains("git stash pop"));
    }

    #[test]
    fn behind_result_carries_count() {
        let result = CommitResult::behind(4);
        assert!(!result.success);
        assert!(result.behind_remote);
        assert_eq!(result.behind_count, 4);
        assert!(result.commit_sha.is_none());
    }

    #[test]
    fn committed_shortens_sha_in_message() {
        let sha = "0123456789abcdef0123456789abcdef01234567".to_string();
        let result = CommitResult::committed(sha, 0);
        assert!(result.success);
        assert!(result.message.contains("0123456"));
        assert!(!result.message.contains("0123456789abcdef"));
    }

    #[test]
    fn results_serialize_to_plain_records() {
        let json = serde_json::to_value(PullResult::up_to_date()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["up_to_date"], true);

        let json = serde_json::to_value(CommitResult::behind(2)).unwrap();
        assert_eq!(json["behind_remote"], true);
        assert_eq!(json["behind_count"], 2);
    }
}
