//! Pull with automatic stash and restore of uncommitted local edits.
//!
//! Plain git refuses to pull over a dirty tree even when the dirty files
//! never overlap the incoming changes. This operation assumes the common
//! no-overlap case: shelve local edits, rebase-pull, restore. Conflicts
//! only reach the user when the optimistic path actually collides, and the
//! stash keeps the edits recoverable on every failure path.

use crate::config::settings::GitSettings;
use crate::git::GitError;
use crate::ops::results::PullResult;
use crate::ops::resolve_active;
use crate::repository::RepositoryManager;

/// Marker message for stashes created by the auto-stash step, so they are
/// recognizable in `git stash list` if a restore ever fails.
pub const AUTO_STASH_MESSAGE: &str = "gitdock: auto-stash before pull";

/// Pulls the current branch from its remote, shelving and restoring
/// uncommitted local edits around the pull.
///
/// Once the stash-pull-unstash sequence begins it runs to one of its
/// terminal outcomes; the per-repository mutation lock is held throughout.
pub async fn pull_current_branch(
    manager: &RepositoryManager,
    settings: &GitSettings,
) -> PullResult {
    let context = match resolve_active(manager).await {
        Ok(context) => context,
        Err(e) => return PullResult::failure(e.to_string()),
    };
    let _mutations = context.lock_mutations().await;
    let backend = context.backend();
    let remote = settings.remote.as_str();

    let branch = match backend.current_branch().await {
        Ok(branch) => branch,
        Err(e) => return PullResult::failure(e.to_string()),
    };

    match backend.fetch(remote, &branch).await {
        Ok(()) => context.mark_fetched(),
        Err(GitError::NoTrackingBranch(_)) => return PullResult::no_tracking(&branch),
        Err(e) => return PullResult::failure(format!("Fetch failed: {e}")),
    }

    let behind = match backend.behind_count(remote, &branch).await {
        Ok(behind) => behind,
        Err(e) => return PullResult::failure(e.to_string()),
    };
    if behind == 0 {
        return PullResult::up_to_date();
    }

    let status = match backend.status().await {
        Ok(status) => status,
        Err(e) => return PullResult::failure(e.to_string()),
    };

    let mut did_stash = false;
    if status.has_changes() {
        if !settings.auto_stash {
            return PullResult::failure(
                "Working tree has uncommitted changes and auto-stash is disabled. Commit or stash them first.",
            );
        }
        if let Err(e) = backend.stash_push(AUTO_STASH_MESSAGE).await {
            return PullResult::failure(format!("Failed to stash local changes: {e}"));
        }
        did_stash = true;
    }

    if let Err(pull_err) = backend.pull_rebase(remote, &branch).await {
        // Put the user's edits back before reporting anything; a failure
        // here is logged, never compounded onto the pull error.
        if did_stash {
            if let Err(pop_err) = backend.stash_pop().await {
                tracing::warn!("could not restore auto-stash after failed pull: {pop_err}");
            }
        }
        return match pull_err {
            GitError::Conflict(message) => {
                if let Err(abort_err) = backend.abort_rebase().await {
                    tracing::warn!("could not abort rebase after conflict: {abort_err}");
                }
                PullResult::conflict(message)
            }
            GitError::NoTrackingBranch(_) => PullResult::no_tracking(&branch),
            other => PullResult::failure(other.to_string()),
        };
    }

    if !did_stash {
        return PullResult::pulled(behind, false);
    }

    match backend.stash_pop().await {
        Ok(()) => PullResult::pulled(behind, true),
        Err(GitError::StashConflict(_)) => PullResult::restore_conflict(behind),
        Err(e) => {
            tracing::warn!("auto-stash left in stash list after failed pop: {e}");
            PullResult::left_in_stash(behind)
        }
    }
}
