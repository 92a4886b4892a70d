//! Commit gated on a remote behind-check.
//!
//! Surfacing divergence before the commit exists keeps it cheap to act on;
//! a deliberate "commit ahead, deal with it later" stays one `force` away.

use crate::config::settings::GitSettings;
use crate::ops::resolve_active;
use crate::ops::results::CommitResult;
use crate::repository::RepositoryManager;

/// Commits currently staged changes, warning first when the remote has
/// moved ahead.
///
/// When the local branch is behind and `force` is false, no commit is
/// created; the returned record carries the behind-count and the caller
/// decides whether to pull first or re-invoke with `force`.
pub async fn commit_changes(
    manager: &RepositoryManager,
    settings: &GitSettings,
    message: &str,
    description: Option<&str>,
    force: bool,
) -> CommitResult {
    let context = match resolve_active(manager).await {
        Ok(context) => context,
        Err(e) => return CommitResult::failure(e.to_string()),
    };
    let _mutations = context.lock_mutations().await;
    let backend = context.backend();
    let remote = settings.remote.as_str();

    let mut behind = 0;
    if settings.behind_check {
        // Behind-check only applies on a branch; a detached checkout has
        // no tracking branch to diverge from.
        if let Ok(branch) = backend.current_branch().await {
            match backend.fetch(remote, &branch).await {
                Ok(()) => context.mark_fetched(),
                Err(e) => tracing::debug!("silent fetch before commit failed: {e}"),
            }
            behind = match backend.behind_count(remote, &branch).await {
                Ok(behind) => behind,
                Err(e) => {
                    tracing::warn!("behind-check failed, committing without it: {e}");
                    0
                }
            };
        }

        if behind > 0 && !force {
            return CommitResult::behind(behind);
        }
    }

    // The optional extended description becomes the body paragraph.
    let full_message = match description {
        Some(description) if !description.trim().is_empty() => {
            format!("{message}\n\n{description}")
        }
        _ => message.to_string(),
    };

    match backend.commit(&full_message).await {
        Ok(sha) => CommitResult::committed(sha, behind),
        Err(e) => CommitResult::failure(e.to_string()),
    }
}
