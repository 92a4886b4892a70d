//! Git backend abstraction for gitdock.
//!
//! This module provides the trait every repository context binds to:
//! - [`GitBackend`] - Trait defining the git operations the core needs
//! - [`Git2Backend`] - Implementation using git2 for queries and the git
//!   CLI for working-tree mutations and network operations

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{BranchType, Repository, StatusOptions};

use crate::git::cli::GitCli;
use crate::git::error::GitError;
use crate::git::types::{RepoStatus, StashEntry};

/// Result alias local to the git layer.
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Trait for git operations bound to one repository root (enables mocking
/// in tests).
///
/// Implementations must never execute commands outside the root they were
/// created for; contexts rely on this to keep repositories isolated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// The repository root this backend operates on.
    fn path(&self) -> PathBuf;

    /// Gets the current branch name.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not attached to a
    /// branch.
    async fn current_branch(&self) -> GitResult<String>;

    /// Gets the current commit SHA.
    async fn head_commit(&self) -> GitResult<String>;

    /// Gets the repository status (staged/modified/deleted/untracked
    /// counts).
    async fn status(&self) -> GitResult<RepoStatus>;

    /// Number of commits the local branch is behind its remote tracking
    /// branch. A branch with no tracking ref is behind by zero.
    async fn behind_count(&self, remote: &str, branch: &str) -> GitResult<usize>;

    /// Fetch a single branch from the given remote.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoTrackingBranch`] when the branch does not
    /// exist on the remote.
    async fn fetch(&self, remote: &str, branch: &str) -> GitResult<()>;

    /// Pull the branch from its remote with rebase.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Conflict`] when the rebase hits textual
    /// conflicts and [`GitError::NoTrackingBranch`] when there is nothing
    /// to pull from.
    async fn pull_rebase(&self, remote: &str, branch: &str) -> GitResult<()>;

    /// Stash working-tree changes including untracked files.
    async fn stash_push(&self, message: &str) -> GitResult<()>;

    /// Pop the most recent stash.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::StashConflict`] when the restore produced
    /// conflicts; the entry is consumed and the conflicts are left in the
    /// working tree.
    async fn stash_pop(&self) -> GitResult<()>;

    /// Lists all stashes.
    async fn stash_list(&self) -> GitResult<Vec<StashEntry>>;

    /// Abort an in-progress rebase. No-op when none is in progress.
    async fn abort_rebase(&self) -> GitResult<()>;

    /// Commit currently staged content and return the new commit SHA.
    async fn commit(&self, message: &str) -> GitResult<String>;

    /// URL of the given remote, or `None` if it is not configured.
    async fn remote_url(&self, remote: &str) -> GitResult<Option<String>>;

    /// Branch the remote's HEAD advertises, if known locally.
    async fn remote_head_branch(&self, remote: &str) -> GitResult<Option<String>>;

    /// Local branch names, sorted.
    async fn local_branches(&self) -> GitResult<Vec<String>>;
}

/// Git backend implementation combining git2 queries with CLI mutations.
#[derive(Debug)]
pub struct Git2Backend {
    root: PathBuf,
    cli: GitCli,
}

impl Git2Backend {
    /// Discovers the repository containing `path` and binds a backend to
    /// its canonical root (the working-tree toplevel, never a
    /// subdirectory).
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if neither the path nor any of
    /// its ancestors is a git working tree.
    pub fn discover(path: &Path) -> GitResult<Self> {
        let repo = Repository::discover(path).map_err(|_| GitError::NotARepository)?;
        let root = repo
            .workdir()
            .ok_or_else(|| GitError::Git2("Bare repository not supported".to_string()))?
            .to_path_buf();

        Ok(Self {
            cli: GitCli::new(root.clone()),
            root,
        })
    }

    /// Opens the repository (internal helper).
    fn repo(&self) -> GitResult<Repository> {
        Repository::open(&self.root).map_err(|e| GitError::Git2(e.to_string()))
    }

    /// Sets repo-local user.name/email when missing so CLI commits don't
    /// fail on machines without a global identity.
    fn ensure_commit_identity(&self) -> GitResult<()> {
        let repo = self.repo()?;
        let cfg = repo.config().map_err(|e| GitError::Git2(e.to_string()))?;
        let has_name = cfg.get_string("user.name").is_ok();
        let has_email = cfg.get_string("user.email").is_ok();
        if !(has_name && has_email) {
            let mut cfg = repo.config().map_err(|e| GitError::Git2(e.to_string()))?;
            cfg.set_str("user.name", "Gitdock")
                .map_err(|e| GitError::Git2(e.to_string()))?;
            cfg.set_str("user.email", "noreply@gitdock.dev")
                .map_err(|e| GitError::Git2(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl GitBackend for Git2Backend {
    fn path(&self) -> PathBuf {
        self.root.clone()
    }

    async fn current_branch(&self) -> GitResult<String> {
        let repo = self.repo()?;
        let head = repo
            .head()
            .map_err(|e| GitError::Git2(format!("Cannot get HEAD: {e}")))?;

        if head.is_branch() {
            head.shorthand()
                .map(String::from)
                .ok_or_else(|| GitError::Git2("Invalid branch name".to_string()))
        } else {
            Err(GitError::DetachedHead)
        }
    }

    async fn head_commit(&self) -> GitResult<String> {
        let repo = self.repo()?;
        let commit = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| GitError::Git2(format!("Cannot get HEAD commit: {e}")))?;
        Ok(commit.id().to_string())
    }

    async fn status(&self) -> GitResult<RepoStatus> {
        let repo = self.repo()?;

        let head = repo
            .head()
            .map_err(|e| GitError::StatusFailed(format!("Cannot get HEAD: {e}")))?;
        let branch = if head.is_branch() {
            head.shorthand().unwrap_or("HEAD").to_string()
        } else {
            let sha = head
                .peel_to_commit()
                .map_err(|e| GitError::StatusFailed(e.to_string()))?
                .id()
                .to_string();
            format!("HEAD detached at {}", &sha[..7])
        };
        let commit_sha = head
            .peel_to_commit()
            .map_err(|e| GitError::StatusFailed(e.to_string()))?
            .id()
            .to_string();

        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::StatusFailed(e.to_string()))?;

        let mut staged = 0;
        let mut modified = 0;
        let mut deleted = 0;
        let mut untracked = 0;

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                staged += 1;
            }
            if status.is_wt_modified() || status.is_wt_renamed() || status.is_wt_typechange() {
                modified += 1;
            }
            if status.is_wt_deleted() {
                deleted += 1;
            }
            if status.is_wt_new() {
                untracked += 1;
            }
        }

        Ok(RepoStatus {
            branch,
            commit_sha,
            staged_count: staged,
            modified_count: modified,
            deleted_count: deleted,
            untracked_count: untracked,
        })
    }

    async fn behind_count(&self, remote: &str, branch: &str) -> GitResult<usize> {
        let repo = self.repo()?;
        let local = repo
            .find_branch(branch, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound(branch.to_string()))?;
        let Some(local_oid) = local.get().target() else {
            return Ok(0);
        };

        // Prefer the configured upstream; fall back to the conventional
        // remote-tracking ref. Neither existing means nothing to be behind.
        let upstream_oid = local
            .upstream()
            .ok()
            .and_then(|u| u.get().target())
            .or_else(|| {
                repo.find_reference(&format!("refs/remotes/{remote}/{branch}"))
                    .ok()
                    .and_then(|r| r.target())
            });
        let Some(upstream_oid) = upstream_oid else {
            return Ok(0);
        };

        let (_ahead, behind) = repo
            .graph_ahead_behind(local_oid, upstream_oid)
            .map_err(|e| GitError::Git2(e.to_string()))?;
        Ok(behind)
    }

    async fn fetch(&self, remote: &str, branch: &str) -> GitResult<()> {
        match self.cli.fetch(remote, branch).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_no_tracking() => Err(GitError::NoTrackingBranch(branch.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn pull_rebase(&self, remote: &str, branch: &str) -> GitResult<()> {
        match self.cli.pull_rebase(remote, branch).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_conflict() => Err(GitError::Conflict(first_line(&e.to_string()))),
            Err(e) if e.is_no_tracking() => Err(GitError::NoTrackingBranch(branch.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn stash_push(&self, message: &str) -> GitResult<()> {
        self.cli.stash_push(message).await?;
        Ok(())
    }

    async fn stash_pop(&self) -> GitResult<()> {
        match self.cli.stash_pop().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_conflict() => {
                // git keeps the entry on a conflicted pop; drop it so the
                // conflicted working tree is the single copy of the changes.
                if let Err(drop_err) = self.cli.stash_drop(0).await {
                    tracing::warn!("failed to drop stash after conflicted pop: {drop_err}");
                }
                Err(GitError::StashConflict(first_line(&e.to_string())))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn stash_list(&self) -> GitResult<Vec<StashEntry>> {
        let entries = self.cli.stash_list().await?;
        Ok(entries
            .into_iter()
            .map(|(index, message)| StashEntry { index, message })
            .collect())
    }

    async fn abort_rebase(&self) -> GitResult<()> {
        self.cli.abort_rebase().await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> GitResult<String> {
        self.ensure_commit_identity()?;
        self.cli.commit(message).await?;
        self.head_commit().await
    }

    async fn remote_url(&self, remote: &str) -> GitResult<Option<String>> {
        let repo = self.repo()?;
        Ok(repo
            .find_remote(remote)
            .ok()
            .and_then(|r| r.url().map(String::from)))
    }

    async fn remote_head_branch(&self, remote: &str) -> GitResult<Option<String>> {
        let repo = self.repo()?;
        let prefix = format!("refs/remotes/{remote}/");
        Ok(repo
            .find_reference(&format!("refs/remotes/{remote}/HEAD"))
            .ok()
            .and_then(|r| r.symbolic_target().map(String::from))
            .and_then(|target| target.strip_prefix(&prefix).map(String::from)))
    }

    async fn local_branches(&self) -> GitResult<Vec<String>> {
        let repo = self.repo()?;
        let branches = repo
            .branches(Some(BranchType::Local))
            .map_err(|e| GitError::Git2(e.to_string()))?;

        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(|e| GitError::Git2(e.to_string()))?;
            if let Ok(Some(name)) = branch.name() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// First line of a multi-line git error, for concise result messages.
fn first_line(msg: &str) -> String {
    msg.lines().next().unwrap_or(msg).to_string()
}
