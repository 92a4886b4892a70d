//! Git CLI runner bound to a single repository root.
//!
//! Working-tree mutations (stash, rebase-pull, commit) and network
//! operations (fetch) go through the `git` CLI rather than libgit2: the CLI
//! refuses to clobber uncommitted changes unless forced and handles the
//! user's native credential setup, neither of which libgit2 gives us for
//! free. Read-only queries stay on libgit2 in [`crate::git::backend`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

/// Errors from git CLI invocations.
#[derive(Debug, Error)]
pub enum GitCliError {
    /// The git executable could not be found or spawned.
    #[error("git executable not found or not runnable")]
    NotAvailable,

    /// A git command exited with a non-zero status.
    #[error("git command failed: {0}")]
    CommandFailed(String),
}

impl GitCliError {
    /// Checks if the failure output indicates a merge/rebase conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::CommandFailed(msg) => looks_like_conflict(msg),
            Self::NotAvailable => false,
        }
    }

    /// Checks if the failure output indicates a missing tracking branch.
    #[must_use]
    pub fn is_no_tracking(&self) -> bool {
        match self {
            Self::CommandFailed(msg) => looks_like_no_tracking(msg),
            Self::NotAvailable => false,
        }
    }
}

/// Returns true if a git failure message describes textual conflicts.
pub fn looks_like_conflict(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    msg.contains("CONFLICT")
        || lower.contains("could not apply")
        || lower.contains("resolve all conflicts")
        || lower.contains("needs merge")
}

/// Returns true if a git failure message describes a branch with no remote
/// counterpart (new local branch, nothing to pull).
pub fn looks_like_no_tracking(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("no tracking information")
        || lower.contains("couldn't find remote ref")
        || lower.contains("no upstream configured")
}

/// Git CLI handle bound exclusively to one repository root.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Creates a handle for the given repository root.
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    /// The repository root this handle operates on.
    #[allow(dead_code)]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    /// Fetch a single branch from the given remote.
    pub async fn fetch(&self, remote: &str, branch: &str) -> Result<String, GitCliError> {
        self.run(&["fetch", remote, branch]).await
    }

    /// Pull the given branch from its remote with rebase (never merge).
    pub async fn pull_rebase(&self, remote: &str, branch: &str) -> Result<String, GitCliError> {
        self.run(&["pull", "--rebase", remote, branch]).await
    }

    /// Stash working-tree changes, untracked files included.
    pub async fn stash_push(&self, message: &str) -> Result<String, GitCliError> {
        self.run(&["stash", "push", "--include-untracked", "-m", message])
            .await
    }

    /// Pop the most recent stash.
    pub async fn stash_pop(&self) -> Result<String, GitCliError> {
        self.run(&["stash", "pop"]).await
    }

    /// Drop a stash entry by index.
    pub async fn stash_drop(&self, index: usize) -> Result<String, GitCliError> {
        self.run(&["stash", "drop", &format!("stash@{{{index}}}")])
            .await
    }

    /// List stash entries as `(index, message)` pairs.
    pub async fn stash_list(&self) -> Result<Vec<(usize, String)>, GitCliError> {
        let out = self.run(&["stash", "list", "--format=%gd%x09%gs"]).await?;
        let mut entries = Vec::new();
        for line in out.lines() {
            let Some((selector, message)) = line.split_once('\t') else {
                continue;
            };
            // Selector looks like "stash@{0}".
            let index = selector
                .trim_start_matches("stash@{")
                .trim_end_matches('}')
                .parse::<usize>();
            if let Ok(index) = index {
                entries.push((index, message.to_string()));
            }
        }
        Ok(entries)
    }

    /// Commit currently staged content with the given message.
    pub async fn commit(&self, message: &str) -> Result<String, GitCliError> {
        self.run(&["commit", "-m", message]).await
    }

    /// Returns true if a rebase is in progress in this working tree.
    /// True when either of git's rebase state directories exists:
    /// rebase-merge (interactive) or rebase-apply (am-based).
    pub async fn is_rebase_in_progress(&self) -> Result<bool, GitCliError> {
        let rebase_merge = self.run(&["rev-parse", "--git-path", "rebase-merge"]).await?;
        let rebase_apply = self.run(&["rev-parse", "--git-path", "rebase-apply"]).await?;
        Ok(Path::new(rebase_merge.trim()).exists() || Path::new(rebase_apply.trim()).exists())
    }

    /// Abort an in-progress rebase. No-op if no rebase is in progress.
    pub async fn abort_rebase(&self) -> Result<(), GitCliError> {
        if !self.is_rebase_in_progress().await? {
            return Ok(());
        }
        self.run(&["rebase", "--abort"]).await.map(|_| ())
    }

    /// Run `git -C <root> <args...>` and return stdout on success.
    ///
    /// Credential prompts are disabled; an operation that would prompt
    /// fails instead of hanging a non-interactive caller.
    async fn run(&self, args: &[&str]) -> Result<String, GitCliError> {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::trace!(repo = ?self.repo_path, ?args, "running git command");

        let out = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitCliError::NotAvailable
            } else {
                GitCliError::CommandFailed(e.to_string())
            }
        })?;

        let stdout = String::from_utf8_lossy(&out.stdout).to_string();
        if out.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        let combined = match (stderr.is_empty(), stdout.trim().is_empty()) {
            (true, true) => "Command failed with no output".to_string(),
            (false, true) => stderr,
            (true, false) => stdout.trim().to_string(),
            (false, false) => format!("{stderr}\n{}", stdout.trim()),
        };
        Err(GitCliError::CommandFailed(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_classification_matches_git_output() {
        assert!(looks_like_conflict(
            "CONFLICT (content): Merge conflict in src/main.rs"
        ));
        assert!(looks_like_conflict("error: could not apply 1234abc"));
        assert!(looks_like_conflict(
            "hint: Resolve all conflicts manually, mark them as resolved"
        ));
        assert!(!looks_like_conflict("fatal: unable to access remote"));
    }

    #[test]
    fn no_tracking_classification_matches_git_output() {
        assert!(looks_like_no_tracking(
            "There is no tracking information for the current branch."
        ));
        assert!(looks_like_no_tracking(
            "fatal: couldn't find remote ref feature/new-thing"
        ));
        assert!(!looks_like_no_tracking("CONFLICT (content)"));
    }

    #[test]
    fn cli_error_predicates() {
        let conflict = GitCliError::CommandFailed("CONFLICT (content)".to_string());
        assert!(conflict.is_conflict());
        assert!(!conflict.is_no_tracking());

        let no_tracking =
            GitCliError::CommandFailed("no tracking information for the current branch".to_string());
        assert!(no_tracking.is_no_tracking());
        assert!(!GitCliError::NotAvailable.is_conflict());
    }

    #[tokio::test]
    async fn run_fails_outside_repository() {
        let temp = tempfile::TempDir::new().unwrap();
        let cli = GitCli::new(temp.path().to_path_buf());
        let result = cli.run(&["rev-parse", "HEAD"]).await;
        assert!(result.is_err());
    }

    #[test]
    fn stash_selector_parsing() {
        let line = "stash@{2}\tgitdock: auto-stash before pull";
        let (selector, message) = line.split_once('\t').unwrap();
        let index: usize = selector
            .trim_start_matches("stash@{")
            .trim_end_matches('}')
            .parse()
            .unwrap();
        assert_eq!(index, 2);
        assert_eq!(message, "gitdock: auto-stash before pull");
    }
}
