//! Repository context: identity, canonical path, git handle, and cached
//! metadata for one open repository.
//!
//! A context is created once per repository root and owns its git backend
//! exclusively; commands for one repository can never leak into another.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::git::{Git2Backend, GitBackend, GitError};
use crate::repository::error::RepositoryError;

/// Remote hosting provider, classified from the `origin` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
    Azure,
    /// No remote, or an unrecognized host.
    Local,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
            Self::Azure => "azure",
            Self::Local => "local",
        };
        write!(f, "{name}")
    }
}

/// Detect the hosting provider from a remote URL.
///
/// Classification is by substring; no URL matches more than one category
/// in practice.
#[must_use]
pub fn detect_provider(remote_url: Option<&str>) -> Provider {
    let Some(url) = remote_url else {
        return Provider::Local;
    };
    let lower = url.to_lowercase();

    if lower.contains("github.com") {
        Provider::GitHub
    } else if lower.contains("gitlab") {
        Provider::GitLab
    } else if lower.contains("bitbucket") {
        Provider::Bitbucket
    } else if lower.contains("azure.com") || lower.contains("visualstudio.com") {
        Provider::Azure
    } else {
        Provider::Local
    }
}

/// Metadata computed once when a context is created.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryMetadata {
    /// Default branch: the remote's advertised HEAD when known, otherwise
    /// a local fallback.
    pub default_branch: String,

    /// URL of the configured remote, if any.
    pub remote_url: Option<String>,

    /// Hosting provider classified from the remote URL.
    pub provider: Provider,
}

/// One open repository: identity, canonical root path, exclusive git
/// handle, and cached metadata.
pub struct RepositoryContext {
    id: Uuid,
    path: PathBuf,
    name: String,
    metadata: RepositoryMetadata,
    backend: Arc<dyn GitBackend>,
    last_fetched: RwLock<Option<DateTime<Utc>>>,
    last_accessed: RwLock<DateTime<Utc>>,
    // Serializes git-mutating sequences (stash/pull/commit) per repository.
    mutation_lock: Mutex<()>,
}

impl std::fmt::Debug for RepositoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryContext")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl RepositoryContext {
    /// Opens a context for the repository containing `path`.
    ///
    /// The stored path is always the repository root (toplevel), so two
    /// different subdirectory selections of the same repository collapse
    /// to one context.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotAGitRepository`] if the path is not
    /// inside a git working tree. There is no silent fallback.
    #[allow(dead_code)] // Direct factory; the manager composes discover + with_backend
    pub async fn open(path: &Path, remote: &str) -> Result<Self, RepositoryError> {
        let backend = Git2Backend::discover(path).map_err(|e| match e {
            GitError::NotARepository => RepositoryError::NotAGitRepository(path.to_path_buf()),
            other => RepositoryError::Git(other),
        })?;
        Self::with_backend(Arc::new(backend), remote).await
    }

    /// Builds a context over an already-bound backend. Metadata resolution
    /// is best-effort: a repository without a remote is still a valid
    /// context.
    pub async fn with_backend(
        backend: Arc<dyn GitBackend>,
        remote: &str,
    ) -> Result<Self, RepositoryError> {
        let path = backend.path();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());

        let remote_url = backend.remote_url(remote).await.unwrap_or_default();
        let provider = detect_provider(remote_url.as_deref());
        let default_branch = resolve_default_branch(backend.as_ref(), remote).await;

        Ok(Self {
            id: Uuid::new_v4(),
            path,
            name,
            metadata: RepositoryMetadata {
                default_branch,
                remote_url,
                provider,
            },
            backend,
            last_fetched: RwLock::new(None),
            last_accessed: RwLock::new(Utc::now()),
            mutation_lock: Mutex::new(()),
        })
    }

    /// Opaque unique identifier, generated at creation and never reused.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Canonical repository root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name (final path segment by default).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metadata computed at creation.
    #[must_use]
    pub const fn metadata(&self) -> &RepositoryMetadata {
        &self.metadata
    }

    /// The git handle owned by this context.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn GitBackend> {
        Arc::clone(&self.backend)
    }

    /// Updates the last-accessed timestamp; called when the context
    /// becomes active.
    pub fn touch(&self) {
        if let Ok(mut guard) = self.last_accessed.write() {
            *guard = Utc::now();
        }
    }

    /// When this context last became active.
    #[allow(dead_code)]
    #[must_use]
    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed.read().map_or_else(|_| Utc::now(), |g| *g)
    }

    /// Records a completed fetch.
    pub fn mark_fetched(&self) {
        if let Ok(mut guard) = self.last_fetched.write() {
            *guard = Some(Utc::now());
        }
    }

    /// When this repository was last fetched, if ever.
    #[must_use]
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched.read().ok().and_then(|g| *g)
    }

    /// Acquires the per-repository mutation lock. Every stash/pull/commit
    /// sequence holds this for its whole duration so concurrent operations
    /// cannot interleave on the shared working tree.
    pub async fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutation_lock.lock().await
    }
}

/// Default branch resolution, each step independently best-effort:
/// remote advertised HEAD, then local `main`, then `master`, then the
/// first local branch, then a hardcoded `main`.
async fn resolve_default_branch(backend: &dyn GitBackend, remote: &str) -> String {
    if let Ok(Some(branch)) = backend.remote_head_branch(remote).await {
        return branch;
    }

    match backend.local_branches().await {
        Ok(branches) => {
            if branches.iter().any(|b| b == "main") {
                "main".to_string()
            } else if branches.iter().any(|b| b == "master") {
                "master".to_string()
            } else if let Some(first) = branches.first() {
                first.clone()
            } else {
                "main".to_string()
            }
        }
        Err(_) => "main".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGitBackend;

    fn mock_backend(path: &str) -> MockGitBackend {
        let mut mock = MockGitBackend::new();
        mock.expect_path().return_const(PathBuf::from(path));
        mock
    }

    #[test]
    fn provider_detection() {
        assert_eq!(
            detect_provider(Some("https://github.com/x/y.git")),
            Provider::GitHub
        );
        assert_eq!(
            detect_provider(Some("git@gitlab.com:x/y.git")),
            Provider::GitLab
        );
        assert_eq!(
            detect_provider(Some("https://bitbucket.org/x/y.git")),
            Provider::Bitbucket
        );
        assert_eq!(
            detect_provider(Some("https://dev.azure.com/org/project/_git/repo")),
            Provider::Azure
        );
        assert_eq!(
            detect_provider(Some("https://org.visualstudio.com/project/_git/repo")),
            Provider::Azure
        );
        assert_eq!(
            detect_provider(Some("ssh://git@internal.corp/x/y.git")),
            Provider::Local
        );
        assert_eq!(detect_provider(None), Provider::Local);
    }

    #[tokio::test]
    async fn context_prefers_remote_advertised_head() {
        let mut mock = mock_backend("/repos/widget");
        mock.expect_remote_url()
            .returning(|_| Ok(Some("https://github.com/acme/widget.git".to_string())));
        mock.expect_remote_head_branch()
            .returning(|_| Ok(Some("develop".to_string())));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();

        assert_eq!(ctx.metadata().default_branch, "develop");
        assert_eq!(ctx.metadata().provider, Provider::GitHub);
        assert_eq!(ctx.name(), "widget");
        assert!(ctx.last_fetched().is_none());
    }

    #[tokio::test]
    async fn context_falls_back_to_local_main() {
        let mut mock = mock_backend("/repos/widget");
        mock.expect_remote_url().returning(|_| Ok(None));
        mock.expect_remote_head_branch().returning(|_| Ok(None));
        mock.expect_local_branches()
            .returning(|| Ok(vec!["feature/x".to_string(), "main".to_string()]));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();

        assert_eq!(ctx.metadata().default_branch, "main");
        assert_eq!(ctx.metadata().provider, Provider::Local);
        assert!(ctx.metadata().remote_url.is_none());
    }

    #[tokio::test]
    async fn context_falls_back_to_master_then_first_branch() {
        let mut mock = mock_backend("/repos/widget");
        mock.expect_remote_url().returning(|_| Ok(None));
        mock.expect_remote_head_branch().returning(|_| Ok(None));
        mock.expect_local_branches()
            .returning(|| Ok(vec!["legacy".to_string(), "master".to_string()]));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();
        assert_eq!(ctx.metadata().default_branch, "master");

        let mut mock = mock_backend("/repos/widget");
        mock.expect_remote_url().returning(|_| Ok(None));
        mock.expect_remote_head_branch().returning(|_| Ok(None));
        mock.expect_local_branches()
            .returning(|| Ok(vec!["trunk".to_string()]));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();
        assert_eq!(ctx.metadata().default_branch, "trunk");
    }

    #[tokio::test]
    async fn context_hardcodes_main_when_nothing_resolves() {
        let mut mock = mock_backend("/repos/empty");
        mock.expect_remote_url()
            .returning(|_| Err(crate::git::GitError::Git2("boom".to_string())));
        mock.expect_remote_head_branch()
            .returning(|_| Err(crate::git::GitError::Git2("boom".to_string())));
        mock.expect_local_branches()
            .returning(|| Err(crate::git::GitError::Git2("boom".to_string())));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();
        assert_eq!(ctx.metadata().default_branch, "main");
        assert_eq!(ctx.metadata().provider, Provider::Local);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let build = || async {
            let mut mock = mock_backend("/repos/widget");
            mock.expect_remote_url().returning(|_| Ok(None));
            mock.expect_remote_head_branch().returning(|_| Ok(None));
            mock.expect_local_branches().returning(|| Ok(vec![]));
            RepositoryContext::with_backend(Arc::new(mock), "origin")
                .await
                .unwrap()
        };

        let a = build().await;
        let b = build().await;
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn touch_advances_last_accessed() {
        let mut mock = mock_backend("/repos/widget");
        mock.expect_remote_url().returning(|_| Ok(None));
        mock.expect_remote_head_branch().returning(|_| Ok(None));
        mock.expect_local_branches().returning(|| Ok(vec![]));

        let ctx = RepositoryContext::with_backend(Arc::new(mock), "origin")
            .await
            .unwrap();
        let before = ctx.last_accessed();
        std::thread::sleep(std::time::Duration::from_millis(10));
        ctx.touch();
        assert!(ctx.last_accessed() > before);
    }
}
