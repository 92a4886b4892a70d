//! Process-wide registry of open repository contexts.
//!
//! The manager is the single source of truth for which repositories are
//! open and which one is active. Opening an already-open path returns the
//! existing context instead of creating a duplicate; closing the active
//! context never silently promotes another one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::git::{Git2Backend, GitBackend, GitError};
use crate::repository::context::RepositoryContext;
use crate::repository::error::RepositoryError;

/// Payload delivered to subscribers whenever the active context changes.
///
/// `None` fields mean no context is active (the active one was closed).
#[derive(Clone)]
pub struct ActiveContextChange {
    /// Canonical root of the newly active repository.
    pub path: Option<PathBuf>,
    /// The active context's git handle.
    pub backend: Option<Arc<dyn GitBackend>>,
}

type Subscriber = Box<dyn Fn(&ActiveContextChange) + Send + Sync>;

/// Registry of open repository contexts plus the active-context pointer.
pub struct RepositoryManager {
    remote: String,
    contexts: RwLock<HashMap<Uuid, Arc<RepositoryContext>>>,
    active: RwLock<Option<Uuid>>,
    subscribers: RwLock<Vec<Subscriber>>,
    // Serializes context creation so two concurrent opens of the same
    // path can never race two contexts into existence.
    open_lock: Mutex<()>,
}

impl RepositoryManager {
    /// Creates an empty manager. `remote` is the remote name contexts are
    /// classified against (normally `origin`).
    #[must_use]
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            contexts: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
            open_lock: Mutex::new(()),
        }
    }

    /// Opens the repository containing `path` and marks it active.
    ///
    /// Paths are normalized to the repository root, so opening two
    /// subdirectories of the same repository yields the same context.
    ///
    /// # Errors
    ///
    /// Propagates [`RepositoryError::NotAGitRepository`] from context
    /// creation; a broken context is never registered.
    pub async fn open(&self, path: &Path) -> Result<Arc<RepositoryContext>, RepositoryError> {
        let backend = Git2Backend::discover(path).map_err(|e| match e {
            GitError::NotARepository => RepositoryError::NotAGitRepository(path.to_path_buf()),
            other => RepositoryError::Git(other),
        })?;
        self.open_with(Arc::new(backend)).await
    }

    /// Opens a context over an already-bound backend (the seam used by
    /// tests; [`Self::open`] goes through it).
    pub async fn open_with(
        &self,
        backend: Arc<dyn GitBackend>,
    ) -> Result<Arc<RepositoryContext>, RepositoryError> {
        let _creating = self.open_lock.lock().await;

        let root = backend.path();
        if let Some(existing) = self.find_by_path(&root) {
            self.activate(&existing);
            return Ok(existing);
        }

        let context = Arc::new(RepositoryContext::with_backend(backend, &self.remote).await?);
        self.contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(context.id(), Arc::clone(&context));
        self.activate(&context);

        tracing::debug!(path = %context.path().display(), id = %context.id(), "opened repository context");
        Ok(context)
    }

    /// The active context, if any. Pure lookup with no side effects.
    #[must_use]
    pub fn get_active(&self) -> Option<Arc<RepositoryContext>> {
        let active = *self.active.read().unwrap_or_else(PoisonError::into_inner);
        active.and_then(|id| {
            self.contexts
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&id)
                .cloned()
        })
    }

    /// Closes a context. If it was active, no other context is promoted;
    /// the caller must explicitly open or reselect one.
    ///
    /// Returns `true` if a context was removed.
    pub fn close(&self, id: Uuid) -> bool {
        let removed = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if !removed {
            return false;
        }

        let was_active = {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            if *active == Some(id) {
                *active = None;
                true
            } else {
                false
            }
        };
        if was_active {
            self.notify(&ActiveContextChange {
                path: None,
                backend: None,
            });
        }

        tracing::debug!(%id, "closed repository context");
        true
    }

    /// All open contexts, most recently activated first.
    #[allow(dead_code)]
    #[must_use]
    pub fn list(&self) -> Vec<Arc<RepositoryContext>> {
        let mut contexts: Vec<_> = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        contexts.sort_by_key(|c| std::cmp::Reverse(c.last_accessed()));
        contexts
    }

    /// Registers a subscriber for active-context changes. Any number of
    /// subscribers may be registered; each is invoked on every open,
    /// switch, and close of the active context.
    pub fn subscribe(&self, subscriber: impl Fn(&ActiveContextChange) + Send + Sync + 'static) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    fn find_by_path(&self, root: &Path) -> Option<Arc<RepositoryContext>> {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|c| c.path() == root)
            .cloned()
    }

    fn activate(&self, context: &Arc<RepositoryContext>) {
        {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            *active = Some(context.id());
        }
        context.touch();
        self.notify(&ActiveContextChange {
            path: Some(context.path().to_path_buf()),
            backend: Some(context.backend()),
        });
    }

    fn notify(&self, change: &ActiveContextChange) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(change);
        }
    }
}
