//! Legacy global repository state.
//!
//! Older call sites addressed "the" repository through process-wide
//! globals. During the migration to [`RepositoryManager`] those globals
//! live here as a derived cache of the active context: written only by the
//! subscription installed at startup, read only by the operations'
//! active-context fallback. New code must not touch this module.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::git::GitBackend;
use crate::repository::manager::{ActiveContextChange, RepositoryManager};

struct LegacyRepoState {
    repo_path: PathBuf,
    backend: Arc<dyn GitBackend>,
}

static ACTIVE: RwLock<Option<LegacyRepoState>> = RwLock::new(None);

/// Subscribes the legacy globals to the manager's active-context events.
/// Call once at startup, before any operation runs.
pub fn install(manager: &RepositoryManager) {
    manager.subscribe(sync_from_change);
}

fn sync_from_change(change: &ActiveContextChange) {
    let mut guard = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    *guard = match (&change.path, &change.backend) {
        (Some(path), Some(backend)) => Some(LegacyRepoState {
            repo_path: path.clone(),
            backend: Arc::clone(backend),
        }),
        _ => None,
    };
}

/// Path of the repository the legacy globals currently point at.
#[allow(dead_code)]
#[must_use]
pub fn repo_path() -> Option<PathBuf> {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|s| s.repo_path.clone())
}

/// Git handle the legacy globals currently point at.
#[must_use]
pub fn backend() -> Option<Arc<dyn GitBackend>> {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|s| Arc::clone(&s.backend))
}

/// Clears the globals. Test isolation only.
#[cfg(test)]
pub fn reset() {
    let mut guard = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

/// Serializes tests that depend on the process-wide globals being empty.
#[cfg(test)]
pub fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
