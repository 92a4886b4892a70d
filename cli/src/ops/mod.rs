//! Opinionated git operations for gitdock.
//!
//! The core state machines of the client:
//! - [`pull_current_branch`] - Pull with automatic stash/restore of
//!   uncommitted local edits
//! - [`commit_changes`] - Commit gated on a remote behind-check
//!
//! Operations resolve the active repository through the
//! [`RepositoryManager`] (falling back to the legacy globals), hold the
//! context's mutation lock for their whole duration, and convert every
//! failure into a structured result record. Nothing here panics or throws
//! across the caller boundary.

pub mod commit;
pub mod pull;
pub mod results;

#[cfg(test)]
mod tests;

#[allow(unused_imports)]
pub use commit::commit_changes;
#[allow(unused_imports)]
pub use pull::pull_current_branch;
#[allow(unused_imports)]
pub use results::{CommitResult, PullResult};

use std::sync::Arc;

use crate::repository::context::RepositoryContext;
use crate::repository::error::RepositoryError;
use crate::repository::{legacy, RepositoryManager};

/// Resolves the repository current operations implicitly target: the
/// manager's active context, or the legacy globals while old call sites
/// are still being migrated.
pub(crate) async fn resolve_active(
    manager: &RepositoryManager,
) -> Result<Arc<RepositoryContext>, RepositoryError> {
    if let Some(context) = manager.get_active() {
        return Ok(context);
    }
    if let Some(backend) = legacy::backend() {
        return manager.open_with(backend).await;
    }
    Err(RepositoryError::NoRepositorySelected)
}
