//! Repository-management error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::git::GitError;

/// Errors specific to repository context management.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The selected path is not inside a git working tree.
    #[error("'{0}' is not a git repository.")]
    NotAGitRepository(PathBuf),

    /// No repository is currently active.
    #[error("No repository selected. Open a repository first.")]
    NoRepositorySelected,

    /// Underlying git failure while building or using a context.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl RepositoryError {
    /// Checks if this error means no usable repository was resolvable.
    #[must_use]
    pub const fn is_no_repository(&self) -> bool {
        matches!(
            self,
            Self::NotAGitRepository(_) | Self::NoRepositorySelected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_no_repository_classification() {
        assert!(RepositoryError::NoRepositorySelected.is_no_repository());
        assert!(RepositoryError::NotAGitRepository(PathBuf::from("/tmp/x")).is_no_repository());
        assert!(!RepositoryError::Git(GitError::DetachedHead).is_no_repository());
    }

    #[test]
    fn messages_name_the_path() {
        let err = RepositoryError::NotAGitRepository(PathBuf::from("/home/user/notes"));
        assert!(err.to_string().contains("/home/user/notes"));
    }
}
