//! Git execution layer for gitdock.
//!
//! Provides the command-execution abstraction every repository context is
//! bound to:
//! - Repository discovery and status queries (via libgit2)
//! - Fetch, rebase-pull, stash and commit operations (via the git CLI)
//! - Conflict classification for pull and stash-restore failures

pub mod backend;
pub mod cli;
pub mod error;
pub mod types;

#[allow(unused_imports)]
pub use backend::{Git2Backend, GitBackend};
#[allow(unused_imports)]
pub use cli::{GitCli, GitCliError};
#[allow(unused_imports)]
pub use error::GitError;
#[allow(unused_imports)]
pub use types::{RepoStatus, StashEntry};

#[cfg(test)]
#[allow(unused_imports)]
pub use backend::MockGitBackend;
