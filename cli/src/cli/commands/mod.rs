//! Command implementations.

pub mod repo;
pub mod sync;

pub use repo::{handle_close, handle_completions, handle_open, handle_repos, handle_status};
pub use sync::{handle_commit, handle_pull};
