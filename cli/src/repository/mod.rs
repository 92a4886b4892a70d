//! Repository context management for gitdock.
//!
//! This module replaces ad-hoc global git state with addressable,
//! per-repository contexts:
//! - [`RepositoryContext`] - Identity, canonical path, git handle, and
//!   cached metadata for one open repository
//! - [`RepositoryManager`] - Process-wide registry of open contexts and
//!   the single active context
//! - [`legacy`] - Global mutable mirror of the active context, kept only
//!   for the migration of old call sites

pub mod context;
pub mod error;
pub mod legacy;
pub mod manager;

#[allow(unused_imports)]
pub use context::{Provider, RepositoryContext, RepositoryMetadata};
#[allow(unused_imports)]
pub use error::RepositoryError;
#[allow(unused_imports)]
pub use manager::{ActiveContextChange, RepositoryManager};
