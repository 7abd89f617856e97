//! Git repository access for reading pending changes.

pub mod error;
pub mod repository;

pub use error::GitError;
pub use repository::{DiffSource, GitRepository, PendingDiff};
