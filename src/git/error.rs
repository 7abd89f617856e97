//! Git collaborator errors.

use thiserror::Error;

/// Errors raised while locating or reading a repository.
#[derive(Error, Debug)]
pub enum GitError {
    /// The path is not inside a git work tree.
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    /// The repository has no working directory to diff against.
    #[error("Repository has no working directory: {0}")]
    BareRepository(String),

    /// The path does not exist.
    #[error("Path does not exist: {0}")]
    MissingPath(String),
}
