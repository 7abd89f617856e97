//! Preflight validation checks for early failure detection
//!
//! Commands call these before touching the repository so that a wrong
//! path fails fast with a clear message.

use std::path::Path;

use anyhow::{Context, Result};

use crate::git::{GitError, GitRepository};

/// Validate that `path` exists and is a directory
pub fn check_path_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(GitError::MissingPath(path.display().to_string()).into());
    }
    Ok(())
}

/// Validate that `path` lies inside a git work tree and open it
pub fn check_git_repository(path: &Path) -> Result<GitRepository> {
    check_path_exists(path)?;
    GitRepository::open_at(path).context(
        "Not in a git repository. Please run this command from within a git repository.",
    )
}
