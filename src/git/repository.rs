//! Git repository operations

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use git2::{Diff, DiffFindOptions, DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::git::GitError;

/// Which set of changes to analyze.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiffSource {
    /// Staged changes, falling back to unstaged ones when nothing is staged.
    #[default]
    Auto,
    /// Index against the HEAD tree (`git diff --cached`).
    Staged,
    /// Working directory against the index (`git diff`).
    Unstaged,
}

impl fmt::Display for DiffSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Staged => write!(f, "staged"),
            Self::Unstaged => write!(f, "unstaged"),
        }
    }
}

/// Non-empty diff text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDiff {
    /// `Staged` or `Unstaged`; never `Auto`.
    pub source: DiffSource,
    /// Unified diff text.
    pub text: String,
    /// Set when `Auto` found nothing staged and used unstaged changes.
    pub fell_back: bool,
}

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing `path`, searching parent directories
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .map_err(|_| GitError::NotARepository(path.display().to_string()))?;

        if repo.is_bare() {
            return Err(GitError::BareRepository(path.display().to_string()).into());
        }

        Ok(Self { repo })
    }

    /// Get current branch name
    ///
    /// Returns the branch HEAD points at, including a branch without commits
    /// yet, and an empty string for a detached HEAD.
    pub fn current_branch(&self) -> String {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head.shorthand().unwrap_or_default().to_string(),
            Ok(_) => {
                debug!("HEAD is detached");
                String::new()
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => self
                .repo
                .find_reference("HEAD")
                .ok()
                .and_then(|head| head.symbolic_target().map(str::to_string))
                .and_then(|target| target.strip_prefix("refs/heads/").map(str::to_string))
                .unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "Could not resolve HEAD");
                String::new()
            }
        }
    }

    /// Diff of the index against the HEAD tree, like `git diff --cached`
    pub fn staged_diff(&self) -> Result<String> {
        let head_tree = self.head_tree()?;
        let index = self.repo.index().context("Failed to read index")?;
        let mut options = DiffOptions::new();

        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut options))
            .context("Failed to diff index against HEAD")?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))
            .context("Failed to detect renames")?;

        patch_text(&diff)
    }

    /// Diff of the working directory against the index, like `git diff`
    pub fn unstaged_diff(&self) -> Result<String> {
        let mut options = DiffOptions::new();

        let diff = self
            .repo
            .diff_index_to_workdir(None, Some(&mut options))
            .context("Failed to diff working directory against index")?;

        patch_text(&diff)
    }

    /// Reads the changes to analyze, or `None` when there are none.
    pub fn pending_diff(&self, source: DiffSource) -> Result<Option<PendingDiff>> {
        let pending = |source, text: String, fell_back| {
            (!text.trim().is_empty()).then_some(PendingDiff {
                source,
                text,
                fell_back,
            })
        };

        match source {
            DiffSource::Staged => Ok(pending(DiffSource::Staged, self.staged_diff()?, false)),
            DiffSource::Unstaged => Ok(pending(DiffSource::Unstaged, self.unstaged_diff()?, false)),
            DiffSource::Auto => {
                if let Some(staged) = pending(DiffSource::Staged, self.staged_diff()?, false) {
                    return Ok(Some(staged));
                }
                debug!("No staged changes, trying unstaged");
                Ok(pending(DiffSource::Unstaged, self.unstaged_diff()?, true))
            }
        }
    }

    /// Tree of the HEAD commit, `None` before the first commit
    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => {
                let tree = head.peel_to_tree().context("Failed to peel HEAD to tree")?;
                Ok(Some(tree))
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }
}

/// Renders a diff as unified patch text
fn patch_text(diff: &Diff<'_>) -> Result<String> {
    let mut text = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("Failed to render diff")?;

    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (dir, repo)
    }

    fn stage(repo: &Repository, file: &str) {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
    }

    fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = repo.signature().unwrap();
        let parents: Vec<git2::Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn open_outside_repository_fails() {
        let dir = TempDir::new().unwrap();
        let err = GitRepository::open_at(dir.path()).err().unwrap();
        assert!(err.to_string().starts_with("Not a git repository"));
    }

    #[test]
    fn staged_diff_before_first_commit() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("app.py"), "def run():\n    pass\n").unwrap();
        stage(&repo, "app.py");

        let git = GitRepository::open_at(dir.path()).unwrap();
        let diff = git.staged_diff().unwrap();
        assert!(diff.contains("diff --git a/app.py b/app.py"));
        assert!(diff.contains("new file mode"));
        assert!(diff.contains("+def run():"));
    }

    #[test]
    fn auto_falls_back_to_unstaged() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("notes.md"), "one\n").unwrap();
        stage(&repo, "notes.md");
        commit_all(&repo, "initial");
        fs::write(dir.path().join("notes.md"), "one\ntwo\n").unwrap();

        let git = GitRepository::open_at(dir.path()).unwrap();
        let pending = git.pending_diff(DiffSource::Auto).unwrap().unwrap();
        assert_eq!(pending.source, DiffSource::Unstaged);
        assert!(pending.fell_back);
        assert!(pending.text.contains("+two"));
        assert!(git.pending_diff(DiffSource::Staged).unwrap().is_none());
    }

    #[test]
    fn clean_tree_has_nothing_pending() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        stage(&repo, "a.txt");
        commit_all(&repo, "initial");

        let git = GitRepository::open_at(dir.path()).unwrap();
        assert!(git.pending_diff(DiffSource::Auto).unwrap().is_none());
    }

    #[test]
    fn branch_of_unborn_head() {
        let (dir, repo) = init_repo();
        repo.set_head("refs/heads/feature").unwrap();

        let git = GitRepository::open_at(dir.path()).unwrap();
        assert_eq!(git.current_branch(), "feature");
    }

    #[test]
    fn detached_head_has_no_branch() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        stage(&repo, "a.txt");
        commit_all(&repo, "initial");
        let head = repo.head().unwrap().target().unwrap();
        repo.set_head_detached(head).unwrap();

        let git = GitRepository::open_at(dir.path()).unwrap();
        assert_eq!(git.current_branch(), "");
    }
}
