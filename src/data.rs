//! Data model shared by the analysis pipeline and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod yaml;

pub use yaml::to_yaml;

/// One changed file as parsed from a unified diff.
///
/// Created by [`parse_diff`](crate::analysis::parse_diff) and read-only for
/// every later stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeRecord {
    /// Current path (the rename target for renamed files).
    pub path: String,
    /// Path on the `a/` side of the `diff --git` header.
    pub old_path: String,
    /// Added line text, without the leading `+`.
    pub added: Vec<String>,
    /// Removed line text, without the leading `-`.
    pub removed: Vec<String>,
    /// Trailing text of `@@ ... @@` hunk headers, trimmed.
    pub hunk_context: Vec<String>,
    /// File was created by this diff.
    pub is_new: bool,
    /// File was deleted by this diff.
    pub is_deleted: bool,
    /// File was renamed by this diff.
    pub is_rename: bool,
    /// Git reported the file as binary.
    pub is_binary: bool,
}

impl FileChangeRecord {
    /// Creates an empty record for the given header paths.
    pub fn new(old_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: old_path.into(),
            ..Self::default()
        }
    }

    /// Returns the added lines followed by the removed lines.
    pub fn changed_lines(&self) -> impl Iterator<Item = &String> {
        self.added.iter().chain(self.removed.iter())
    }
}

/// The single change category assigned to each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// File added by the diff.
    NewFile,
    /// File removed by the diff.
    Deleted,
    /// File moved to a new path.
    Rename,
    /// Binary content changed.
    Binary,
    /// Test sources.
    Test,
    /// Documentation.
    Docs,
    /// Build, dependency or tooling configuration.
    Config,
    /// Stylesheets.
    Style,
    /// HTML/XML-family markup.
    Markup,
    /// SQL scripts.
    Sql,
    /// Code change that looks like a bug fix.
    Fix,
    /// Code change that introduces new definitions.
    Feat,
    /// Large balanced rewrite.
    Refactor,
    /// Anything else.
    Update,
}

impl Category {
    /// Returns true for categories decided from diff headers alone.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::NewFile | Self::Deleted | Self::Rename | Self::Binary
        )
    }

    /// Returns true for categories produced by the content heuristics.
    pub fn is_code(self) -> bool {
        matches!(self, Self::Fix | Self::Feat | Self::Refactor | Self::Update)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewFile => "new_file",
            Self::Deleted => "deleted",
            Self::Rename => "rename",
            Self::Binary => "binary",
            Self::Test => "test",
            Self::Docs => "docs",
            Self::Config => "config",
            Self::Style => "style",
            Self::Markup => "markup",
            Self::Sql => "sql",
            Self::Fix => "fix",
            Self::Feat => "feat",
            Self::Refactor => "refactor",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// Display tag for a file or a whole commit.
///
/// Variants are declared in priority order: when tags compete for the
/// subject line, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    /// `[FIX]`
    Fix,
    /// `[ADD]`
    Add,
    /// `[REMOVE]`
    Remove,
    /// `[REFACTOR]`
    Refactor,
    /// `[UPDATE]`
    Update,
    /// `[STYLE]`
    Style,
    /// `[DOCS]`
    Docs,
    /// `[CONFIG]`
    Config,
    /// `[TEST]`
    Test,
    /// `[RENAME]`
    Rename,
    /// `[CHORE]`
    Chore,
}

impl Tag {
    /// All tags, highest priority first.
    pub const PRIORITY: [Self; 11] = [
        Self::Fix,
        Self::Add,
        Self::Remove,
        Self::Refactor,
        Self::Update,
        Self::Style,
        Self::Docs,
        Self::Config,
        Self::Test,
        Self::Rename,
        Self::Chore,
    ];

    /// Bare upper-case name without brackets.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fix => "FIX",
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Refactor => "REFACTOR",
            Self::Update => "UPDATE",
            Self::Style => "STYLE",
            Self::Docs => "DOCS",
            Self::Config => "CONFIG",
            Self::Test => "TEST",
            Self::Rename => "RENAME",
            Self::Chore => "CHORE",
        }
    }

    /// Bracketed label, e.g. `[FIX]`.
    pub fn label(self) -> String {
        format!("[{}]", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name())
    }
}

/// Per-file view produced by the describe step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Display tag.
    pub tag: Tag,
    /// One-line summary of the change.
    pub summary: String,
    /// Up to four short highlights.
    pub details: Vec<String>,
    /// Language label, empty when unknown.
    pub language: String,
    /// Current file path.
    pub path: String,
}

/// Aggregate result for one diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    /// Plain one-line subject, e.g. `[FIX][main] Fix null/None handling in load()`.
    pub subject: String,
    /// Rendered multi-line display block, empty for degenerate input.
    pub display: String,
    /// One descriptor per parsed file, in diff order.
    pub files: Vec<FileDescriptor>,
    /// Total added lines across all files.
    pub added_lines: usize,
    /// Total removed lines across all files.
    pub removed_lines: usize,
}

impl CommitResult {
    /// Subject used when the diff contains nothing to describe.
    pub const DEFAULT_SUBJECT: &'static str = "[UPDATE] Minor changes";

    /// Result returned for empty or unparseable diffs.
    pub fn minor_changes() -> Self {
        Self {
            subject: Self::DEFAULT_SUBJECT.to_string(),
            display: String::new(),
            files: Vec::new(),
            added_lines: 0,
            removed_lines: 0,
        }
    }
}
