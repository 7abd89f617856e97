//! Conventional-commit rendering of a composed result.
//!
//! Maps the primary tag onto the `feat`/`fix`/`chore`/... vocabulary,
//! derives a lower-case description from the subject, lists every file in
//! the body and builds a shell-safe `git commit` command line.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::analysis::compose::{pick_primary_tag, tally_tags};
use crate::data::{CommitResult, FileDescriptor, Tag};

/// Bracketed word tokens such as `[FIX]` or `[main]`.
static BRACKET_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\w+\]").unwrap());

/// The ` (+N more)` suffix of multi-file subjects.
static MORE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\+\d+ more\)").unwrap());

/// Branch that never becomes a scope.
const DEFAULT_BRANCH: &str = "main";

/// Description used when every file of a large change is new.
const INITIAL_DESCRIPTION: &str = "initial project files and structure";

/// Paragraph prepended to the body of an initial commit.
const INITIAL_INTRO: &str =
    "Introduce the initial project layout with its configuration, documentation and source modules.";

/// More than this many files, all added, is treated as an initial commit.
const INITIAL_MIN_FILES: usize = 3;

/// Conventional-commit message derived from a [`CommitResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConventionalCommit {
    /// Commit type, e.g. `feat` or `chore`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Scope taken from the branch, if any.
    pub scope: Option<String>,
    /// Lower-case description following the colon.
    pub description: String,
    /// Multi-line body listing the files; empty when there are none.
    pub body: String,
}

impl ConventionalCommit {
    /// Derives the conventional message for `result` on `branch`.
    pub fn from_result(result: &CommitResult, branch: &str) -> Self {
        let primary = pick_primary_tag(&tally_tags(&result.files));
        let verbs = leading_verbs(&result.files);
        let initial = result.files.len() > INITIAL_MIN_FILES
            && verbs.len() == 1
            && verbs.contains("Add");

        let description = if initial {
            INITIAL_DESCRIPTION.to_string()
        } else {
            describe_subject(&result.subject, branch)
        };

        let scope = (!branch.is_empty() && branch != DEFAULT_BRANCH).then(|| branch.to_string());

        let mut body = build_body(&result.files, &verbs);
        if initial && !body.is_empty() {
            body = format!("{INITIAL_INTRO}\n\n{body}");
        }

        Self {
            kind: conventional_type(primary),
            scope,
            description,
            body,
        }
    }

    /// One-line subject, e.g. `fix(login): handle null user`.
    pub fn subject(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}({scope}): {}", self.kind, self.description),
            None => format!("{}: {}", self.kind, self.description),
        }
    }

    /// Ready-to-run `git commit` invocation with shell-quoted arguments.
    pub fn command(&self) -> String {
        commit_command(&self.subject(), &self.body)
    }
}

impl fmt::Display for ConventionalCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subject())?;
        if !self.body.is_empty() {
            write!(f, "\n\n{}", self.body)?;
        }
        Ok(())
    }
}

/// Conventional-commit type for a display tag.
pub fn conventional_type(tag: Tag) -> &'static str {
    match tag {
        Tag::Add => "feat",
        Tag::Fix => "fix",
        Tag::Update | Tag::Config | Tag::Remove | Tag::Chore => "chore",
        Tag::Refactor | Tag::Rename => "refactor",
        Tag::Style => "style",
        Tag::Docs => "docs",
        Tag::Test => "test",
    }
}

/// Quotes `arg` for a POSIX shell.
///
/// Arguments made only of safe characters are returned as is; anything
/// else is wrapped in single quotes with embedded quotes written `'\''`.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Builds `git commit -m <subject> [-m <body>]`; an empty body is omitted.
pub fn commit_command(subject: &str, body: &str) -> String {
    let mut command = format!("git commit -m {}", shell_quote(subject));
    if !body.is_empty() {
        command.push_str(" -m ");
        command.push_str(&shell_quote(body));
    }
    command
}

/// Strips tags, the branch token and the "more" suffix from a subject and
/// lower-cases its first word.
fn describe_subject(subject: &str, branch: &str) -> String {
    let mut text = subject.to_string();
    if !branch.is_empty() {
        text = text.replace(&format!("[{branch}]"), "");
    }
    let text = BRACKET_TOKEN.replace_all(&text, "");
    let text = MORE_SUFFIX.replace_all(&text, "");
    let text = text.trim();

    match text.split_once(' ') {
        Some((verb, rest)) => format!("{} {}", verb.to_lowercase(), rest.trim()),
        None => text.to_lowercase(),
    }
}

/// First words of every multi-word summary.
fn leading_verbs(files: &[FileDescriptor]) -> BTreeSet<&str> {
    files
        .iter()
        .filter_map(|file| file.summary.split_once(' ').map(|(verb, _)| verb))
        .collect()
}

fn build_body(files: &[FileDescriptor], verbs: &BTreeSet<&str>) -> String {
    if files.is_empty() {
        return String::new();
    }

    let (intro, lines): (String, Vec<String>) = match verbs.iter().next() {
        Some(verb) if verbs.len() == 1 => {
            let prefix = format!("{verb} ");
            let lines = files
                .iter()
                .map(|file| {
                    let item = file.summary.replacen(&prefix, "", 1);
                    format!("- {}", item.trim())
                })
                .collect();
            (format!("{verb} the following:"), lines)
        }
        _ => {
            let lines = files
                .iter()
                .map(|file| format!("- {}", BRACKET_TOKEN.replace_all(&file.summary, "").trim()))
                .collect();
            ("Apply the following changes:".to_string(), lines)
        }
    };

    format!("{intro}\n{}", lines.join("\n"))
}
