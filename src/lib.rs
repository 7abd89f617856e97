//! # smart-commit
//!
//! Commit message suggestions from unified diffs.
//!
//! The [`analysis`] pipeline parses a diff, classifies every changed file
//! and composes a tagged subject line with a boxed summary. [`conventional`]
//! turns that into a conventional-commit message and the [`cli`] reads the
//! pending changes of a git repository.
//!
//! ## Quick Start
//!
//! ```rust
//! use smart_commit::create_commit_message;
//!
//! let diff = "diff --git a/README.md b/README.md\n@@ -1 +1 @@\n-old\n+new\n";
//! let result = create_commit_message(diff, "main");
//! assert_eq!(result.subject, "[DOCS][main] Update README documentation");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod conventional;
pub mod data;
pub mod git;
pub mod utils;

pub use crate::analysis::{create_commit_message, Composer, Thresholds};
pub use crate::cli::Cli;
pub use crate::conventional::ConventionalCommit;
pub use crate::data::{CommitResult, FileDescriptor, Tag};

/// The current version of smart-commit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
