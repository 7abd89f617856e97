//! Diff classification engine.
//!
//! The pipeline is `parse_diff` → `classify` / `describe_file` per file →
//! aggregation in [`Composer`]. Every stage is a pure function of its
//! input and none of them can fail.

pub mod classify;
pub mod compose;
pub mod describe;
pub mod details;
pub mod diff;
pub mod language;
pub mod patterns;
pub mod render;
pub mod scope;

pub use classify::{classify, fix_score, Thresholds};
pub use compose::{create_commit_message, pick_primary_tag, truncate_subject, Composer};
pub use describe::describe_file;
pub use details::extract_details;
pub use diff::parse_diff;
pub use render::{render, ColorMode, DisplayBlock};
pub use scope::{detect_scope, find_defined_names};
