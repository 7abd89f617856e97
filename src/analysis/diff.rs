//! Unified diff parsing into per-file change records.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::data::FileChangeRecord;

static FILE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^diff --git a/(.+?) b/(.+?)$").unwrap());

static HUNK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ [^@]+ @@\s*(.*)").unwrap());

const NEW_FILE_MARKER: &str = "new file mode";
const DELETED_FILE_MARKER: &str = "deleted file mode";
const RENAME_TO_MARKER: &str = "rename to ";
const BINARY_MARKER: &str = "Binary files";

/// Parses unified diff text into one record per `diff --git` header.
///
/// Lines before the first header and lines that are not recognized are
/// ignored, so arbitrary input yields a (possibly empty) list and never
/// an error.
pub fn parse_diff(text: &str) -> Vec<FileChangeRecord> {
    let mut records = Vec::new();
    let mut current: Option<FileChangeRecord> = None;

    for line in text.lines() {
        if let Some(caps) = FILE_HEADER.captures(line) {
            records.extend(current.take());
            current = Some(FileChangeRecord::new(&caps[1], &caps[2]));
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };
        apply_line(record, line);
    }

    records.extend(current);
    trace!(files = records.len(), "Parsed diff");
    records
}

/// Applies one line of a file section to the record being built.
fn apply_line(record: &mut FileChangeRecord, line: &str) {
    if line.starts_with(NEW_FILE_MARKER) {
        record.is_new = true;
    } else if line.starts_with(DELETED_FILE_MARKER) {
        record.is_deleted = true;
    } else if let Some(target) = line.strip_prefix(RENAME_TO_MARKER) {
        if !target.is_empty() {
            record.is_rename = true;
            record.path = target.to_string();
        }
    } else if line.starts_with(BINARY_MARKER) {
        record.is_binary = true;
    } else if let Some(caps) = HUNK_HEADER.captures(line) {
        let context = caps[1].trim();
        if !context.is_empty() {
            record.hunk_context.push(context.to_string());
        }
    } else if let Some(text) = line.strip_prefix('+') {
        if !line.starts_with("+++") {
            record.added.push(text.to_string());
        }
    } else if let Some(text) = line.strip_prefix('-') {
        if !line.starts_with("---") {
            record.removed.push(text.to_string());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // ── test helpers ───────────────────────────────────────────────

    fn file_header(path: &str) -> String {
        format!(
            "diff --git a/{path} b/{path}\n\
             index abc1234..def5678 100644\n\
             --- a/{path}\n\
             +++ b/{path}\n"
        )
    }

    // ── degenerate input ───────────────────────────────────────────

    #[test]
    fn empty_input_has_no_records() {
        assert!(parse_diff("").is_empty());
        assert!(parse_diff("  \n\t\n").is_empty());
    }

    #[test]
    fn text_without_headers_is_ignored() {
        assert!(parse_diff("+added\n-removed\n@@ -1 +1 @@ fn x\n").is_empty());
    }

    // ── line collection ────────────────────────────────────────────

    #[test]
    fn collects_added_removed_and_context() {
        let diff = format!(
            "{}@@ -1,3 +1,3 @@ def load(path):\n \
             unchanged\n\
             -    return None\n\
             +    return {{}}\n",
            file_header("app.py")
        );
        let records = parse_diff(&diff);
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.path, "app.py");
        assert_eq!(rec.old_path, "app.py");
        assert_eq!(rec.added, vec!["    return {}"]);
        assert_eq!(rec.removed, vec!["    return None"]);
        assert_eq!(rec.hunk_context, vec!["def load(path):"]);
    }

    #[test]
    fn file_markers_are_not_content() {
        let records = parse_diff(&file_header("x.rs"));
        assert!(records[0].added.is_empty());
        assert!(records[0].removed.is_empty());
    }

    #[test]
    fn hunk_without_context_adds_nothing() {
        let diff = format!("{}@@ -1 +1 @@\n+x\n", file_header("a.go"));
        assert!(parse_diff(&diff)[0].hunk_context.is_empty());
    }

    #[test]
    fn triple_marker_text_lines_are_skipped() {
        let diff = format!("{}@@ -1 +1 @@\n+++counter\n---dash\n", file_header("a.c"));
        let rec = &parse_diff(&diff)[0];
        assert!(rec.added.is_empty());
        assert!(rec.removed.is_empty());
    }

    // ── structural flags ───────────────────────────────────────────

    #[test]
    fn new_and_deleted_markers() {
        let diff = "diff --git a/new.py b/new.py\n\
                    new file mode 100644\n\
                    +print('hi')\n\
                    diff --git a/old.py b/old.py\n\
                    deleted file mode 100644\n\
                    -print('bye')\n";
        let records = parse_diff(diff);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_new);
        assert!(!records[0].is_deleted);
        assert!(records[1].is_deleted);
    }

    #[test]
    fn rename_overwrites_path() {
        let diff = "diff --git a/old_name.py b/new_name.py\n\
                    similarity index 100%\n\
                    rename from old_name.py\n\
                    rename to new_name.py\n";
        let rec = &parse_diff(diff)[0];
        assert!(rec.is_rename);
        assert_eq!(rec.old_path, "old_name.py");
        assert_eq!(rec.path, "new_name.py");
    }

    #[test]
    fn binary_marker() {
        let diff = "diff --git a/logo.png b/logo.png\n\
                    index 0000000..abc1234\n\
                    Binary files a/logo.png and b/logo.png differ\n";
        assert!(parse_diff(diff)[0].is_binary);
    }

    #[test]
    fn header_splits_at_first_b_marker() {
        let rec = &parse_diff("diff --git a/docs/a b/c.md b/docs/a b/c.md\n")[0];
        assert_eq!(rec.old_path, "docs/a");
        assert_eq!(rec.path, "c.md b/docs/a b/c.md");
    }

    #[test]
    fn crlf_line_endings() {
        let diff = "diff --git a/a.py b/a.py\r\n@@ -1 +1 @@\r\n+x = 1\r\n-x = 0\r\n";
        let rec = &parse_diff(diff)[0];
        assert_eq!(rec.added, vec!["x = 1"]);
        assert_eq!(rec.removed, vec!["x = 0"]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        proptest! {
            #[test]
            fn never_panics(text in "\\PC{0,400}") {
                let _ = parse_diff(&text);
            }

            #[test]
            fn one_record_per_header(paths in prop::collection::vec("[a-z]{1,8}\\.(py|rs|js)", 0..6)) {
                let diff: String = paths
                    .iter()
                    .map(|p| format!("diff --git a/{p} b/{p}\n@@ -1 +1 @@\n+x\n"))
                    .collect();
                let records = parse_diff(&diff);
                prop_assert_eq!(records.len(), paths.len());
                for (rec, path) in records.iter().zip(&paths) {
                    prop_assert_eq!(&rec.path, path);
                }
            }
        }
    }
}
