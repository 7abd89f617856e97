//! Definition and scope detection.
//!
//! Works purely on text lines: each line is tried against the ordered
//! [`DEFINITION_PATTERNS`] table and the first matching pattern names the
//! definition.

use std::collections::HashSet;

use regex::Regex;

use crate::analysis::patterns::{DEFINITION_PATTERNS, RELIABLE_DEFINITION_PATTERNS, SKIP_NAMES};
use crate::data::FileChangeRecord;

/// Number of changed lines scanned when hunk context names no scope.
const SCOPE_SCAN_LINES: usize = 30;

/// Extracts definition names from `lines`, deduplicated in first-seen order.
///
/// Names shorter than two characters are ignored.
pub fn find_defined_names<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .filter_map(|line| {
            first_definition(line.as_ref(), &DEFINITION_PATTERNS, |name| {
                name.chars().count() > 1
            })
        })
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Returns names in `added` that do not appear in `removed`, in order.
pub fn new_definitions<S: AsRef<str>>(added: &[S], removed: &[S]) -> Vec<String> {
    let old: HashSet<String> = find_defined_names(removed).into_iter().collect();
    find_defined_names(added)
        .into_iter()
        .filter(|name| !old.contains(name))
        .collect()
}

/// Best guess at the function or class a change lives in.
///
/// Hunk context is tried first against every pattern, then the first
/// [`SCOPE_SCAN_LINES`] added-then-removed lines against the reliable
/// subset. Returns an empty string when nothing matches.
pub fn detect_scope(record: &FileChangeRecord) -> String {
    let from_context = record
        .hunk_context
        .iter()
        .find_map(|ctx| first_definition(ctx, &DEFINITION_PATTERNS, |_| true));
    if let Some(name) = from_context {
        return name;
    }

    let reliable = &DEFINITION_PATTERNS[..RELIABLE_DEFINITION_PATTERNS];
    record
        .changed_lines()
        .take(SCOPE_SCAN_LINES)
        .find_map(|line| first_definition(line, reliable, |_| true))
        .unwrap_or_default()
}

/// Tries `patterns` in order and returns the first acceptable name.
///
/// Denylisted captures never count; a rejected capture moves on to the
/// next pattern.
fn first_definition(line: &str, patterns: &[Regex], accept: fn(&str) -> bool) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let name = pattern.captures(line)?.get(1)?.as_str();
        (!is_skip_name(name) && accept(name)).then(|| name.to_string())
    })
}

fn is_skip_name(name: &str) -> bool {
    SKIP_NAMES
        .iter()
        .any(|skip| skip.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(added: &[&str], removed: &[&str], context: &[&str]) -> FileChangeRecord {
        let mut record = FileChangeRecord::new("app.py", "app.py");
        record.added = added.iter().map(ToString::to_string).collect();
        record.removed = removed.iter().map(ToString::to_string).collect();
        record.hunk_context = context.iter().map(ToString::to_string).collect();
        record
    }

    // ── find_defined_names ─────────────────────────────────────────

    #[test]
    fn names_across_languages() {
        let lines = [
            "def load_config(path):",
            "class Parser:",
            "export async function fetchUser(id) {",
            "const handleClick = (event) => {",
            "func (s *Server) ServeHTTP(w http.ResponseWriter, r *http.Request) {",
            "  def self.valid?",
            "    public function store(Request $request)",
            "    private static int computeTotal(int a) {",
            "suspend fun refresh() {",
            "pub(crate) fn parse_header<'a>(line: &'a str) {",
            "CREATE TABLE IF NOT EXISTS invoices (",
        ];
        assert_eq!(
            find_defined_names(&lines),
            vec![
                "load_config",
                "Parser",
                "fetchUser",
                "handleClick",
                "ServeHTTP",
                "valid?",
                "store",
                "computeTotal",
                "refresh",
                "parse_header",
                "invoices",
            ]
        );
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let lines = ["def run():", "class Job:", "def run(self):"];
        assert_eq!(find_defined_names(&lines), vec!["run", "Job"]);
    }

    #[test]
    fn skip_names_are_rejected() {
        assert!(find_defined_names(&["def if(): pass"]).is_empty());
        assert!(find_defined_names(&["  x = (1, 2)"]).is_empty());
    }

    #[test]
    fn single_character_names_are_rejected() {
        assert!(find_defined_names(&["def f():"]).is_empty());
    }

    #[test]
    fn new_definitions_excludes_removed() {
        let added = ["def load():", "def save():"];
        let removed = ["def load():"];
        assert_eq!(new_definitions(&added, &removed), vec!["save"]);
    }

    // ── detect_scope ───────────────────────────────────────────────

    #[test]
    fn scope_from_hunk_context() {
        let rec = record(&["    return 1"], &[], &["def my_func():"]);
        assert_eq!(detect_scope(&rec), "my_func");
    }

    #[test]
    fn scope_from_changed_lines() {
        let mut rec = record(&["function myFunc() {}"], &[], &[]);
        rec.path = "app.js".to_string();
        assert_eq!(detect_scope(&rec), "myFunc");
    }

    #[test]
    fn scope_ignores_unreliable_patterns_in_lines() {
        let rec = record(&["pub fn handler() {"], &[], &[]);
        assert_eq!(detect_scope(&rec), "");
    }

    #[test]
    fn scope_only_scans_first_lines() {
        let mut added: Vec<String> = (0..30).map(|i| format!("x = {i}")).collect();
        added.push("def late():".to_string());
        let mut rec = record(&[], &[], &[]);
        rec.added = added;
        assert_eq!(detect_scope(&rec), "");
    }

    #[test]
    fn scope_accepts_short_names() {
        let rec = record(&[], &[], &["def f(x):"]);
        assert_eq!(detect_scope(&rec), "f");
    }

    #[test]
    fn rejected_capture_falls_through_to_later_patterns() {
        assert_eq!(find_defined_names(&["def self.reset!"]), vec!["reset!"]);
    }

    #[test]
    fn empty_record_has_no_scope() {
        assert_eq!(detect_scope(&record(&[], &[], &[])), "");
    }
}
