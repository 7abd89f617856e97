//! Change classification.
//!
//! Every record gets exactly one [`Category`]. Rules are applied in a fixed
//! order and the first one that applies wins; the last rule always applies.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::language;
use crate::analysis::patterns::{ERROR_HANDLING, FIX_KEYWORDS, NULL_CHECK};
use crate::analysis::scope::new_definitions;
use crate::data::{Category, FileChangeRecord};

/// Tunable cutoffs used by the content heuristics.
///
/// The defaults are empirical; they can be overridden from the settings
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum fix score for a change to count as a fix.
    pub fix_score: u32,
    /// Upper bound on added and removed lines for a "small targeted" edit.
    pub small_edit_max: usize,
    /// Both sides must exceed this many lines for a refactor.
    pub refactor_min_lines: usize,
    /// Exclusive lower bound of the added/removed ratio for a refactor.
    pub refactor_ratio_min: f64,
    /// Exclusive upper bound of the added/removed ratio for a refactor.
    pub refactor_ratio_max: f64,
    /// Maximum subject line length in characters.
    pub subject_limit: usize,
}

impl Thresholds {
    /// Fix score threshold.
    pub const FIX_SCORE: u32 = 3;
    /// Small edit bound.
    pub const SMALL_EDIT_MAX: usize = 6;
    /// Refactor line minimum.
    pub const REFACTOR_MIN_LINES: usize = 20;
    /// Refactor ratio lower bound.
    pub const REFACTOR_RATIO_MIN: f64 = 0.4;
    /// Refactor ratio upper bound.
    pub const REFACTOR_RATIO_MAX: f64 = 2.5;
    /// Subject length limit.
    pub const SUBJECT_LIMIT: usize = 70;
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fix_score: Self::FIX_SCORE,
            small_edit_max: Self::SMALL_EDIT_MAX,
            refactor_min_lines: Self::REFACTOR_MIN_LINES,
            refactor_ratio_min: Self::REFACTOR_RATIO_MIN,
            refactor_ratio_max: Self::REFACTOR_RATIO_MAX,
            subject_limit: Self::SUBJECT_LIMIT,
        }
    }
}

/// Assigns the category of a record.
pub fn classify(record: &FileChangeRecord, thresholds: &Thresholds) -> Category {
    if let Some(category) = structural_category(record) {
        return category;
    }
    if let Some(category) = path_category(&record.path) {
        return category;
    }

    let score = fix_score(record, thresholds);
    debug!(path = %record.path, score, "Fix score");
    if score >= thresholds.fix_score {
        return Category::Fix;
    }

    let n_add = record.added.len();
    let n_rem = record.removed.len();

    #[allow(clippy::cast_precision_loss)]
    let (adds, rems) = (n_add as f64, n_rem as f64);

    if adds > rems * 0.5 && !new_definitions(&record.added, &record.removed).is_empty() {
        return Category::Feat;
    }

    if n_add > thresholds.refactor_min_lines && n_rem > thresholds.refactor_min_lines {
        let ratio = adds / rems.max(1.0);
        if thresholds.refactor_ratio_min < ratio && ratio < thresholds.refactor_ratio_max {
            return Category::Refactor;
        }
    }

    Category::Update
}

/// Scores how much the added lines look like a bug fix.
///
/// Error handling at line start is worth 3, a null or optional idiom 2,
/// bug vocabulary 1 and a small edit on both sides 1.
pub fn fix_score(record: &FileChangeRecord, thresholds: &Thresholds) -> u32 {
    let added = &record.added;
    let mut score = 0;

    if added.iter().any(|line| ERROR_HANDLING.is_match(line)) {
        score += 3;
    }
    if added.iter().any(|line| NULL_CHECK.is_match(line)) {
        score += 2;
    }
    if FIX_KEYWORDS.is_match(&added.join("\n")) {
        score += 1;
    }

    let small = 1..=thresholds.small_edit_max;
    if small.contains(&added.len()) && small.contains(&record.removed.len()) {
        score += 1;
    }

    score
}

/// Categories decided by the diff header flags alone.
fn structural_category(record: &FileChangeRecord) -> Option<Category> {
    if record.is_deleted {
        Some(Category::Deleted)
    } else if record.is_new {
        Some(Category::NewFile)
    } else if record.is_rename {
        Some(Category::Rename)
    } else if record.is_binary {
        Some(Category::Binary)
    } else {
        None
    }
}

/// Path-based categories, tried in order.
const PATH_RULES: &[(fn(&str) -> bool, Category)] = &[
    (language::is_test, Category::Test),
    (language::is_config, Category::Config),
    (language::is_doc, Category::Docs),
    (language::is_style, Category::Style),
    (language::is_markup, Category::Markup),
    (language::is_sql, Category::Sql),
];

fn path_category(path: &str) -> Option<Category> {
    PATH_RULES
        .iter()
        .find(|(matches, _)| matches(path))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, added: &[&str], removed: &[&str]) -> FileChangeRecord {
        let mut record = FileChangeRecord::new(path, path);
        record.added = added.iter().map(ToString::to_string).collect();
        record.removed = removed.iter().map(ToString::to_string).collect();
        record
    }

    fn lines(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    fn classify_default(record: &FileChangeRecord) -> Category {
        classify(record, &Thresholds::default())
    }

    // ── structural and path rules ──────────────────────────────────

    #[test]
    fn structural_flags_win_in_order() {
        let mut rec = record("tests/test_app.py", &[], &[]);
        rec.is_new = true;
        rec.is_deleted = true;
        assert_eq!(classify_default(&rec), Category::Deleted);

        rec.is_deleted = false;
        assert_eq!(classify_default(&rec), Category::NewFile);

        rec.is_new = false;
        rec.is_rename = true;
        rec.is_binary = true;
        assert_eq!(classify_default(&rec), Category::Rename);

        rec.is_rename = false;
        assert_eq!(classify_default(&rec), Category::Binary);
    }

    #[test]
    fn path_rules() {
        let cases = [
            ("tests/test_api.py", Category::Test),
            ("package.json", Category::Config),
            ("docs/guide.md", Category::Docs),
            ("static/site.scss", Category::Style),
            ("templates/index.html", Category::Markup),
            ("db/schema.sql", Category::Sql),
        ];
        for (path, expected) in cases {
            assert_eq!(classify_default(&record(path, &["x"], &[])), expected, "{path}");
        }
    }

    // ── fix scoring ────────────────────────────────────────────────

    #[test]
    fn error_handling_and_null_check_is_fix() {
        let rec = record(
            "app.py",
            &["    try:", "        if user is None:", "            return"],
            &[],
        );
        assert!(fix_score(&rec, &Thresholds::default()) >= 5);
        assert_eq!(classify_default(&rec), Category::Fix);
    }

    #[test]
    fn keyword_alone_is_update() {
        let rec = record("app.py", &["# fix later", "x = compute()"], &[]);
        assert_eq!(fix_score(&rec, &Thresholds::default()), 1);
        assert_eq!(classify_default(&rec), Category::Update);
    }

    #[test]
    fn small_edit_bonus_needs_both_sides() {
        let t = Thresholds::default();
        assert_eq!(fix_score(&record("a.py", &["a = 1"], &["a = 2"]), &t), 1);
        assert_eq!(fix_score(&record("a.py", &["a = 1"], &[]), &t), 0);
        let many: Vec<String> = lines("a = ", 7);
        let mut rec = record("a.py", &[], &["a = 2"]);
        rec.added = many;
        assert_eq!(fix_score(&rec, &t), 0);
    }

    #[test]
    fn null_check_with_small_edit_is_fix() {
        let rec = record(
            "app.js",
            &["const name = user !== null ? user.name : '';"],
            &["const name = user.name;"],
        );
        assert_eq!(fix_score(&rec, &Thresholds::default()), 3);
        assert_eq!(classify_default(&rec), Category::Fix);
    }

    // ── feat ───────────────────────────────────────────────────────

    #[test]
    fn new_definition_is_feat() {
        let rec = record("app.py", &["def export_csv(rows):", "    pass"], &[]);
        assert_eq!(classify_default(&rec), Category::Feat);
    }

    #[test]
    fn existing_definition_is_not_feat() {
        let rec = record("app.py", &["def run():", "    go()"], &["def run():", "    stop()"]);
        assert_eq!(classify_default(&rec), Category::Update);
    }

    #[test]
    fn feat_requires_enough_added_lines() {
        let mut rec = record("app.py", &["def tiny():"], &[]);
        rec.removed = lines("old_line_", 10);
        assert_eq!(classify_default(&rec), Category::Update);
    }

    // ── refactor ───────────────────────────────────────────────────

    #[test]
    fn balanced_large_edit_is_refactor() {
        let mut rec = record("app.py", &[], &[]);
        rec.added = lines("value_a_", 30);
        rec.removed = lines("value_b_", 25);
        assert_eq!(classify_default(&rec), Category::Refactor);
    }

    #[test]
    fn unbalanced_large_edit_is_update() {
        let mut rec = record("app.py", &[], &[]);
        rec.added = lines("value_a_", 80);
        rec.removed = lines("value_b_", 21);
        assert_eq!(classify_default(&rec), Category::Update);
    }

    #[test]
    fn thresholds_are_configurable() {
        let mut rec = record("app.py", &[], &[]);
        rec.added = lines("value_a_", 12);
        rec.removed = lines("value_b_", 12);
        assert_eq!(classify_default(&rec), Category::Update);

        let relaxed = Thresholds {
            refactor_min_lines: 10,
            ..Thresholds::default()
        };
        assert_eq!(classify(&rec, &relaxed), Category::Refactor);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        proptest! {
            #[test]
            fn classification_is_deterministic(
                path in "[a-z]{1,8}\\.(py|js|rs|go|md|css)",
                added in prop::collection::vec("\\PC{0,40}", 0..12),
                removed in prop::collection::vec("\\PC{0,40}", 0..12),
            ) {
                let mut rec = FileChangeRecord::new(path.clone(), path);
                rec.added = added;
                rec.removed = removed;
                let t = Thresholds::default();
                prop_assert_eq!(classify(&rec, &t), classify(&rec, &t));
            }
        }
    }
}
