//! Per-category detail highlights.
//!
//! Details are short strings shown under each file in the rendered block.
//! A string starting with `+ ` or `- ` is displayed as an addition or a
//! removal. Nothing here can fail: a pattern that finds nothing just omits
//! its line.

use std::collections::{BTreeSet, HashSet};

use crate::analysis::language::is_dependency_manifest;
use crate::analysis::patterns::{
    first_group, CAUGHT_EXCEPTION, CSS_PROPERTY, CSS_PROPERTY_STOPWORDS, CSS_SELECTOR, DEPENDENCY,
    ERROR_HANDLING, MANIFEST_METADATA, ROUTE, SELF_ASSIGNMENT, SQL_OPERATION, SQL_TABLE,
    SQL_TABLE_STOPWORDS, TEST_CASE, VERSION_ASSIGNMENT, XML_ATTRIBUTE, XML_FIELD,
};
use crate::analysis::scope::find_defined_names;
use crate::data::{Category, FileChangeRecord};

/// Maximum number of detail lines per file.
pub const MAX_DETAILS: usize = 4;

/// Maximum length of a test case name or exception list.
const MAX_NAME_CHARS: usize = 40;

/// Extracts up to [`MAX_DETAILS`] highlights for a classified record.
pub fn extract_details(record: &FileChangeRecord, category: Category) -> Vec<String> {
    let mut details = if category.is_structural() {
        Vec::new()
    } else if category.is_code() {
        code_details(record, category)
    } else {
        match category {
            Category::Config => config_details(record),
            Category::Sql => sql_details(record),
            Category::Style => style_details(record),
            Category::Markup => markup_details(record),
            Category::Test => test_details(record),
            _ => Vec::new(),
        }
    };
    details.truncate(MAX_DETAILS);
    details
}

/// Dependency names declared in manifest lines, skipping metadata keys.
pub fn dependency_names<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let names = lines.iter().filter_map(|line| {
        let line = line.as_ref();
        if MANIFEST_METADATA.is_match(line) {
            return None;
        }
        let caps = DEPENDENCY.captures(line)?;
        let name = caps[1].trim_matches(|c: char| matches!(c, '.' | '-' | '_'));
        (name.chars().count() > 1).then(|| name.to_string())
    });
    unique(names)
}

/// First dotted version assigned in `lines`, if any.
pub fn version_bump<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| VERSION_ASSIGNMENT.captures(line.as_ref()))
        .map(|caps| caps[1].to_string())
}

/// Upper-cased leading SQL verbs, distinct, in first-seen order.
pub fn sql_verbs<'a>(lines: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    unique(lines.into_iter().filter_map(|line| {
        let caps = SQL_OPERATION.captures(line)?;
        caps[1]
            .split_whitespace()
            .next()
            .map(str::to_uppercase)
    }))
}

/// Table names touched by changed lines, sorted and distinct.
pub fn sql_tables(record: &FileChangeRecord) -> Vec<String> {
    let tables: BTreeSet<String> = record
        .changed_lines()
        .flat_map(|line| SQL_TABLE.captures_iter(line))
        .map(|caps| caps[1].to_string())
        .filter(|table| !SQL_TABLE_STOPWORDS.contains(&table.to_lowercase().as_str()))
        .collect();
    tables.into_iter().collect()
}

fn config_details(record: &FileChangeRecord) -> Vec<String> {
    let mut details = Vec::new();
    if is_dependency_manifest(&record.path) {
        let added = dependency_names(&record.added);
        let removed = dependency_names(&record.removed);
        if !added.is_empty() {
            details.push(format!("+ {}", join_first(&added, 4)));
        }
        if !removed.is_empty() {
            details.push(format!("- {}", join_first(&removed, 4)));
        }
    }
    if let Some(version) = version_bump(&record.added) {
        details.push(format!("version → {version}"));
    }
    details
}

fn sql_details(record: &FileChangeRecord) -> Vec<String> {
    let mut details = Vec::new();
    let verbs = sql_verbs(record.changed_lines());
    let tables = sql_tables(record);

    if !verbs.is_empty() {
        details.push(format!("ops: {}", join_first(&verbs, 3)));
    }
    if !tables.is_empty() {
        details.push(format!("tables: {}", join_first(&tables, 4)));
    }
    details
}

fn style_details(record: &FileChangeRecord) -> Vec<String> {
    let mut details = Vec::new();
    let selectors = unique(
        record
            .changed_lines()
            .filter_map(|line| CSS_SELECTOR.captures(line))
            .map(|caps| caps[1].trim().to_string()),
    );
    let properties = unique(
        record
            .changed_lines()
            .filter_map(|line| CSS_PROPERTY.captures(line))
            .map(|caps| caps[1].to_lowercase())
            .filter(|prop| !CSS_PROPERTY_STOPWORDS.contains(&prop.as_str())),
    );

    if !selectors.is_empty() {
        details.push(format!("selectors: {}", join_first(&selectors, 3)));
    }
    if !properties.is_empty() {
        details.push(format!("properties: {}", join_first(&properties, 4)));
    }
    details
}

fn markup_details(record: &FileChangeRecord) -> Vec<String> {
    let added_text = record.added.join("\n");
    let removed_text = record.removed.join("\n");
    let fields = |text: &str| -> BTreeSet<String> {
        XML_FIELD
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    };
    let new_fields = fields(&added_text);
    let gone_fields = fields(&removed_text);

    let only_new: Vec<String> = new_fields.difference(&gone_fields).cloned().collect();
    let only_gone: Vec<String> = gone_fields.difference(&new_fields).cloned().collect();
    let modified: Vec<String> = new_fields.intersection(&gone_fields).cloned().collect();

    let mut details = Vec::new();
    if !only_new.is_empty() {
        details.push(format!("+ fields: {}", join_first(&only_new, 4)));
    }
    if !only_gone.is_empty() {
        details.push(format!("- fields: {}", join_first(&only_gone, 4)));
    }
    if !modified.is_empty() {
        let attributes = unique(
            XML_ATTRIBUTE
                .captures_iter(&added_text)
                .map(|caps| caps[1].to_string()),
        );
        if attributes.is_empty() {
            details.push(format!("updated: {}", join_first(&modified, 3)));
        } else {
            details.push(format!(
                "modified {}: {}",
                join_first(&modified, 2),
                join_first(&attributes, 3)
            ));
        }
    }
    details
}

fn test_details(record: &FileChangeRecord) -> Vec<String> {
    let cases: Vec<String> = record
        .added
        .iter()
        .filter_map(|line| TEST_CASE.captures(line))
        .map(|caps| truncate_chars(caps[1].trim(), MAX_NAME_CHARS))
        .collect();
    if cases.is_empty() {
        Vec::new()
    } else {
        vec![format!("cases: {}", join_first(&cases, 3))]
    }
}

fn code_details(record: &FileChangeRecord, category: Category) -> Vec<String> {
    let mut details = Vec::new();

    let new_names = find_defined_names(&record.added);
    let old_names = find_defined_names(&record.removed);
    let added_defs: Vec<String> = new_names
        .iter()
        .filter(|name| !old_names.contains(name))
        .cloned()
        .collect();
    let removed_defs: Vec<String> = old_names
        .iter()
        .filter(|name| !new_names.contains(name))
        .cloned()
        .collect();

    if !added_defs.is_empty() {
        details.push(format!("added: {}", join_first(&added_defs, 4)));
    }
    if !removed_defs.is_empty() {
        details.push(format!("removed: {}", join_first(&removed_defs, 4)));
    }

    let all_text = changed_text(record);
    let routes = unique(
        ROUTE
            .captures_iter(&all_text)
            .filter_map(|caps| first_group(&caps)),
    );
    if !routes.is_empty() {
        details.push(format!("routes: {}", join_first(&routes, 3)));
    }

    let assigned = |lines: &[String]| -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| SELF_ASSIGNMENT.captures(line))
            .map(|caps| caps[1].to_string())
            .collect()
    };
    let removed_fields = assigned(record.removed.as_slice());
    let changed_fields = unique(
        assigned(record.added.as_slice())
            .into_iter()
            .filter(|field| removed_fields.contains(field)),
    );
    if !changed_fields.is_empty() && added_defs.is_empty() {
        details.push(format!("fields: {}", join_first(&changed_fields, 4)));
    }

    if category == Category::Fix {
        if let Some(handled) = handled_exception(&record.added) {
            details.push(format!("handles: {handled}"));
        }
    }

    if details.is_empty() {
        let verbs = sql_verbs(record.changed_lines());
        if !verbs.is_empty() {
            details.push(format!("queries: {}", join_first(&verbs, 3)));
        }
    }

    details
}

/// Exception names caught by newly added error-handling lines.
fn handled_exception(added: &[String]) -> Option<String> {
    let handler_lines: Vec<&str> = added
        .iter()
        .map(String::as_str)
        .filter(|line| ERROR_HANDLING.is_match(line))
        .collect();
    if handler_lines.is_empty() {
        return None;
    }
    let handler_text = handler_lines.join("\n");
    let caps = CAUGHT_EXCEPTION.captures(&handler_text)?;
    let name = first_group(&caps)?;
    let name = name.trim();
    (!name.is_empty()).then(|| truncate_chars(name, MAX_NAME_CHARS))
}

/// Added then removed lines joined by newlines.
pub(crate) fn changed_text(record: &FileChangeRecord) -> String {
    record
        .changed_lines()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins at most `limit` items with `", "`.
pub(crate) fn join_first(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// First `limit` characters of `text`.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Removes duplicates, keeping the first occurrence.
fn unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
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

    // ── structural ─────────────────────────────────────────────────

    #[test]
    fn structural_and_docs_have_no_details() {
        let rec = record("README.md", &["def main():"], &[]);
        for category in [
            Category::NewFile,
            Category::Deleted,
            Category::Rename,
            Category::Binary,
            Category::Docs,
        ] {
            assert!(extract_details(&rec, category).is_empty());
        }
    }

    #[test]
    fn definitions_only_reported_for_code_categories() {
        let rec = record("app.py", &["def list_users():"], &[]);
        for category in [Category::Fix, Category::Feat, Category::Refactor, Category::Update] {
            assert_eq!(extract_details(&rec, category), vec!["added: list_users"]);
        }
        for category in [Category::Rename, Category::Docs, Category::Markup] {
            assert!(extract_details(&rec, category).is_empty(), "{category}");
        }
    }

    // ── config ─────────────────────────────────────────────────────

    #[test]
    fn requirements_dependencies() {
        let rec = record(
            "requirements.txt",
            &["requests==2.31.0", "rich>=13"],
            &["urllib3<2"],
        );
        assert_eq!(
            extract_details(&rec, Category::Config),
            vec!["+ requests, rich", "- urllib3"]
        );
    }

    #[test]
    fn package_json_skips_metadata() {
        let rec = record(
            "package.json",
            &[
                r#"  "description": "tool","#,
                r#"    "lodash": "^4.17.21","#,
                r#"  "version": "1.4.0","#,
            ],
            &[r#"  "version": "1.3.9","#],
        );
        assert_eq!(
            extract_details(&rec, Category::Config),
            vec!["+ lodash", "version → 1.4.0"]
        );
    }

    #[test]
    fn non_manifest_config_only_reports_version() {
        let rec = record("setup.cfg", &["name = demo", "version = 0.2.0"], &[]);
        assert_eq!(extract_details(&rec, Category::Config), vec!["version → 0.2.0"]);
    }

    // ── sql ────────────────────────────────────────────────────────

    #[test]
    fn sql_ops_and_tables() {
        let rec = record(
            "db/report.sql",
            &[
                "SELECT id FROM users JOIN orders ON orders.user_id = users.id",
                "UPDATE accounts SET active = 1",
            ],
            &["DELETE FROM sessions"],
        );
        assert_eq!(
            extract_details(&rec, Category::Sql),
            vec![
                "ops: SELECT, UPDATE, DELETE",
                "tables: accounts, orders, sessions, users",
            ]
        );
    }

    // ── style ──────────────────────────────────────────────────────

    #[test]
    fn style_selectors_and_properties() {
        let rec = record(
            "site.css",
            &[".navbar {", "  color: red;", "  background: url(https://x/y.png);"],
            &["#header .title {", "  color: blue;"],
        );
        assert_eq!(
            extract_details(&rec, Category::Style),
            vec![
                "selectors: .navbar, #header .title",
                "properties: color, background",
            ]
        );
    }

    // ── markup ─────────────────────────────────────────────────────

    #[test]
    fn markup_field_changes() {
        let rec = record(
            "views/partner.xml",
            &[
                r#"<field name="email" widget="email"/>"#,
                r#"<field name="phone"/>"#,
            ],
            &[r#"<field name="email"/>"#, r#"<field name="fax"/>"#],
        );
        assert_eq!(
            extract_details(&rec, Category::Markup),
            vec!["+ fields: phone", "- fields: fax", "modified email: widget"]
        );
    }

    #[test]
    fn markup_modified_without_attributes() {
        let rec = record(
            "views/partner.xml",
            &[r#"<field name="email" string="Mail"/>"#],
            &[r#"<field name="email"/>"#],
        );
        assert_eq!(extract_details(&rec, Category::Markup), vec!["updated: email"]);
    }

    // ── test ───────────────────────────────────────────────────────

    #[test]
    fn test_case_names() {
        let rec = record(
            "tests/test_api.py",
            &["def test_login_ok():", "it('renders the header', () => {"],
            &[],
        );
        assert_eq!(
            extract_details(&rec, Category::Test),
            vec!["cases: login_ok, renders the header"]
        );
    }

    // ── code ───────────────────────────────────────────────────────

    #[test]
    fn code_definitions_and_routes() {
        let rec = record(
            "app.py",
            &["@app.get('/users')", "def list_users():"],
            &["def old_users():"],
        );
        assert_eq!(
            extract_details(&rec, Category::Feat),
            vec!["added: list_users", "removed: old_users", "routes: /users"]
        );
    }

    #[test]
    fn route_on_both_sides_is_listed_once() {
        let rec = record(
            "app.py",
            &["@app.get('/users')  # new", "@app.post('/orders')"],
            &["@app.get('/users')  # old"],
        );
        assert_eq!(
            extract_details(&rec, Category::Update),
            vec!["routes: /users, /orders"]
        );
    }

    #[test]
    fn fields_only_without_new_definitions() {
        let rec = record("model.py", &["    self.name = name"], &["    self.name = n"]);
        assert_eq!(extract_details(&rec, Category::Update), vec!["fields: name"]);
    }

    #[test]
    fn fix_reports_handled_exception() {
        let rec = record(
            "app.py",
            &["    try:", "        load()", "    except KeyError:", "        pass"],
            &[],
        );
        assert_eq!(extract_details(&rec, Category::Fix), vec!["handles: KeyError"]);
        assert!(extract_details(&rec, Category::Update).is_empty());
    }

    #[test]
    fn blank_exception_name_is_omitted() {
        for handler in ["    except  :", "    catch ( ) {"] {
            let rec = record("app.py", &["    try:", handler], &[]);
            let details = extract_details(&rec, Category::Fix);
            assert!(
                details.iter().all(|line| !line.starts_with("handles:")),
                "{handler}: {details:?}"
            );
        }
    }

    #[test]
    fn queries_when_nothing_else() {
        let rec = record(
            "repo.py",
            &["    SELECT * FROM users", "    INSERT INTO audit VALUES (1);"],
            &["    SELECT id FROM users"],
        );
        assert_eq!(
            extract_details(&rec, Category::Update),
            vec!["queries: SELECT, INSERT"]
        );
    }

    #[test]
    fn details_are_capped() {
        let rec = record(
            "app.py",
            &[
                "@app.get('/a')",
                "def one():",
                "    self.x = 1",
                "    try:",
                "    except ValueError:",
            ],
            &["def two():", "    self.x = 0"],
        );
        assert!(extract_details(&rec, Category::Fix).len() <= MAX_DETAILS);
    }

    // ── helpers ────────────────────────────────────────────────────

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
    }
}
