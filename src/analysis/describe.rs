//! Per-file descriptions: tag, one-line summary and details.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::analysis::classify::{classify, Thresholds};
use crate::analysis::details::{
    changed_text, extract_details, sql_tables, sql_verbs, version_bump,
};
use crate::analysis::language::{
    file_name, is_dependency_manifest, is_test, language, module_name,
};
use crate::analysis::patterns::{
    first_group, CONDITIONAL, NULL_CHECK, RETURN_STATEMENT, ROUTE,
};
use crate::analysis::scope::{detect_scope, new_definitions};
use crate::data::{Category, FileChangeRecord, FileDescriptor, Tag};

/// Added lines considered when guessing what a new file is for.
const PURPOSE_SCAN_LINES: usize = 80;

/// Definition names listed in a feature summary before "+N more".
const FEATURE_NAMES_SHOWN: usize = 3;

/// Fixed wording for well-known new files, keyed by lowercase file name.
const NEW_FILE_LABELS: &[(&str, &str)] = &[
    (".gitignore", "for exclusions"),
    ("license", "file"),
    ("readme.md", "for project overview"),
    ("pyproject.toml", "for build config"),
    ("setup.py", "for packaging"),
    ("__init__.py", "to initialize package"),
];

/// Content families recognized in new files, in priority order.
static PURPOSE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (
            r"(?i)(models\.Model|@Entity|@Table|Schema\(|struct\s+\w+\s*\{.*db:|migrate)",
            "model",
        ),
        (
            r"(?i)(class.*Controller|@Controller|@RestController|Blueprint|@router\.|Handler)",
            "controller",
        ),
        (r"(?i)(class.*View|View\(|TemplateView|APIView|viewset)", "view"),
        (
            r"(?i)(Component|render\s*\(|template:|export default.*function|defineComponent)",
            "component",
        ),
        (r"(?i)(Service|Repository|Dao|@Service|@Injectable)", "service"),
        (r"(?i)middleware", "middleware"),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), kind))
    .collect()
});

static MIGRATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(migration|migrate\.|CREATE TABLE|ALTER TABLE)").unwrap());

/// Path fragments that name a file's role, in priority order.
const PURPOSE_PATH_HINTS: &[(&[&str], &str)] = &[
    (&["util", "helper", "lib"], "utility"),
    (&["hook"], "hook"),
    (&["type", "interface"], "types"),
];

static VALIDATION_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(valid|sanitize|assert|check)\b").unwrap());

static CAUGHT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"except\s+(\w+)|catch\s*\(([\w\s|]+)\)").unwrap());

static BOUNDS_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(index|bounds|range|length|size|offset)\b").unwrap()
});

static TYPE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(type|cast|convert|parse|coerce)\b").unwrap());

static ACCESS_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(permission|access|auth|unauthorized|403|401)\b").unwrap()
});

/// What a matched fix rule says about the problem.
enum FixPhrase {
    Fixed(&'static str),
    CaughtException,
}

impl FixPhrase {
    fn render(&self, caps: &Captures<'_>) -> String {
        match self {
            Self::Fixed(phrase) => (*phrase).to_string(),
            Self::CaughtException => {
                let name = first_group(caps).unwrap_or_default();
                match name.trim() {
                    "" => "exception handling".to_string(),
                    name => format!("{name} handling"),
                }
            }
        }
    }
}

/// Fix phrasings, tried in order against the joined added text.
static FIX_RULES: [(&LazyLock<Regex>, FixPhrase); 6] = [
    (&NULL_CHECK, FixPhrase::Fixed("null/None handling")),
    (&VALIDATION_WORDS, FixPhrase::Fixed("validation")),
    (&CAUGHT_NAME, FixPhrase::CaughtException),
    (&BOUNDS_WORDS, FixPhrase::Fixed("index/bounds error")),
    (&TYPE_WORDS, FixPhrase::Fixed("type mismatch")),
    (&ACCESS_WORDS, FixPhrase::Fixed("access control")),
];

/// Summaries for changes that fit no specific category, tried in order.
const UPDATE_RULES: &[fn(&FileFacts<'_>) -> Option<(Tag, String)>] = &[
    route_update,
    return_update,
    logic_update,
    removal_update,
];

/// Everything the phrasing rules need to know about one file.
struct FileFacts<'a> {
    record: &'a FileChangeRecord,
    module: &'a str,
    language: &'static str,
    scope: String,
}

impl<'a> FileFacts<'a> {
    fn new(record: &'a FileChangeRecord) -> Self {
        Self {
            record,
            module: module_name(&record.path),
            language: language(&record.path),
            scope: detect_scope(record),
        }
    }

    /// ` [Lang]`, or nothing when the language is unknown.
    fn language_suffix(&self) -> String {
        bracketed(self.language)
    }

    /// ` in scope()`, or nothing when no scope was found.
    fn scope_suffix(&self) -> String {
        if self.scope.is_empty() {
            String::new()
        } else {
            format!(" in {}()", self.scope)
        }
    }

    fn scope_or_module(&self) -> &str {
        if self.scope.is_empty() {
            self.module
        } else {
            &self.scope
        }
    }

    fn language_or_module(&self) -> &str {
        if self.language.is_empty() {
            self.module
        } else {
            self.language
        }
    }
}

/// Classifies a record and phrases its one-line summary.
pub fn describe_file(record: &FileChangeRecord, thresholds: &Thresholds) -> FileDescriptor {
    let category = classify(record, thresholds);
    let facts = FileFacts::new(record);
    let details = extract_details(record, category);
    let (tag, summary) = summarize(&facts, category, &details);

    debug!(path = %record.path, %category, %tag, "Described file");
    FileDescriptor {
        tag,
        summary,
        details,
        language: facts.language.to_string(),
        path: record.path.clone(),
    }
}

fn summarize(facts: &FileFacts<'_>, category: Category, details: &[String]) -> (Tag, String) {
    let record = facts.record;
    let module = facts.module;

    match category {
        Category::Deleted => (
            Tag::Remove,
            format!("Remove {module}{}", facts.language_suffix()),
        ),
        Category::NewFile => describe_new_file(facts),
        Category::Rename => (
            Tag::Rename,
            format!("Rename {} → {module}", module_name(&record.old_path)),
        ),
        Category::Binary => (
            Tag::Update,
            format!("Update binary asset {}", file_name(&record.path)),
        ),
        Category::Test => {
            #[allow(clippy::cast_precision_loss)]
            let grows = record.added.len() as f64 > record.removed.len() as f64 * 1.5;
            let verb = if grows { "Add" } else { "Update" };
            (
                Tag::Test,
                format!("{verb} tests for {}", facts.scope_or_module()),
            )
        }
        Category::Docs => (Tag::Docs, format!("Update {module} documentation")),
        Category::Config => (Tag::Config, describe_config(facts)),
        Category::Style => {
            let selectors = details
                .iter()
                .find_map(|detail| detail.strip_prefix("selectors: "));
            let summary = match selectors {
                Some(selectors) => format!("Update styles for {selectors}"),
                None => format!("Update {module} styles"),
            };
            (Tag::Style, summary)
        }
        Category::Markup => {
            let fields_changed = details
                .iter()
                .any(|detail| detail.contains("fields") || detail.contains('+'));
            let kind = if fields_changed { "view/template" } else { "template" };
            (Tag::Update, format!("Update {module} {kind}"))
        }
        Category::Sql => {
            let operation = sql_verbs(record.changed_lines())
                .first()
                .map_or_else(|| "Update".to_string(), |verb| capitalize(verb));
            let table = sql_tables(record)
                .into_iter()
                .next()
                .unwrap_or_else(|| module.to_string());
            (Tag::Update, format!("{operation} SQL query on {table}"))
        }
        Category::Fix => (Tag::Fix, describe_fix(facts)),
        Category::Feat => (Tag::Add, describe_feature(facts)),
        Category::Refactor => (
            Tag::Refactor,
            format!(
                "Refactor {}{}",
                facts.scope_or_module(),
                facts.language_suffix()
            ),
        ),
        Category::Update => UPDATE_RULES
            .iter()
            .find_map(|rule| rule(facts))
            .unwrap_or_else(|| {
                (
                    Tag::Update,
                    format!(
                        "Update {}{}",
                        facts.scope_or_module(),
                        facts.language_suffix()
                    ),
                )
            }),
    }
}

fn describe_new_file(facts: &FileFacts<'_>) -> (Tag, String) {
    let path = &facts.record.path;
    if is_test(path) {
        return (Tag::Test, format!("Add tests for {}", facts.module));
    }

    let name = file_name(path);
    let lowered = name.to_lowercase();
    let special = NEW_FILE_LABELS
        .iter()
        .find(|(file, _)| *file == lowered)
        .map(|(_, label)| *label);

    let label = match special {
        Some(label) => format!("{name} {label}"),
        None => guess_purpose(facts).unwrap_or_else(|| {
            if facts.language.is_empty() {
                name.to_string()
            } else {
                format!("{name} ({})", facts.language)
            }
        }),
    };
    (Tag::Add, format!("Add {label}"))
}

/// Guesses the role of a new file from its first lines, then its path.
fn guess_purpose(facts: &FileFacts<'_>) -> Option<String> {
    let head = facts
        .record
        .added
        .iter()
        .take(PURPOSE_SCAN_LINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    let module = facts.module;
    let suffix = facts.language_suffix();

    if let Some((_, kind)) = PURPOSE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&head))
    {
        return Some(format!("{module} {kind}{suffix}"));
    }
    if MIGRATION.is_match(&head) {
        return Some(format!("{module} migration [SQL]"));
    }

    let path = facts.record.path.to_lowercase();
    PURPOSE_PATH_HINTS
        .iter()
        .find(|(hints, _)| hints.iter().any(|hint| path.contains(hint)))
        .map(|(_, kind)| format!("{module} {kind}{suffix}"))
}

fn describe_config(facts: &FileFacts<'_>) -> String {
    if !is_dependency_manifest(&facts.record.path) {
        return format!("Update {} configuration", facts.language_or_module());
    }
    match version_bump(&facts.record.added) {
        Some(version) => format!("Bump {} version to {version}", facts.module),
        None => format!("Update {} dependencies", facts.language_or_module()),
    }
}

fn describe_fix(facts: &FileFacts<'_>) -> String {
    let location = if facts.scope.is_empty() {
        format!(" in {}", facts.module)
    } else {
        facts.scope_suffix()
    };
    let added = facts.record.added.join("\n");

    let problem = FIX_RULES
        .iter()
        .find_map(|(pattern, phrase)| pattern.captures(&added).map(|caps| phrase.render(&caps)))
        .unwrap_or_else(|| "bug".to_string());
    format!("Fix {problem}{location}")
}

fn describe_feature(facts: &FileFacts<'_>) -> String {
    let names = new_definitions(&facts.record.added, &facts.record.removed);
    if names.is_empty() {
        return format!("Add new functionality in {}", facts.module);
    }
    let shown = names
        .iter()
        .take(FEATURE_NAMES_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let extra = if names.len() > FEATURE_NAMES_SHOWN {
        format!(" +{} more", names.len() - FEATURE_NAMES_SHOWN)
    } else {
        String::new()
    };
    format!("Add {shown}{extra} in {}", facts.module)
}

fn route_update(facts: &FileFacts<'_>) -> Option<(Tag, String)> {
    let text = changed_text(facts.record);
    let route = first_group(&ROUTE.captures(&text)?)?;
    Some((
        Tag::Update,
        format!("Update route '{route}' in {}", facts.module),
    ))
}

fn return_update(facts: &FileFacts<'_>) -> Option<(Tag, String)> {
    let returns = |lines: &[String]| lines.iter().any(|line| RETURN_STATEMENT.is_match(line));
    (returns(facts.record.added.as_slice()) && returns(facts.record.removed.as_slice())).then(
        || {
            (
                Tag::Update,
                format!(
                    "Update return value{} in {}",
                    facts.scope_suffix(),
                    facts.module
                ),
            )
        },
    )
}

fn logic_update(facts: &FileFacts<'_>) -> Option<(Tag, String)> {
    facts
        .record
        .added
        .iter()
        .any(|line| CONDITIONAL.is_match(line))
        .then(|| {
            (
                Tag::Update,
                format!("Update logic{} in {}", facts.scope_suffix(), facts.module),
            )
        })
}

fn removal_update(facts: &FileFacts<'_>) -> Option<(Tag, String)> {
    let record = facts.record;
    (record.added.is_empty() && !record.removed.is_empty()).then(|| {
        (
            Tag::Remove,
            format!(
                "Remove unused code{} in {}",
                facts.scope_suffix(),
                facts.module
            ),
        )
    })
}

fn bracketed(language: &str) -> String {
    if language.is_empty() {
        String::new()
    } else {
        format!(" [{language}]")
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
