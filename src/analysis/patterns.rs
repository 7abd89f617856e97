//! Regular-expression tables shared by the analysis stages.
//!
//! All patterns are compiled once on first use. Patterns that are tried
//! in sequence (definition detection) live in ordered tables; the order is
//! part of the behavior.

use std::sync::LazyLock;

use regex::Regex;

/// Number of leading [`DEFINITION_PATTERNS`] considered reliable enough to
/// run against raw changed lines when looking for a scope.
pub const RELIABLE_DEFINITION_PATTERNS: usize = 6;

/// Per-language definition patterns, in match priority order.
///
/// Every pattern captures the defined name in group 1.
pub static DEFINITION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Python: def foo / async def foo
        r"(?i)^\s*(?:async\s+)?def\s+(\w+)",
        // Python and friends: class Foo
        r"^\s*class\s+(\w+)",
        // JavaScript / TypeScript: function foo
        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s+(\w+)",
        // JavaScript / TypeScript: const foo = function / const foo = (
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(?:function|\()",
        // JavaScript / TypeScript: foo: ( / foo = async (
        r"^\s*(?:export\s+)?(?:async\s+)?(\w+)\s*[:=]\s*(?:async\s+)?\(",
        // Go: func Name( / func (r *Recv) Name(
        r"^\s*func\s+(?:\(\w+\s+\*?\w+\)\s+)?(\w+)\s*\(",
        // Ruby: def foo / def self.foo?
        r"^\s*def\s+(?:self\.)?(\w+[?!]?)",
        // PHP: public function foo(
        r"(?i)^\s*(?:public|private|protected|static|\s)*function\s+(\w+)\s*\(",
        // Java / C# / Kotlin / Swift: public ReturnType name(
        r"^\s*(?:public|private|protected|static|final|abstract|override|async|suspend|\s)+[\w<>\[\]]+\s+(\w+)\s*\(",
        // Kotlin: fun foo( / suspend fun foo(
        r"^\s*(?:suspend\s+)?(?:override\s+)?fun\s+(\w+)\s*[(<]",
        // Swift: func foo(
        r"^\s*(?:public|private|internal|fileprivate|open|\s)*func\s+(\w+)\s*[(<]",
        // Rust: fn foo( / pub(crate) async fn foo<
        r"^\s*(?:pub(?:\(\w+\))?\s+)?(?:async\s+)?fn\s+(\w+)\s*[(<]",
        // C / C++: return_type name(
        r"^\s*(?:static\s+)?(?:inline\s+)?(?:const\s+)?(?:\w+\s+)+(\w+)\s*\([^;]*$",
        // SQL: CREATE / ALTER / DROP of named objects
        r#"(?i)^\s*(?:CREATE|ALTER|DROP)\s+(?:OR\s+REPLACE\s+)?(?:TABLE|VIEW|FUNCTION|PROCEDURE|INDEX|TRIGGER)\s+(?:IF\s+(?:NOT\s+)?EXISTS\s+)?[`"]?(\w+)"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Control-flow keywords and literals that definition patterns can capture
/// by accident. Compared case-insensitively.
pub const SKIP_NAMES: &[&str] = &[
    "if", "else", "elif", "for", "while", "return", "try", "catch", "except", "finally", "switch",
    "case", "when", "do", "in", "import", "from", "class", "def", "function", "const", "let",
    "var", "true", "false", "null", "nil", "none", "self", "this",
];

/// Bug and error vocabulary, matched on whole words.
pub static FIX_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(fix|bug|patch|hotfix|correct|wrong|broken|crash|traceback|AttributeError|TypeError|KeyError|ValueError|IndexError|NameError|ZeroDivisionError|RuntimeError|NullPointerException|overflow|underflow|deadlock|race\s*condition|off.by.one|segfault|regression)\b",
    )
    .unwrap()
});

/// Error-handling constructs at the start of a line.
pub static ERROR_HANDLING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(try\s*:|except\s+|catch\s*\(|rescue\s+|raise\s+|throw\s+|finally\s*:|ensure\s+|assert\s+|guard\s+|if.*is\s+None|if.*==\s*null|if.*===\s*null|if.*is\s+not\s+None)",
    )
    .unwrap()
});

/// Null / optional handling anywhere in a line.
pub static NULL_CHECK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(is\s+None|is\s+not\s+None|is\s+nil|nil\?|guard\s+let|if\s+let|unwrap|Optional)|[!=]==?\s*null\b",
    )
    .unwrap()
});

/// Route declarations across common web frameworks. Each alternative has
/// its own capture group; the first non-empty group is the route.
pub static ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)@(?:app|router|api|blueprint|bp)\.(?:get|post|put|patch|delete|route)\s*\(\s*['"]([^'"]+)['"]"#,
        r#"|@(?:Get|Post|Put|Delete|Patch|RequestMapping|GetMapping|PostMapping)\s*(?:\(\s*['"]([^'"]+)['"])?"#,
        r#"|router\.(?:get|post|put|patch|delete)\s*\(\s*['"]([^'"]+)['"]"#,
        r#"|path\s*\(\s*['"]([^'"]+)['"]"#,
        r#"|Route::(?:get|post|put|patch|delete|any)\s*\(\s*['"]([^'"]+)['"]"#,
    ))
    .unwrap()
});

/// SQL statement at the start of a line.
pub static SQL_OPERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(SELECT|INSERT\s+INTO|UPDATE|DELETE\s+FROM|CREATE\s+TABLE|ALTER\s+TABLE|DROP\s+TABLE|CREATE\s+INDEX|CREATE\s+VIEW|CREATE\s+(?:OR\s+REPLACE\s+)?(?:FUNCTION|PROCEDURE)|TRUNCATE)\b",
    )
    .unwrap()
});

/// Table name following a table-introducing keyword.
pub static SQL_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:FROM|INTO|UPDATE|JOIN|TABLE)\s+[`"]?(\w+)[`"]?"#).unwrap()
});

/// Words [`SQL_TABLE`] captures that are keywords rather than tables.
pub const SQL_TABLE_STOPWORDS: &[&str] = &[
    "from", "into", "join", "table", "update", "where", "if", "select", "set", "values",
];

/// Class or id selector opening a rule block.
pub static CSS_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([.#][\w-]+(?:[\s,>+~:\[\]]*[\w.#-]+)*)\s*\{").unwrap()
});

/// `property: value` declaration.
pub static CSS_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w-]+)\s*:\s*[^/]").unwrap());

/// Captures that [`CSS_PROPERTY`] finds in URL values.
pub const CSS_PROPERTY_STOPWORDS: &[&str] = &["http", "https", "src"];

/// `<field name="...">` tags in XML views.
pub static XML_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<field\s+name=["'](\w+)["']"#).unwrap());

/// View attributes worth calling out when a field is modified.
pub static XML_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(widget|invisible|readonly|required|domain|attrs|decoration-\w+)\s*=")
        .unwrap()
});

/// Test declarations; group 1 is the case name or description.
pub static TEST_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:def\s+test_|it\s*\(['"]|test\s*\(['"]|describe\s*\(['"]|@Test)(.+?)(?:['"]|:|\()"#,
    )
    .unwrap()
});

/// Return statement.
pub static RETURN_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*return\b").unwrap());

/// Conditional keyword at the start of a line.
pub static CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(if|elif|else if|else|elsif|unless|switch|case|when|guard)\b").unwrap()
});

/// Attribute assignment through `self.` or `this.`.
pub static SELF_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:self|this)\.(\w+)\s*=").unwrap());

/// Caught exception list in handler lines, for detail bullets.
pub static CAUGHT_EXCEPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)except\s+([\w,\s]+):|catch\s*\(([\w\s|]+)\)").unwrap()
});

/// Dependency name followed by a version constraint.
pub static DEPENDENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?((?-u:[\w@/.:-]){2,40})["']?\s*[:=><~^]"#).unwrap()
});

/// Manifest metadata keys that look like dependencies but are not.
pub static MANIFEST_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(description|license|author|main|scripts|version|name)\s*[":=]"#).unwrap()
});

/// Version assignment; group 1 is the dotted version.
pub static VERSION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']?version["']?\s*[:=]\s*["']?([\d.]+)"#).unwrap()
});

/// Returns the first non-empty capture group of a match.
pub fn first_group(caps: &regex::Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().to_string())
        .find(|s| !s.is_empty())
}
