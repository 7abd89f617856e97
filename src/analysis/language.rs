//! Path and language classification.
//!
//! Everything here is a pure function of the path string. Lookups go
//! through the special-file table first (exact lowercase file name), then
//! the extension table; unknown files resolve to an empty label.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// File extension (lowercase, leading dot) to language label.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    (".py", "Python"),
    (".pyw", "Python"),
    (".pyi", "Python"),
    (".js", "JavaScript"),
    (".mjs", "JavaScript"),
    (".cjs", "JavaScript"),
    (".ts", "TypeScript"),
    (".mts", "TypeScript"),
    (".jsx", "React"),
    (".tsx", "React"),
    (".vue", "Vue"),
    (".svelte", "Svelte"),
    (".java", "Java"),
    (".kt", "Kotlin"),
    (".kts", "Kotlin"),
    (".scala", "Scala"),
    (".sc", "Scala"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".c", "C"),
    (".h", "C"),
    (".cpp", "C++"),
    (".cc", "C++"),
    (".cxx", "C++"),
    (".hpp", "C++"),
    (".hxx", "C++"),
    (".cs", "C#"),
    (".rb", "Ruby"),
    (".rake", "Ruby"),
    (".gemspec", "Ruby"),
    (".php", "PHP"),
    (".php5", "PHP"),
    (".php7", "PHP"),
    (".phtml", "PHP"),
    (".swift", "Swift"),
    (".dart", "Dart"),
    (".ex", "Elixir"),
    (".exs", "Elixir"),
    (".hs", "Haskell"),
    (".lhs", "Haskell"),
    (".clj", "Clojure"),
    (".cljs", "Clojure"),
    (".lua", "Lua"),
    (".r", "R"),
    (".rmd", "R"),
    (".pl", "Perl"),
    (".pm", "Perl"),
    (".sh", "Shell"),
    (".bash", "Shell"),
    (".zsh", "Shell"),
    (".fish", "Shell"),
    (".ps1", "PowerShell"),
    (".psm1", "PowerShell"),
    (".html", "HTML"),
    (".htm", "HTML"),
    (".xhtml", "HTML"),
    (".xml", "XML"),
    (".xsl", "XSLT"),
    (".xslt", "XSLT"),
    (".svg", "SVG"),
    (".css", "CSS"),
    (".scss", "SCSS"),
    (".sass", "Sass"),
    (".less", "LESS"),
    (".sql", "SQL"),
    (".ddl", "SQL"),
    (".dml", "SQL"),
    (".graphql", "GraphQL"),
    (".gql", "GraphQL"),
    (".proto", "Protobuf"),
    (".json", "JSON"),
    (".jsonc", "JSON"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".toml", "TOML"),
    (".ini", "Config"),
    (".cfg", "Config"),
    (".conf", "Config"),
    (".env", "Environment"),
    (".md", "Markdown"),
    (".mdx", "Markdown"),
    (".rst", "reStructuredText"),
    (".txt", "Text"),
    (".tf", "Terraform"),
    (".hcl", "HCL"),
    (".gradle", "Gradle"),
];

/// Lowercase file names that resolve to a logical category regardless of extension.
const SPECIAL_FILES: &[(&str, &str)] = &[
    ("dockerfile", "Docker"),
    ("docker-compose.yml", "Docker"),
    ("docker-compose.yaml", "Docker"),
    (".dockerignore", "Docker"),
    ("makefile", "Build"),
    ("cmakelists.txt", "CMake"),
    ("jenkinsfile", "CI/CD"),
    (".travis.yml", "CI/CD"),
    (".gitlab-ci.yml", "CI/CD"),
    (".github", "CI/CD"),
    ("package.json", "Node"),
    ("package-lock.json", "Node"),
    ("yarn.lock", "Node"),
    ("pnpm-lock.yaml", "Node"),
    ("tsconfig.json", "TypeScript"),
    ("jsconfig.json", "JavaScript"),
    ("requirements.txt", "Python"),
    ("pyproject.toml", "Python"),
    ("setup.py", "Python"),
    ("setup.cfg", "Python"),
    ("pipfile", "Python"),
    ("pipfile.lock", "Python"),
    ("go.mod", "Go"),
    ("go.sum", "Go"),
    ("cargo.toml", "Rust"),
    ("cargo.lock", "Rust"),
    ("composer.json", "PHP"),
    ("composer.lock", "PHP"),
    ("pom.xml", "Maven"),
    ("build.gradle", "Gradle"),
    ("gemfile", "Ruby"),
    ("gemfile.lock", "Ruby"),
    (".gitignore", "Git"),
    (".gitattributes", "Git"),
    (".env", "Environment"),
    (".env.example", "Environment"),
    (".env.local", "Environment"),
    (".prettierrc", "Formatter"),
    (".eslintrc", "Linter"),
    (".eslintrc.js", "Linter"),
    (".eslintrc.json", "Linter"),
    (".eslintrc.yml", "Linter"),
    (".editorconfig", "Editor"),
    (".babelrc", "Babel"),
    ("vite.config.js", "Vite"),
    ("vite.config.ts", "Vite"),
    ("webpack.config.js", "Webpack"),
    ("webpack.config.ts", "Webpack"),
    ("next.config.js", "Next.js"),
    ("next.config.mjs", "Next.js"),
    ("nuxt.config.js", "Nuxt"),
    ("nuxt.config.ts", "Nuxt"),
    ("angular.json", "Angular"),
    ("tailwind.config.js", "Tailwind"),
    ("tailwind.config.ts", "Tailwind"),
    ("jest.config.js", "Jest"),
    ("jest.config.ts", "Jest"),
    ("vitest.config.ts", "Vitest"),
    (".mocharc.js", "Mocha"),
    ("license", "LICENSE"),
];

/// Language label to the icon shown in the rendered language badge.
const LANGUAGE_ICONS: &[(&str, &str)] = &[
    ("Python", "\u{1f40d}"),
    ("JavaScript", "\u{1f7e8}"),
    ("TypeScript", "\u{1f537}"),
    ("React", "\u{269b}"),
    ("Vue", "\u{1f49a}"),
    ("Svelte", "\u{1f9e1}"),
    ("Java", "\u{2615}"),
    ("Go", "\u{1f439}"),
    ("Rust", "\u{1f980}"),
    ("PHP", "\u{1f418}"),
    ("C", "\u{a9}"),
    ("C++", "\u{2295}"),
    ("C#", "\u{266f}"),
    ("Ruby", "\u{1f48e}"),
    ("Swift", "\u{1f985}"),
    ("Kotlin", "\u{1f3af}"),
    ("Scala", "\u{3bb}"),
    ("SQL", "\u{1f5c4}"),
    ("HTML", "\u{1f310}"),
    ("XML", "\u{1f4c4}"),
    ("CSS", "\u{1f3a8}"),
    ("SCSS", "\u{1f3a8}"),
    ("Shell", "\u{1f41a}"),
    ("Docker", "\u{1f433}"),
    ("Node", "\u{1f4e6}"),
    ("GraphQL", "\u{25c8}"),
    ("Markdown", "\u{1f4dd}"),
    ("YAML", "\u{2699}"),
    ("JSON", "{}"),
    ("TOML", "\u{2699}"),
    ("Dart", "\u{1f3af}"),
    ("Elixir", "\u{1f4a7}"),
    ("Haskell", "\u{3bb}"),
    ("Lua", "\u{1f319}"),
    ("CI/CD", "\u{1f504}"),
    ("Environment", "\u{1f510}"),
    ("Git", "\u{1f4c4}"),
    ("LICENSE", "\u{1f4c4}"),
];

/// Dependency manifests whose added/removed lines list package names.
const DEPENDENCY_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "pipfile",
    "go.mod",
    "cargo.toml",
    "composer.json",
    "gemfile",
    "pom.xml",
    "build.gradle",
    "package.json",
];

/// Files that look like data (JSON/XML) but are really configuration.
const PURE_CONFIG_NAMES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "tsconfig.json",
    "jsconfig.json",
    ".eslintrc.json",
    ".prettierrc",
    ".babelrc",
    "composer.json",
    "pom.xml",
    "build.gradle",
];

const DOC_EXTENSIONS: &[&str] = &[".md", ".mdx", ".rst", ".txt", ".adoc"];
const CONFIG_EXTENSIONS: &[&str] = &[".ini", ".cfg", ".conf", ".env"];
const CONFIG_DOTFILE_PREFIXES: &[&str] = &[".eslint", ".prettier", ".babel"];
const STYLE_EXTENSIONS: &[&str] = &[".css", ".scss", ".sass", ".less", ".styl"];
const MARKUP_EXTENSIONS: &[&str] = &[".html", ".htm", ".xhtml", ".xml", ".xsl", ".xslt", ".svg"];
const SQL_EXTENSIONS: &[&str] = &[".sql", ".ddl", ".dml"];

static EXTENSION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EXTENSION_LANGUAGES.iter().copied().collect());

static SPECIAL_FILE_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SPECIAL_FILES.iter().copied().collect());

static TEST_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(tests?/|specs?/|__tests?__/|\.test\.|\.spec\.|_test\.|test_\w|/test/|/spec/|Test\.\w+$|Tests\.\w+$)",
    )
    .unwrap()
});

/// Returns the final path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the lowercase extension including the leading dot, or `""`.
pub fn file_ext(path: &str) -> String {
    let name = file_name(path).to_lowercase();
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{ext}"),
        None => String::new(),
    }
}

/// Returns the file name with its last extension removed.
///
/// Dotfiles such as `.gitignore` keep their full name.
pub fn module_name(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Resolves a path to its language or logical category label.
pub fn language(path: &str) -> &'static str {
    let name = file_name(path).to_lowercase();
    if let Some(label) = SPECIAL_FILE_MAP.get(name.as_str()).copied() {
        return label;
    }
    EXTENSION_MAP
        .get(file_ext(path).as_str())
        .copied()
        .unwrap_or("")
}

/// Returns the badge icon for a language label, or `""`.
pub fn language_icon(language: &str) -> &'static str {
    LANGUAGE_ICONS
        .iter()
        .find(|(label, _)| *label == language)
        .map_or("", |(_, icon)| *icon)
}

/// Matches test directories, test infixes and `Test`/`Tests` suffixes.
pub fn is_test(path: &str) -> bool {
    TEST_PATH_PATTERN.is_match(path)
}

/// Markdown, reStructuredText, plain text and AsciiDoc files.
pub fn is_doc(path: &str) -> bool {
    DOC_EXTENSIONS.contains(&file_ext(path).as_str())
}

/// Build manifests, tooling dotfiles and settings-like files.
pub fn is_config(path: &str) -> bool {
    let name = file_name(path).to_lowercase();
    let ext = file_ext(path);
    SPECIAL_FILE_MAP.contains_key(name.as_str())
        || PURE_CONFIG_NAMES.contains(&name.as_str())
        || CONFIG_EXTENSIONS.contains(&ext.as_str())
        || name.contains("config")
        || name.contains("settings")
        || CONFIG_DOTFILE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Stylesheets.
pub fn is_style(path: &str) -> bool {
    STYLE_EXTENSIONS.contains(&file_ext(path).as_str())
}

/// HTML and XML-family markup.
pub fn is_markup(path: &str) -> bool {
    MARKUP_EXTENSIONS.contains(&file_ext(path).as_str())
}

/// SQL scripts.
pub fn is_sql(path: &str) -> bool {
    SQL_EXTENSIONS.contains(&file_ext(path).as_str())
}

/// Manifests whose lines name dependencies (`requirements.txt`, `package.json`, ...).
pub fn is_dependency_manifest(path: &str) -> bool {
    let name = file_name(path).to_lowercase();
    DEPENDENCY_MANIFESTS.contains(&name.as_str())
}
