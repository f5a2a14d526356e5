//! Source languages recognized by file extension.

use std::fmt::{self, Display};
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    JavaScript,
    TypeScript,
    Kotlin,
    Python,
    Rust,
    Swift,
    Gradle,
    Bash,
    Xml,
    Other,
}

impl Language {
    /// Looks up a language by extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.') {
            "js" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "kt" => Language::Kotlin,
            "py" => Language::Python,
            "rs" => Language::Rust,
            "swift" => Language::Swift,
            "gradle" => Language::Gradle,
            "bash" => Language::Bash,
            "xml" => Language::Xml,
            _ => Language::Other,
        }
    }

    /// Looks up a language by its full name (`python`) or its directory name (`py`).
    pub fn from_name(name: &str) -> Option<Self> {
        let lang = match name {
            "javascript" | "js" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "kotlin" | "kt" => Language::Kotlin,
            "python" | "py" => Language::Python,
            "rust" | "rs" => Language::Rust,
            "swift" => Language::Swift,
            "gradle" => Language::Gradle,
            "bash" => Language::Bash,
            "xml" => Language::Xml,
            "other" => Language::Other,
            _ => return None,
        };
        Some(lang)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Language::Other, Language::from_extension)
    }

    /// Name of the output directory holding this language's snippets.
    pub fn dir_name(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Kotlin => "kt",
            Language::Python => "py",
            Language::Rust => "rs",
            Language::Swift => "swift",
            Language::Gradle => "gradle",
            Language::Bash => "bash",
            Language::Xml => "xml",
            Language::Other => "other",
        }
    }

    /// Line comment prefixes stripped from marker and snippet lines.
    ///
    /// Languages without a single line comment syntax accept both `//` and `#`.
    pub fn comment_markers(self) -> &'static [&'static str] {
        match self {
            Language::Python | Language::Bash => &["#"],
            Language::JavaScript
            | Language::TypeScript
            | Language::Kotlin
            | Language::Rust
            | Language::Swift
            | Language::Gradle => &["//"],
            Language::Xml | Language::Other => &["//", "#"],
        }
    }

    /// If `line`, ignoring leading whitespace, starts with a comment marker, returns the text
    /// after the marker with leading whitespace removed.
    pub fn strip_comment(self, line: &str) -> Option<&str> {
        let trimmed = line.trim_start();
        self.comment_markers()
            .iter()
            .find_map(|m| trimmed.strip_prefix(m))
            .map(str::trim_start)
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
