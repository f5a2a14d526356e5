//! Line scanner that pulls tagged regions out of a single source file.
//!
//! A region opens on a line containing the start tag followed by the snippet name and closes on
//! the next line containing the end tag:
//!
//! ```text
//! // :prepend-start: greet
//! use std::io::Write;
//! // :prepend-end:
//!
//! fn main() {
//!     // :snippet-start: greet
//!     println!("hello");
//!     // :snippet-end:
//! }
//! ```
//!
//! Prepend regions name one or more snippets whose content they are prefixed to.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::config::SnippetTags;
use crate::error::{Error, Result};
use crate::language::Language;

/// A snippet as read from one file, before any cross-file deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnippet {
    pub name: String,
    pub content: String,
}

/// Collects prepend blocks, keyed by the snippet names listed on their start lines.
///
/// Comment and blank lines inside a block are dropped. A block without an end tag is ignored.
pub fn gather_prepends(
    content: &str,
    tags: &SnippetTags,
    language: Language,
) -> HashMap<String, Vec<String>> {
    let mut blocks: HashMap<String, Vec<String>> = HashMap::new();
    if tags.prepend_start.is_empty() || tags.prepend_end.is_empty() {
        return blocks;
    }

    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let start = match line.find(&tags.prepend_start) {
            Some(i) => i + tags.prepend_start.len(),
            None => continue,
        };
        let names: Vec<&str> = line[start..].split_whitespace().collect();

        let mut body = Vec::new();
        let mut terminated = false;
        for line in &mut lines {
            if line.contains(&tags.prepend_end) {
                terminated = true;
                break;
            }
            if line.trim().is_empty() || language.strip_comment(line).is_some() {
                continue;
            }
            body.push(line);
        }
        if !terminated {
            warn!(
                "prepend block for {:?} has no {:?} tag; ignoring it",
                names, tags.prepend_end
            );
            break;
        }

        let block = body.join("\n").trim().to_string();
        for name in names {
            blocks
                .entry(name.to_string())
                .or_default()
                .push(block.clone());
        }
    }
    blocks
}

/// The first whitespace-delimited token after `tag` on `line`.
pub fn snippet_name<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let i = line.find(tag)?;
    line[i + tag.len()..].split_whitespace().next()
}

/// Names become path components, so separators and the `.`/`..` entries are rejected.
fn is_valid_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(|c: char| c == '/' || c == '\\')
}

/// Extracts every snippet in `content`, in order of appearance.
///
/// `file_name` only feeds error messages. When a name repeats within the file, the first
/// region wins and later ones are skipped.
pub fn parse_snippets(
    content: &str,
    file_name: &str,
    language: Language,
    tags: &SnippetTags,
) -> Result<Vec<ParsedSnippet>> {
    let prepends = gather_prepends(content, tags, language);
    let is_prepend_tag = |line: &str| {
        (!tags.prepend_start.is_empty() && line.contains(&tags.prepend_start))
            || (!tags.prepend_end.is_empty() && line.contains(&tags.prepend_end))
    };

    let mut snippets = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in content.lines() {
        if line.contains(&tags.start) {
            let name = snippet_name(line, &tags.start).ok_or_else(|| Error::MissingSnippetName {
                file: file_name.to_string(),
            })?;
            if !is_valid_name(name) {
                return Err(Error::InvalidSnippetName {
                    name: name.to_string(),
                    file: file_name.to_string(),
                });
            }
            if let Some((open, _)) = &current {
                warn!(
                    "snippet '{}' in {} opened before '{}' was closed; discarding '{}'",
                    name, file_name, open, open
                );
            }
            if seen.insert(name) {
                current = Some((name, Vec::new()));
            } else {
                warn!("duplicate snippet '{}' in {}; keeping the first", name, file_name);
                current = None;
            }
        } else if line.contains(&tags.end) {
            if let Some((name, body)) = current.take() {
                snippets.push(ParsedSnippet {
                    name: name.to_string(),
                    content: assemble(prepends.get(name), &body, language),
                });
            }
        } else if let Some((_, body)) = &mut current {
            if !is_prepend_tag(line) {
                body.push(line);
            }
        }
    }

    match current {
        Some((name, _)) => Err(Error::MissingEndTag {
            name: name.to_string(),
            file: file_name.to_string(),
        }),
        None => Ok(snippets),
    }
}

fn assemble(prepends: Option<&Vec<String>>, body: &[&str], language: Language) -> String {
    let body = normalize_indentation(body, language);
    match prepends {
        Some(blocks) if !blocks.is_empty() => format!("{}\n\n{}", blocks.join("\n"), body),
        _ => body,
    }
}

/// Dedents `lines` by their common indentation and unwraps commented lines.
///
/// Lines that are only a comment marker, and blank lines, are dropped. The result is trimmed.
pub fn normalize_indentation(lines: &[&str], language: Language) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let dedented = line.get(indent..).unwrap_or_else(|| line.trim_start());
        let text = match language.strip_comment(dedented) {
            Some(rest) => rest,
            None => dedented,
        };
        if text.trim().is_empty() {
            continue;
        }
        out.push(text);
    }
    out.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> SnippetTags {
        SnippetTags::default()
    }

    fn parse(content: &str, language: Language) -> Result<Vec<ParsedSnippet>> {
        parse_snippets(content, "example.src", language, &tags())
    }

    #[test]
    fn test_snippet_name() {
        assert_eq!(
            snippet_name("    // :snippet-start: add", ":snippet-start:"),
            Some("add")
        );
        assert_eq!(
            snippet_name("//:snippet-start:example1 trailing", ":snippet-start:"),
            Some("example1")
        );
        assert_eq!(snippet_name("// :snippet-start:   ", ":snippet-start:"), None);
        assert_eq!(snippet_name("no tag here", ":snippet-start:"), None);
    }

    #[test]
    fn test_parse_python() {
        let src = "\
def test_adds_two_numbers(self):
    # :snippet-start: add
    result = add(2, 3)
    # result is 5
    # :snippet-end:
    self.assertEqual(result, 5)
";
        let snippets = parse(src, Language::Python).unwrap();
        assert_eq!(
            snippets,
            vec![ParsedSnippet {
                name: "add".to_string(),
                content: "result = add(2, 3)\nresult is 5".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_keeps_relative_indentation() {
        let src = "\
//:snippet-start: example1
    fun main() {
        println(\"Hello from Kotlin!\")
    }
//:snippet-end:
";
        let snippets = parse(src, Language::Kotlin).unwrap();
        assert_eq!(
            snippets[0].content,
            "fun main() {\n    println(\"Hello from Kotlin!\")\n}"
        );
    }

    #[test]
    fn test_parse_several_snippets_in_order() {
        let src = "\
// :snippet-start: second
b();
// :snippet-end:
// :snippet-start: first
a();
// :snippet-end:
";
        let names: Vec<_> = parse(src, Language::JavaScript)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_parse_duplicate_first_wins() {
        let src = "\
// :snippet-start: dup
one();
// :snippet-end:
// :snippet-start: dup
two();
// :snippet-end:
";
        let snippets = parse(src, Language::TypeScript).unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].content, "one();");
    }

    #[test]
    fn test_rust_attributes_survive() {
        let src = "\
// :snippet-start: derive
#[derive(Debug)]
struct Point;
// :snippet-end:
";
        let snippets = parse(src, Language::Rust).unwrap();
        assert_eq!(snippets[0].content, "#[derive(Debug)]\nstruct Point;");
    }

    #[test]
    fn test_prepends() {
        let src = "\
# :prepend-start: fetch store
# imports for both
import json
from pathlib import Path

# :prepend-end:

# :snippet-start: fetch
data = json.loads(Path('x').read_text())
# :snippet-end:
# :snippet-start: other
pass
# :snippet-end:
";
        let prepends = gather_prepends(src, &tags(), Language::Python);
        assert_eq!(
            prepends.get("fetch"),
            Some(&vec!["import json\nfrom pathlib import Path".to_string()])
        );
        assert!(prepends.contains_key("store"));

        let snippets = parse(src, Language::Python).unwrap();
        assert_eq!(
            snippets[0].content,
            "import json\nfrom pathlib import Path\n\ndata = json.loads(Path('x').read_text())"
        );
        assert_eq!(snippets[1].content, "pass");
    }

    #[test]
    fn test_unterminated_prepend_is_ignored() {
        let src = "// :prepend-start: a\nimport x;\n";
        assert!(gather_prepends(src, &tags(), Language::JavaScript).is_empty());
    }

    #[test]
    fn test_missing_name() {
        let err = parse("// :snippet-start:\nx\n// :snippet-end:\n", Language::JavaScript)
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing snippet name in file example.src");
    }

    #[test]
    fn test_missing_end_tag() {
        let err = parse("// :snippet-start: malformed\nx();\n", Language::JavaScript)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing end tag for snippet 'malformed' in file example.src"
        );
    }

    #[test]
    fn test_rejects_path_like_names() {
        for bad in &["../../escaped", "a/b", "a\\b", ".", ".."] {
            let src = format!("// :snippet-start: {}\nx();\n// :snippet-end:\n", bad);
            let err = parse(&src, Language::JavaScript).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid snippet name '{}' in file example.src", bad)
            );
        }
        let ok = parse(
            "// :snippet-start: v1.2-intro\nx();\n// :snippet-end:\n",
            Language::JavaScript,
        )
        .unwrap();
        assert_eq!(ok[0].name, "v1.2-intro");
    }

    #[test]
    fn test_end_without_start_is_ignored() {
        let snippets = parse("x();\n// :snippet-end:\n", Language::JavaScript).unwrap();
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_normalize_indentation() {
        let lines = ["        a();", "", "      //", "          b();", "      // note"];
        assert_eq!(
            normalize_indentation(&lines, Language::JavaScript),
            "a();\n    b();\nnote"
        );
        assert_eq!(normalize_indentation(&[], Language::Python), "");
    }
}
