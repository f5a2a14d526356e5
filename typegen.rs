//! Type declarations and a manifest describing the extracted snippets, for front ends that
//! embed them.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};
use crate::extractor::Snippet;

pub const GEN_TYPES_DIR: &str = "gen-types";

const HEADER: &str = "/**
 * This file is auto-generated. Do not edit manually.
 * Generated from snippet tags in your codebase.
 */
";

/// Renders `index.d.ts`: a string literal union of every snippet name, sorted.
///
/// # Examples
///
/// ```
/// let ts = shnippet_core::typegen::render_declarations(vec!["sub", "add", "add"]);
/// assert!(ts.ends_with("export type SnippetName = 'add' | 'sub';\n"));
/// ```
pub fn render_declarations<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names: BTreeSet<&str> = names.into_iter().collect();
    let union = if names.is_empty() {
        "never".to_string()
    } else {
        names
            .iter()
            .map(|n| quote(n))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    format!("{}\nexport type SnippetName = {};\n", HEADER, union)
}

/// A single-quoted TypeScript string literal for `s`.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Maps each snippet name to the languages it was extracted for.
pub fn manifest(snippets: &[Snippet]) -> BTreeMap<&str, BTreeSet<&'static str>> {
    let mut out: BTreeMap<&str, BTreeSet<&'static str>> = BTreeMap::new();
    for s in snippets {
        out.entry(s.name.as_str())
            .or_default()
            .insert(s.language.dir_name());
    }
    out
}

/// Writes `gen-types/index.d.ts` and `gen-types/manifest.json` under `output`.
pub fn write_types(output: &Path, snippets: &[Snippet]) -> Result<()> {
    let dir = output.join(GEN_TYPES_DIR);
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    let decls = dir.join("index.d.ts");
    let ts = render_declarations(snippets.iter().map(|s| s.name.as_str()));
    fs::write(&decls, ts).map_err(|e| Error::io(&decls, e))?;

    let manifest_path = dir.join("manifest.json");
    let file = File::create(&manifest_path).map_err(|e| Error::io(&manifest_path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest(snippets))
        .map_err(|e| Error::io(&manifest_path, e.into()))?;
    Ok(())
}
