//! Walks a source tree and writes every tagged region out as a snippet file.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::layout;
use crate::parse::{self, ParsedSnippet};
use crate::typegen;

/// A snippet that survived deduplication and is ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub language: Language,
    /// Source file, relative to the scanned root.
    pub source: PathBuf,
    pub content: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub snippets_written: usize,
    /// Snippets dropped because an earlier file already defined the name for that language.
    pub duplicates_skipped: usize,
}

pub struct Extractor {
    config: Config,
}

impl Extractor {
    /// Creates an extractor, rejecting configs with missing required fields.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Extractor { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Files under the root directory that match the configured extensions, in a stable order.
    ///
    /// Entries named in `exclude` are skipped; for directories, so is everything beneath them.
    pub fn collect_sources(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root_directory;
        let exclude = &self.config.exclude;
        let walker = WalkDir::new(root)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !exclude
                        .iter()
                        .any(|x| e.file_name().to_str() == Some(x.as_str()))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| Error::Walk {
                root: root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && self.wants(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn wants(&self, path: &Path) -> bool {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext,
            None => return false,
        };
        self.config
            .file_extensions
            .iter()
            .any(|want| want.trim_start_matches('.') == ext)
    }

    /// Parses every source file and returns the snippets to write, without touching the output
    /// directory.
    ///
    /// Files are parsed in parallel. Within one language, a name is claimed by the first file in
    /// walk order; later definitions are dropped.
    pub fn scan(&self) -> Result<(Vec<Snippet>, ExtractSummary)> {
        let files = self.collect_sources()?;
        let tags = &self.config.snippet_tags;

        let results: Vec<_> = files
            .par_iter()
            .map(|path| -> Result<(PathBuf, Language, Vec<ParsedSnippet>)> {
                let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                let language = Language::from_path(path);
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let snippets = parse::parse_snippets(&content, &file_name, language, tags)?;
                debug!("{}: {} snippet(s)", path.display(), snippets.len());
                Ok((path.clone(), language, snippets))
            })
            .collect();
        // First failure in walk order.
        let parsed = results.into_iter().collect::<Result<Vec<_>>>()?;

        let mut summary = ExtractSummary {
            files_scanned: files.len(),
            ..ExtractSummary::default()
        };
        let mut claimed: HashMap<Language, HashSet<String>> = HashMap::new();
        let mut out = Vec::new();
        for (path, language, snippets) in parsed {
            let source = path
                .strip_prefix(&self.config.root_directory)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            let names = claimed.entry(language).or_default();
            for snippet in snippets {
                if !names.insert(snippet.name.clone()) {
                    debug!(
                        "{}: '{}' already defined for {}; skipping",
                        source.display(),
                        snippet.name,
                        language
                    );
                    summary.duplicates_skipped += 1;
                    continue;
                }
                out.push(Snippet {
                    name: snippet.name,
                    language,
                    source: source.clone(),
                    content: snippet.content,
                });
            }
        }
        Ok((out, summary))
    }

    /// Scans the root directory and writes all snippets plus the generated type files.
    pub fn extract(&self) -> Result<ExtractSummary> {
        let output = &self.config.snippet_output_directory;
        fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;

        let (snippets, mut summary) = self.scan()?;
        let base = self.config.versioned_output();
        for snippet in &snippets {
            let source_dir = snippet.source.parent().unwrap_or_else(|| Path::new(""));
            let path = base.join(layout::snippet_path(
                self.config.output_directory_structure,
                snippet.language,
                &snippet.name,
                source_dir,
            ));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::write(&path, &snippet.content).map_err(|e| Error::io(&path, e))?;
            summary.snippets_written += 1;
        }

        typegen::write_types(output, &snippets)?;
        info!(
            "wrote {} snippet(s) from {} file(s) to {} ({} duplicate(s) skipped)",
            summary.snippets_written,
            summary.files_scanned,
            base.display(),
            summary.duplicates_skipped
        );
        Ok(summary)
    }
}

/// Removes the output directory and everything in it.
///
/// Returns `false`, after logging, when there was nothing to remove.
pub fn clear(output: &Path) -> Result<bool> {
    if !output.exists() {
        info!("Output directory does not exist: {}", output.display());
        return Ok(false);
    }
    fs::remove_dir_all(output).map_err(|e| Error::io(output, e))?;
    info!("removed {}", output.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::config::OutputStructure;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(src: &Path, out: &Path) -> Config {
        Config {
            root_directory: src.to_path_buf(),
            snippet_output_directory: out.to_path_buf(),
            file_extensions: vec![".js".to_string(), ".py".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_new_validates() {
        let err = Extractor::new(Config::default()).err().unwrap();
        assert_eq!(err.to_string(), "rootDirectory is required");
    }

    #[test]
    fn test_collect_sources_filters_and_excludes() {
        let src = TempDir::new().unwrap();
        write(src.path(), "b.js", "");
        write(src.path(), "a.py", "");
        write(src.path(), "notes.md", "");
        write(src.path(), "node_modules/dep.js", "");
        write(src.path(), "nested/c.js", "");
        write(src.path(), "nested/skip.js", "");

        let mut c = config(src.path(), Path::new("unused"));
        c.exclude = vec!["node_modules".to_string(), "skip.js".to_string()];
        let files = Extractor::new(c).unwrap().collect_sources().unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(src.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("b.js"),
                PathBuf::from("nested/c.js"),
            ]
        );
    }

    #[test]
    fn test_scan_dedupes_per_language() {
        let src = TempDir::new().unwrap();
        write(
            src.path(),
            "a.js",
            "// :snippet-start: greet\nfirst();\n// :snippet-end:\n",
        );
        write(
            src.path(),
            "b.js",
            "// :snippet-start: greet\nsecond();\n// :snippet-end:\n",
        );
        write(
            src.path(),
            "c.py",
            "# :snippet-start: greet\nthird()\n# :snippet-end:\n",
        );

        let extractor = Extractor::new(config(src.path(), Path::new("unused"))).unwrap();
        let (snippets, summary) = extractor.scan().unwrap();
        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.duplicates_skipped, 1);
        let got: Vec<_> = snippets
            .iter()
            .map(|s| (s.language, s.content.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Language::JavaScript, "first();"),
                (Language::Python, "third()"),
            ]
        );
    }

    #[test]
    fn test_extract_with_version_and_structure() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(
            src.path(),
            "math/add.py",
            "# :snippet-start: add\nadd(2, 3)\n# :snippet-end:\n",
        );

        let mut c = config(src.path(), out.path());
        c.version = Some("1.0.0".to_string());
        c.output_directory_structure = OutputStructure::Match;
        let summary = Extractor::new(c).unwrap().extract().unwrap();
        assert_eq!(summary.snippets_written, 1);

        let written = out.path().join("1.0.0/math/py/add.snippet.txt");
        assert_eq!(fs::read_to_string(written).unwrap(), "add(2, 3)");
        assert!(out.path().join("gen-types/index.d.ts").is_file());
    }

    #[test]
    fn test_extract_propagates_parse_errors() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(src.path(), "broken.js", "// :snippet-start: oops\nx();\n");

        let err = Extractor::new(config(src.path(), out.path()))
            .unwrap()
            .extract()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing end tag for snippet 'oops' in file broken.js"
        );
    }

    #[test]
    fn test_first_error_in_walk_order_wins() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for name in &["a", "b", "c", "d", "e", "f", "g", "h"] {
            write(
                src.path(),
                &format!("{}.js", name),
                &format!("// :snippet-start: {}\nx();\n", name),
            );
        }

        let extractor = Extractor::new(config(src.path(), out.path())).unwrap();
        for _ in 0..10 {
            assert_eq!(
                extractor.scan().unwrap_err().to_string(),
                "Missing end tag for snippet 'a' in file a.js"
            );
        }
    }

    #[test]
    fn test_extract_refuses_escaping_names() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        let out = work.path().join("out");
        write(
            &src,
            "evil.js",
            "// :snippet-start: ../../escaped\nx();\n// :snippet-end:\n",
        );

        let err = Extractor::new(config(&src, &out))
            .unwrap()
            .extract()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSnippetName { .. }));
        assert!(!work.path().join("escaped.snippet.txt").exists());
    }

    #[test]
    fn test_clear() {
        let out = TempDir::new().unwrap();
        let target = out.path().join("snippets");
        write(&target, "js/a.snippet.txt", "a();");
        assert!(clear(&target).unwrap());
        assert!(!target.exists());
        assert!(!clear(&target).unwrap());
    }
}
