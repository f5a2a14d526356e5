//! Read access to snippets previously written by the extractor.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{Config, OutputStructure};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::layout::{self, SNIPPET_SUFFIX};

/// What a front end needs to render a language picker for one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    pub languages: Vec<String>,
    pub default_language: Option<String>,
    pub imports: BTreeMap<String, Vec<String>>,
}

/// Loads snippets from the output directory, caching each one after its first read.
pub struct SnippetStore {
    config: Config,
    cache: HashMap<(String, String), String>,
}

impl SnippetStore {
    pub fn new(config: Config) -> Self {
        SnippetStore {
            config,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the config. Cached snippets are dropped since they may live elsewhere now.
    pub fn update_config(&mut self, config: Config) {
        self.config = config;
        self.cache.clear();
    }

    /// Returns the content of snippet `name` for `language`, which may be a full language name
    /// (`python`) or an output directory name (`py`).
    pub fn get(&mut self, name: &str, language: &str) -> Result<&str> {
        let key = (name.to_string(), language.to_string());
        if !self.cache.contains_key(&key) {
            let content = self.load(name, language)?;
            self.cache.insert(key.clone(), content);
        }
        Ok(self.cache[&key].as_str())
    }

    fn load(&self, name: &str, language: &str) -> Result<String> {
        let not_found = || Error::SnippetNotFound {
            name: name.to_string(),
            language: language.to_string(),
        };
        let lang = Language::from_name(language).ok_or_else(not_found)?;
        let path = self.locate(name, lang).ok_or_else(not_found)?;
        debug!("loading snippet from {}", path.display());
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Path the snippet would have been written to. Under the `match` layout the source
    /// directory is unknown, so the output tree is searched for it.
    fn locate(&self, name: &str, language: Language) -> Option<PathBuf> {
        let base = self.config.versioned_output();
        let structure = self.config.output_directory_structure;
        if structure != OutputStructure::Match {
            return Some(base.join(layout::snippet_path(
                structure,
                language,
                name,
                Path::new(""),
            )));
        }
        let file_name = format!("{}{}", name, SNIPPET_SUFFIX);
        WalkDir::new(&base)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_str() == Some(file_name.as_str())
                    && e.path()
                        .parent()
                        .and_then(Path::file_name)
                        .and_then(|d| d.to_str())
                        == Some(language.dir_name())
            })
            .map(|e| e.into_path())
    }

    /// Languages and import lines to show next to a snippet.
    ///
    /// The answer comes from `supportedLanguages` and `defaultImports`; it is the same for every
    /// snippet name.
    pub fn display_info(&self, _name: &str) -> DisplayInfo {
        let languages = self.config.supported_languages.clone();
        let imports = languages
            .iter()
            .map(|lang| {
                let lines = self
                    .config
                    .default_imports
                    .get(lang)
                    .cloned()
                    .unwrap_or_default();
                (lang.clone(), lines)
            })
            .collect();
        DisplayInfo {
            default_language: languages.first().cloned(),
            languages,
            imports,
        }
    }
}

/// Optionally numbers the lines of `content` as `1 | first line`.
///
/// # Examples
///
/// ```
/// use shnippet_core::store::format_snippet;
///
/// assert_eq!(format_snippet("a\nb", true), "1 | a\n2 | b");
/// assert_eq!(format_snippet("a\nb", false), "a\nb");
/// ```
pub fn format_snippet(content: &str, show_line_numbers: bool) -> String {
    if !show_line_numbers {
        return content.to_string();
    }
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
