//! Extraction settings, loaded from a JSON file.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Marker strings delimiting snippet and prepend regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnippetTags {
    pub start: String,
    pub end: String,
    pub prepend_start: String,
    pub prepend_end: String,
}

impl Default for SnippetTags {
    fn default() -> Self {
        SnippetTags {
            start: ":snippet-start:".to_string(),
            end: ":snippet-end:".to_string(),
            prepend_start: ":prepend-start:".to_string(),
            prepend_end: ":prepend-end:".to_string(),
        }
    }
}

/// How extracted snippets are laid out under the output directory.
///
/// See [`crate::layout::snippet_path`] for the exact paths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputStructure {
    Flat,
    Match,
    Organized,
    ByLanguage,
}

impl Default for OutputStructure {
    fn default() -> Self {
        OutputStructure::ByLanguage
    }
}

impl FromStr for OutputStructure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flat" => Ok(OutputStructure::Flat),
            "match" => Ok(OutputStructure::Match),
            "organized" => Ok(OutputStructure::Organized),
            "byLanguage" => Ok(OutputStructure::ByLanguage),
            other => Err(Error::InvalidStructure(other.to_string())),
        }
    }
}

impl Display for OutputStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputStructure::Flat => "flat",
            OutputStructure::Match => "match",
            OutputStructure::Organized => "organized",
            OutputStructure::ByLanguage => "byLanguage",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory scanned for tagged sources.
    pub root_directory: PathBuf,
    /// Directory snippets are written to.
    pub snippet_output_directory: PathBuf,
    /// Extensions, with leading dot, of files to scan.
    pub file_extensions: Vec<String>,
    /// File and directory names skipped during the walk.
    pub exclude: Vec<String>,
    pub snippet_tags: SnippetTags,
    pub output_directory_structure: OutputStructure,
    /// Optional path segment inserted between the output directory and the layout.
    pub version: Option<String>,
    /// Base for relative directories. Defaults to the config file's directory.
    pub project_root: Option<PathBuf>,
    /// Languages offered by [`crate::store::SnippetStore::display_info`].
    pub supported_languages: Vec<String>,
    /// Import lines shown alongside snippets, keyed by language.
    pub default_imports: HashMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        let mut default_imports = HashMap::new();
        default_imports.insert(
            "python".to_string(),
            vec!["from typing import Any".to_string()],
        );
        default_imports.insert(
            "kotlin".to_string(),
            vec!["import java.util.*".to_string()],
        );
        Config {
            root_directory: PathBuf::new(),
            snippet_output_directory: PathBuf::new(),
            file_extensions: Vec::new(),
            exclude: Vec::new(),
            snippet_tags: SnippetTags::default(),
            output_directory_structure: OutputStructure::default(),
            version: None,
            project_root: None,
            supported_languages: vec!["python".to_string(), "kotlin".to_string()],
            default_imports,
        }
    }
}

impl Config {
    /// Reads a config file and resolves its relative directories.
    ///
    /// Relative paths are taken against `projectRoot` when set, and otherwise against the
    /// directory holding the config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: Config = serde_json::from_str(&text).map_err(|source| {
            Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(PathBuf::new);
        config.resolve_paths(&base);
        Ok(config)
    }

    /// Joins relative `root_directory` and `snippet_output_directory` onto the project root.
    /// Empty paths stay empty so that [`Config::validate`] still rejects them.
    pub fn resolve_paths(&mut self, config_dir: &Path) {
        let base = match &self.project_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
        for dir in [&mut self.root_directory, &mut self.snippet_output_directory] {
            if !dir.as_os_str().is_empty() && dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self.project_root = Some(base);
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_directory.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("rootDirectory is required"));
        }
        if self.snippet_output_directory.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("snippetOutputDirectory is required"));
        }
        if self.file_extensions.is_empty() {
            return Err(Error::InvalidConfig("fileExtensions must not be empty"));
        }
        if self.snippet_tags.start.is_empty() || self.snippet_tags.end.is_empty() {
            return Err(Error::InvalidConfig(
                "snippetTags must include start and end tags",
            ));
        }
        Ok(())
    }

    /// The output directory with the version segment, if any, applied.
    pub fn versioned_output(&self) -> PathBuf {
        match &self.version {
            Some(v) => self.snippet_output_directory.join(v),
            None => self.snippet_output_directory.clone(),
        }
    }
}
