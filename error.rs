//! Errors raised while configuring, extracting, or reading snippets.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required config field is empty. The message names the field.
    #[error("{0}")]
    InvalidConfig(&'static str),

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Invalid output directory structure: '{0}'. Valid options are: flat, match, organized, byLanguage"
    )]
    InvalidStructure(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Missing snippet name in file {file}")]
    MissingSnippetName { file: String },

    #[error("Invalid snippet name '{name}' in file {file}")]
    InvalidSnippetName { name: String, file: String },

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing end tag for snippet '{name}' in file {file}")]
    MissingEndTag { name: String, file: String },

    #[error("Failed to fetch snippet: {name} for language: {language}")]
    SnippetNotFound { name: String, language: String },
}

impl Error {
    /// Wraps an I/O error with the path it was raised for.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
