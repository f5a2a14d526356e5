//! Where each snippet lands under the output directory.

use std::path::{Path, PathBuf};

use crate::config::OutputStructure;
use crate::language::Language;

pub const SNIPPET_SUFFIX: &str = ".snippet.txt";

/// Path of a snippet file relative to the versioned output directory.
///
/// `source_dir` is the directory of the snippet's source file relative to the scanned root; only
/// [`OutputStructure::Match`] uses it.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shnippet_core::config::OutputStructure;
/// use shnippet_core::language::Language;
/// use shnippet_core::layout::snippet_path;
///
/// let p = snippet_path(OutputStructure::ByLanguage, Language::Python, "add", Path::new("math"));
/// assert_eq!(p, Path::new("py").join("add.snippet.txt"));
/// ```
pub fn snippet_path(
    structure: OutputStructure,
    language: Language,
    name: &str,
    source_dir: &Path,
) -> PathBuf {
    let lang = language.dir_name();
    match structure {
        OutputStructure::ByLanguage => Path::new(lang).join(format!("{}{}", name, SNIPPET_SUFFIX)),
        OutputStructure::Flat => PathBuf::from(format!("{}.{}{}", name, lang, SNIPPET_SUFFIX)),
        OutputStructure::Match => source_dir
            .join(lang)
            .join(format!("{}{}", name, SNIPPET_SUFFIX)),
        OutputStructure::Organized => Path::new(name).join(format!("{}{}", lang, SNIPPET_SUFFIX)),
    }
}
