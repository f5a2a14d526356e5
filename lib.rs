//! Extract tagged code regions from tested sources into documentation snippets.
//!
//! Sources mark regions with `:snippet-start: <name>` and `:snippet-end:` comment lines. The
//! [`extractor::Extractor`] walks a source tree, pulls every region out, and writes it to
//! `<output>/<version>/<lang>/<name>.snippet.txt`, where docs can pick it up. The arithmetic
//! helpers below are the examples the integration tests mark up.

pub mod config;
pub mod error;
pub mod extractor;
pub mod language;
pub mod layout;
pub mod parse;
pub mod store;
pub mod typegen;

/// Adds two integers together and returns the result.
///
/// Overflow behaves like `+` on `i32`: a panic in debug builds, wrapping in release builds.
///
/// # Examples
///
/// ```
/// assert_eq!(shnippet_core::add(20, 22), 42);
/// ```
pub fn add(x: i32, y: i32) -> i32 {
    x + y
}

/// Subtracts `y` from `x` and returns the result.
///
/// Overflow behaves like `-` on `i32`: a panic in debug builds, wrapping in release builds.
///
/// # Examples
///
/// ```
/// assert_eq!(shnippet_core::subtract(50, 8), 42);
/// ```
pub fn subtract(x: i32, y: i32) -> i32 {
    x - y
}
