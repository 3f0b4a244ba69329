//! Content file parsing.
//!
//! Content files are Markdown or MDX documents whose metadata sits in a
//! frontmatter block at the top of the file. [`frontmatter::FrontmatterParser`]
//! splits that block off and returns its attributes untyped.
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-01-01
//! ---
//!
//! # Hello
//! ```

pub mod frontmatter;

pub use frontmatter::{ExtractedFrontmatter, FrontmatterFormat, FrontmatterParser};

use std::path::Path;

/// Check whether a path has one of the given content extensions.
///
/// Comparison is case-insensitive and ignores a leading `.` in `extensions`.
pub fn is_content_file<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    extensions
        .iter()
        .any(|candidate| candidate.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}
