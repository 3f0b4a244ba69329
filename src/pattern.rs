//! Glob resolution of collection file sets.
//!
//! A collection's `include` pattern and its `ignore` patterns are resolved
//! against the project root into a concrete, ordered list of files.
//!
//! # Pattern Syntax
//!
//! Standard glob patterns, matched against paths relative to the root with `/`
//! separators on every platform:
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match a character set or range
//!
//! # Failure Semantics
//!
//! Resolution is inert: an invalid include pattern resolves to nothing and an
//! invalid ignore pattern is skipped, both with a warning. Only a missing root
//! directory is reported as an error.

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Normalize a pattern or path string to `/` separators and strip a leading `./`.
pub fn normalize_separators(value: &str) -> String {
    let normalized = value.replace('\\', "/");
    match normalized.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

/// A compiled glob pattern matched against root-relative paths.
///
/// # Examples
///
/// ```rust,no_run
/// use frontmatter_collection::pattern::PatternMatcher;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let matcher = PatternMatcher::new("content/*.mdx")?;
/// assert!(matcher.matches(Path::new("content/hello.mdx")));
/// assert!(!matcher.matches(Path::new("content/nested/deep.mdx")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
    base_dir: PathBuf,
}

impl PatternMatcher {
    /// Compile a glob pattern. Separators are normalized before compiling.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern contains invalid glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let normalized = normalize_separators(pattern_str);
        let pattern = Pattern::new(&normalized)
            .with_context(|| format!("Invalid glob pattern: {pattern_str}"))?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
            base_dir: literal_prefix(&normalized),
        })
    }

    /// The directory below which every match must live: the leading path
    /// components of the pattern that contain no glob syntax.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check a root-relative path against the pattern without touching the disk.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = normalize_separators(&path.to_string_lossy());
        self.pattern.matches_with(&path_str, MATCH_OPTIONS)
    }

    /// Walk the pattern's [`base_dir`](Self::base_dir) under `base_path` and
    /// return every regular file matching the pattern, relative to `base_path`.
    ///
    /// Nothing outside the base directory is visited. A missing base
    /// directory yields no matches. Symlinks are not followed; unreadable
    /// entries are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_path` cannot be canonicalized.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        debug!("Searching for pattern '{}' in {:?}", self.original_pattern, base_path);

        let base_path = base_path
            .canonicalize()
            .with_context(|| format!("Failed to canonicalize path: {base_path:?}"))?;

        let walk_root = base_path.join(&self.base_dir);
        if !walk_root.is_dir() {
            debug!("No directory {} for pattern '{}'", walk_root.display(), self.original_pattern);
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&walk_root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        "Skipping unreadable entry while resolving '{}': {e}",
                        self.original_pattern
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative_path) = entry.path().strip_prefix(&base_path) {
                trace!("Checking path: {}", relative_path.display());

                if self.matches(relative_path) {
                    matches.push(relative_path.to_path_buf());
                }
            }
        }

        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches)
    }

    /// The pattern string as given to [`PatternMatcher::new`].
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// Leading components of a normalized pattern free of glob syntax, excluding
/// the final component. `.` is dropped; `..` ends the prefix.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut components: Vec<&str> = pattern.split('/').collect();
    components.pop();

    components
        .into_iter()
        .filter(|component| !component.is_empty() && *component != ".")
        .take_while(|component| {
            *component != ".." && !component.contains(['*', '?', '[', ']', '{', '}'])
        })
        .collect()
}

/// Resolves an include pattern plus exclusions into a sorted file list.
///
/// # Examples
///
/// ```rust,no_run
/// use frontmatter_collection::pattern::PatternResolver;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let resolver = PatternResolver::with_ignore(["**/drafts/**"]);
/// let files = resolver.resolve("content/**/*.mdx", Path::new("/project"))?;
/// println!("{} content files", files.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternResolver {
    exclude_patterns: Vec<PatternMatcher>,
}

impl PatternResolver {
    /// Create a resolver with no exclusions.
    pub const fn new() -> Self {
        Self {
            exclude_patterns: Vec::new(),
        }
    }

    /// Create a resolver from a list of ignore patterns.
    ///
    /// Invalid patterns are skipped with a warning so one bad ignore entry
    /// does not hide the whole collection.
    pub fn with_ignore<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolver = Self::new();
        for pattern in patterns {
            if let Err(e) = resolver.exclude(pattern.as_ref()) {
                warn!("Skipping ignore pattern: {e:#}");
            }
        }
        resolver
    }

    /// Add an exclusion pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid glob syntax.
    pub fn exclude(&mut self, pattern: &str) -> Result<()> {
        let matcher = PatternMatcher::new(pattern)
            .with_context(|| format!("Invalid exclusion pattern: {pattern}"))?;
        self.exclude_patterns.push(matcher);
        Ok(())
    }

    /// Resolve `pattern` under `base_path`, apply exclusions and sort.
    ///
    /// An invalid include pattern yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_path` does not exist or cannot be accessed.
    pub fn resolve(&self, pattern: &str, base_path: &Path) -> Result<Vec<PathBuf>> {
        let matcher = match PatternMatcher::new(pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!("{e:#}; resolving to no files");
                return Ok(Vec::new());
            }
        };

        let mut matches = matcher.find_matches(base_path)?;

        if !self.exclude_patterns.is_empty() {
            matches.retain(|path| !self.exclude_patterns.iter().any(|ex| ex.matches(path)));
        }

        matches.sort();
        Ok(matches)
    }
}
