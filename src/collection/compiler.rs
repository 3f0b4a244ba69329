//! Compilation of one collection.
//!
//! # Algorithm
//!
//! 1. Reject a collection with no contract before touching the disk
//! 2. Resolve `include` minus `ignore` under the project root
//! 3. For each file in resolver order: read, extract frontmatter, inject
//!    `filePath`, run the contract; failures are recorded, not raised
//! 4. Apply the filter once every file has been processed
//! 5. Apply the comparator with a stable sort
//! 6. Report how many entries were kept out of how many files matched
//!
//! The resolver sorts paths, so without a comparator the output follows file
//! path order and repeated compiles of an unchanged tree are identical.

use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::CollectionConfig;
use super::entry::{EntryProcessor, FailureStage, ParseFailure, RawFrontmatter};
use crate::markdown::FrontmatterParser;
use crate::pattern::PatternResolver;
use crate::utils::{fs::read_text_file, to_slash_path};

/// Counts and per-file failures from one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Files selected by the glob
    pub matched: usize,
    /// Entries in the final output
    pub retained: usize,
    /// Files dropped because they failed to read, parse or validate
    pub failures: Vec<ParseFailure>,
}

impl CompileReport {
    /// Whether every matched file produced an entry (before filtering).
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The ordered entries of one collection plus its report.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCollection {
    /// Export name
    pub name: String,
    /// Entries after filter and sort
    pub entries: Vec<Value>,
    /// Diagnostics
    pub report: CompileReport,
}

/// Compiles collections relative to a project root.
#[derive(Debug, Default)]
pub struct CollectionCompiler {
    root: PathBuf,
    parser: FrontmatterParser,
    debug: bool,
}

impl CollectionCompiler {
    /// Create a compiler resolving globs under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            parser: FrontmatterParser::new(),
            debug: false,
        }
    }

    /// Enable per-file diagnostics.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The project root globs are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compile one collection.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingContract`](crate::core::CollectionError)
    /// if the collection has no contract, or an error if the project root
    /// cannot be walked. Per-file problems never produce an error; they are
    /// listed in [`CompiledCollection::report`].
    pub fn compile(&self, config: &CollectionConfig) -> Result<CompiledCollection> {
        config.validate()?;

        let resolver = PatternResolver::with_ignore(&config.ignore);
        let files = resolver.resolve(&config.include, &self.root)?;
        debug!("Collection '{}': {} files match '{}'", config.name, files.len(), config.include);

        let processor = EntryProcessor::new(&config.contract).debug(self.debug);
        let mut entries = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for relative in &files {
            match self.process_file(&processor, relative) {
                Ok(entry) => entries.push(entry),
                Err(failure) => {
                    warn!("Collection '{}': skipping {failure}", config.name);
                    failures.push(failure);
                }
            }
        }

        if let Some(keep) = &config.filter {
            entries.retain(|entry| keep(entry));
        }

        if let Some(compare) = &config.sort {
            entries.sort_by(|a, b| compare(a, b));
        }

        let report = CompileReport {
            matched: files.len(),
            retained: entries.len(),
            failures,
        };

        if self.debug {
            info!(
                target: "frontmatter_collection::debug",
                "Collection '{}': {} of {} files retained",
                config.name,
                report.retained,
                report.matched
            );
        } else {
            debug!(
                "Collection '{}': {} of {} files retained",
                config.name, report.retained, report.matched
            );
        }

        Ok(CompiledCollection {
            name: config.name.clone(),
            entries,
            report,
        })
    }

    fn process_file(
        &self,
        processor: &EntryProcessor<'_>,
        relative: &Path,
    ) -> Result<Value, ParseFailure> {
        let file_path = to_slash_path(relative);

        let text = read_text_file(&self.root.join(relative))
            .map_err(|e| ParseFailure::new(&file_path, FailureStage::Read, format!("{e:#}")))?;

        let extracted = self
            .parser
            .extract(&text)
            .map_err(|e| ParseFailure::new(&file_path, FailureStage::Extract, format!("{e:#}")))?;

        let raw = RawFrontmatter::new(file_path, extracted.attributes);
        processor.process(&raw)
    }
}
