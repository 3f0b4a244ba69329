//! Virtual module body generation.
//!
//! Every configured collection becomes one statement:
//!
//! ```text
//! export const posts = [{"date":"2024-02-01","title":"B"},{"date":"2024-01-01","title":"A"}];
//! ```
//!
//! Statements appear in configuration order. The body is rebuilt from disk on
//! every call; nothing is memoized between calls.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

use crate::collection::{CollectionCompiler, CollectionConfig, CompiledCollection};

/// Compiles every collection and serializes them into one module body.
#[derive(Debug)]
pub struct ModuleAggregator {
    compiler: CollectionCompiler,
}

impl ModuleAggregator {
    /// Create an aggregator resolving globs under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            compiler: CollectionCompiler::new(root),
        }
    }

    /// Enable per-file diagnostics.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.compiler = self.compiler.debug(debug);
        self
    }

    /// Compile every collection in order.
    ///
    /// Every contract is checked before any file is read, so one collection
    /// without a contract fails the whole module.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; per-file failures are in each report.
    pub fn compile_all(&self, configs: &[CollectionConfig]) -> Result<Vec<CompiledCollection>> {
        for config in configs {
            config.validate()?;
        }

        configs
            .iter()
            .map(|config| {
                self.compiler
                    .compile(config)
                    .with_context(|| format!("Failed to compile collection '{}'", config.name))
            })
            .collect()
    }

    /// Compile every collection and render the module body.
    ///
    /// # Errors
    ///
    /// See [`ModuleAggregator::compile_all`].
    pub fn aggregate(&self, configs: &[CollectionConfig]) -> Result<String> {
        let collections = self.compile_all(configs)?;
        let body = render_module(&collections)?;
        debug!("Rendered virtual module with {} collections ({} bytes)", collections.len(), body.len());
        Ok(body)
    }
}

/// Serialize compiled collections into `export const` statements.
pub fn render_module(collections: &[CompiledCollection]) -> Result<String> {
    let mut body = String::new();
    for collection in collections {
        let json = serde_json::to_string(&collection.entries)
            .with_context(|| format!("Failed to serialize collection '{}'", collection.name))?;
        writeln!(body, "export const {} = {json};", collection.name)?;
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CompileReport;
    use crate::core::CollectionError;
    use crate::schema::{FieldSchema, ObjectSchema};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_module_in_order() {
        let collections = vec![
            CompiledCollection {
                name: "posts".to_string(),
                entries: vec![json!({"title": "A"})],
                report: CompileReport::default(),
            },
            CompiledCollection {
                name: "empty".to_string(),
                entries: vec![],
                report: CompileReport::default(),
            },
        ];

        assert_eq!(
            render_module(&collections).unwrap(),
            "export const posts = [{\"title\":\"A\"}];\nexport const empty = [];\n"
        );
    }

    #[test]
    fn test_aggregate_reads_disk_every_time() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("notes")).unwrap();
        fs::write(temp_dir.path().join("notes/a.md"), "---\ntitle: First\n---\n").unwrap();

        let configs = vec![
            CollectionConfig::new("notes", "notes/*.md")
                .schema(ObjectSchema::new().field("title", FieldSchema::string())),
        ];
        let aggregator = ModuleAggregator::new(temp_dir.path());

        let first = aggregator.aggregate(&configs).unwrap();
        assert_eq!(first, "export const notes = [{\"title\":\"First\"}];\n");

        fs::write(temp_dir.path().join("notes/a.md"), "---\ntitle: Second\n---\n").unwrap();
        let second = aggregator.aggregate(&configs).unwrap();
        assert_eq!(second, "export const notes = [{\"title\":\"Second\"}];\n");
    }

    #[test]
    fn test_missing_contract_fails_whole_module_before_reading() {
        let temp_dir = TempDir::new().unwrap();
        let configs = vec![
            CollectionConfig::new("good", "does-not-matter/*.md")
                .parse_front_matter(|_| panic!("no file should be processed")),
            CollectionConfig::new("bad", "*.md"),
        ];
        fs::create_dir_all(temp_dir.path().join("does-not-matter")).unwrap();
        fs::write(temp_dir.path().join("does-not-matter/x.md"), "---\na: 1\n---\n").unwrap();

        let err = ModuleAggregator::new(temp_dir.path()).aggregate(&configs).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CollectionError>(),
            Some(&CollectionError::MissingContract {
                collection: "bad".to_string()
            })
        );
    }
}
