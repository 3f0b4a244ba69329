//! Collection declarations and their compilation.
//!
//! A collection is a named set of content files selected by a glob, each
//! turned into one entry by the collection's [`Contract`]. Compilation
//! ([`compiler::CollectionCompiler`]) reads every matching file, runs the
//! contract ([`entry::EntryProcessor`]), then filters and sorts the results.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontmatter_collection::collection::{CollectionConfig, sort::{by_field, SortOrder}};
//! use frontmatter_collection::schema::{FieldSchema, ObjectSchema};
//!
//! let posts = CollectionConfig::new("posts", "content/posts/**/*.mdx")
//!     .ignore("**/drafts/**")
//!     .schema(
//!         ObjectSchema::new()
//!             .field("title", FieldSchema::string())
//!             .field("date", FieldSchema::date()),
//!     )
//!     .sort(by_field("date", SortOrder::Descending))
//!     .filter(|entry| entry["title"] != "Untitled");
//! ```

pub mod compiler;
pub mod entry;
pub mod sort;

pub use compiler::{CollectionCompiler, CompileReport, CompiledCollection};
pub use entry::{EntryProcessor, FailureStage, ParseFailure, RawFrontmatter};

use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::core::CollectionError;
use crate::schema::Schema;

/// Hand-written transform from raw frontmatter to an entry.
pub type ParseFn = Arc<dyn Fn(&RawFrontmatter) -> anyhow::Result<Value> + Send + Sync>;

/// Three-way comparison of two entries.
pub type SortFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Predicate deciding whether an entry is kept.
pub type FilterFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How raw frontmatter becomes an entry.
///
/// At least one half must be present. With both, the parse function runs
/// first and the schema validates its output. Only the schema contributes to
/// the declaration file.
#[derive(Clone, Default)]
pub struct Contract {
    /// Validation and type description
    pub schema: Option<Arc<dyn Schema>>,
    /// Hand-written transform
    pub parse_front_matter: Option<ParseFn>,
}

impl Contract {
    /// Whether neither a schema nor a parse function is set.
    pub fn is_empty(&self) -> bool {
        self.schema.is_none() && self.parse_front_matter.is_none()
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("schema", &self.schema)
            .field("parse_front_matter", &self.parse_front_matter.is_some())
            .finish()
    }
}

/// Declaration of one collection.
#[derive(Clone)]
pub struct CollectionConfig {
    /// Export name in the virtual module
    pub name: String,
    /// Glob selecting content files, relative to the project root
    pub include: String,
    /// Globs removing files from the selection
    pub ignore: Vec<String>,
    /// Validation/transform contract
    pub contract: Contract,
    /// Ordering applied after filtering
    pub sort: Option<SortFn>,
    /// Predicate applied after every file is processed
    pub filter: Option<FilterFn>,
}

impl CollectionConfig {
    /// Create a collection with no contract, ordering or filter.
    pub fn new(name: impl Into<String>, include: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include: include.into(),
            ignore: Vec::new(),
            contract: Contract::default(),
            sort: None,
            filter: None,
        }
    }

    /// Add an ignore pattern.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    /// Set the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Schema + 'static) -> Self {
        self.contract.schema = Some(Arc::new(schema));
        self
    }

    /// Set the schema from a shared handle.
    #[must_use]
    pub fn shared_schema(mut self, schema: Arc<dyn Schema>) -> Self {
        self.contract.schema = Some(schema);
        self
    }

    /// Set the hand-written parse function.
    #[must_use]
    pub fn parse_front_matter<F>(mut self, parse: F) -> Self
    where
        F: Fn(&RawFrontmatter) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.contract.parse_front_matter = Some(Arc::new(parse));
        self
    }

    /// Set the comparator.
    #[must_use]
    pub fn sort<F>(mut self, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(compare));
        self
    }

    /// Set the filter predicate.
    #[must_use]
    pub fn filter<F>(mut self, keep: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(keep));
        self
    }

    /// Check that the collection can be compiled at all.
    ///
    /// # Errors
    ///
    /// [`CollectionError::MissingContract`] if neither a schema nor a parse
    /// function is set.
    pub fn validate(&self) -> Result<(), CollectionError> {
        if self.contract.is_empty() {
            return Err(CollectionError::MissingContract {
                collection: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for CollectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("name", &self.name)
            .field("include", &self.include)
            .field("ignore", &self.ignore)
            .field("contract", &self.contract)
            .field("sort", &self.sort.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ObjectSchema;

    #[test]
    fn test_validate_requires_contract() {
        let config = CollectionConfig::new("posts", "*.mdx");
        assert_eq!(
            config.validate(),
            Err(CollectionError::MissingContract {
                collection: "posts".to_string()
            })
        );

        assert!(config.clone().schema(ObjectSchema::new()).validate().is_ok());
        assert!(
            config
                .parse_front_matter(|raw| Ok(raw.to_value()))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_debug_hides_closures() {
        let config = CollectionConfig::new("posts", "*.mdx")
            .ignore("drafts/**")
            .filter(|_| true);
        let debug = format!("{config:?}");
        assert!(debug.contains("posts"));
        assert!(debug.contains("filter: true"));
        assert!(debug.contains("sort: false"));
    }
}
