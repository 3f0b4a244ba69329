//! Declarative plugin configuration.
//!
//! Collections that need only a schema, a field sort and a field filter can
//! be declared in `frontmatter-collection.toml` at the project root instead of
//! in code:
//!
//! ```toml
//! types_path = "src/collections.d.ts"
//! extensions = ["md", "mdx"]
//!
//! [[collections]]
//! name = "posts"
//! include = "content/posts/**/*.mdx"
//! ignore = ["**/drafts/**"]
//! sort = { field = "date", order = "desc" }
//! filter = { field = "draft", not_equals = true }
//!
//! [collections.schema]
//! title = "string"
//! date = "date"
//! draft = "boolean?"
//! tags = "string[]?"
//! ```
//!
//! Parse functions cannot be expressed in TOML; attach them after loading
//! with [`PluginOptions::collection_mut`].

mod parser;

pub use parser::parse_config;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::collection::CollectionConfig;
use crate::collection::sort::{SortOrder, by_field, field_matches};
use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_CONTENT_EXTENSIONS, DEFAULT_TYPES_PATH};
use crate::core::CollectionError;
use crate::plugin::PluginOptions;
use crate::schema::ObjectSchema;

/// Top-level shape of `frontmatter-collection.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Declaration file path, relative to the project root
    #[serde(default = "default_types_path")]
    pub types_path: PathBuf,
    /// Whether to write the declaration file
    #[serde(default = "default_true")]
    pub generate_dts: bool,
    /// Per-file diagnostics
    #[serde(default)]
    pub debug: bool,
    /// Content extensions that trigger invalidation
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Collections in export order
    #[serde(default)]
    pub collections: Vec<CollectionManifest>,
}

/// One `[[collections]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionManifest {
    /// Export name in the virtual module
    pub name: String,
    /// Glob selecting content files, relative to the project root
    pub include: String,
    /// Globs removing files from the selection
    #[serde(default)]
    pub ignore: Patterns,
    /// Declarative schema; collections without one need a parse function
    /// attached in code before they compile
    #[serde(default)]
    pub schema: Option<ObjectSchema>,
    /// Keep undeclared keys in validated entries; requires `schema`
    #[serde(default)]
    pub passthrough: bool,
    /// Order entries by one field
    #[serde(default)]
    pub sort: Option<SortSpec>,
    /// Keep only entries whose field matches
    #[serde(default)]
    pub filter: Option<FilterSpec>,
}

/// A single pattern or a list of patterns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    /// `ignore = "**/drafts/**"`
    One(String),
    /// `ignore = ["**/drafts/**", "**/_*"]`
    Many(Vec<String>),
}

impl Default for Patterns {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Patterns {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }
}

/// `sort = { field = "date", order = "desc" }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    /// Dotted field path, e.g. `date` or `author.name`
    pub field: String,
    /// `asc` (default) or `desc`
    #[serde(default)]
    pub order: SortOrder,
}

/// `filter = { field = "draft", not_equals = true }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Dotted field path
    pub field: String,
    /// Keep entries whose field equals this value
    #[serde(default)]
    pub equals: Option<Value>,
    /// Keep entries whose field is missing or differs from this value
    #[serde(default)]
    pub not_equals: Option<Value>,
}

fn default_types_path() -> PathBuf {
    PathBuf::from(DEFAULT_TYPES_PATH)
}

const fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    DEFAULT_CONTENT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

impl CollectionManifest {
    /// Build the runtime collection.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidSchema`] if `passthrough` is set
    /// without a `schema` table.
    pub fn into_config(self) -> Result<CollectionConfig, CollectionError> {
        if self.passthrough && self.schema.is_none() {
            return Err(CollectionError::InvalidSchema {
                field: self.name,
                reason: "`passthrough` needs a `schema` table".to_string(),
            });
        }

        let mut config = CollectionConfig::new(self.name, self.include);
        for pattern in self.ignore.into_vec() {
            config = config.ignore(pattern);
        }
        if let Some(schema) = self.schema {
            let schema = if self.passthrough { schema.passthrough() } else { schema };
            config = config.schema(schema);
        }
        if let Some(sort) = self.sort {
            config = config.sort(by_field(sort.field, sort.order));
        }
        if let Some(filter) = self.filter {
            config = config.filter(field_matches(filter.field, filter.equals, filter.not_equals));
        }
        Ok(config)
    }
}

impl PluginManifest {
    /// Build plugin options.
    ///
    /// # Errors
    ///
    /// Returns the first collection that cannot be built; see
    /// [`CollectionManifest::into_config`].
    pub fn into_options(self) -> Result<PluginOptions, CollectionError> {
        let collections = self
            .collections
            .into_iter()
            .map(CollectionManifest::into_config)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PluginOptions::new(collections)
            .types_path(self.types_path)
            .generate_dts(self.generate_dts)
            .debug(self.debug)
            .extensions(self.extensions))
    }
}

/// Load `frontmatter-collection.toml` from `root`.
///
/// # Arguments
///
/// * `root` - Project root containing the configuration file
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed, if a
/// collection cannot be built, or if collection names are invalid.
pub fn load_options(root: &Path) -> Result<PluginOptions> {
    let path = root.join(DEFAULT_CONFIG_FILE);
    let manifest: PluginManifest = parse_config(&path)?;
    debug!("Loaded {} collections from {}", manifest.collections.len(), path.display());

    let options = manifest.into_options()?;
    options.validate()?;
    Ok(options)
}
