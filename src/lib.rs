//! frontmatter-collection - typed content collections for build tools
//!
//! Compiles the frontmatter of Markdown/MDX files into a virtual module that
//! application code imports like any other module:
//!
//! ```text
//! import { posts } from "virtual:frontmatter-collection";
//! ```
//!
//! Each collection is a glob plus a contract: a schema that validates the
//! frontmatter, a parse function that transforms it, or both. Files that fail
//! the contract are reported and left out; the rest are filtered, sorted and
//! serialized as one `export const` per collection. A `.d.ts` file describing
//! every schema-backed collection is written next to the project so the
//! import is typed.
//!
//! # Architecture Overview
//!
//! ```text
//!  include/ignore globs
//!          │
//!          ▼
//!  pattern::PatternResolver ──► markdown::FrontmatterParser ──► collection::EntryProcessor
//!   (sorted file set)            (YAML/TOML attributes)          (parse fn, then schema)
//!                                                                        │
//!                          module::ModuleAggregator ◄── collection::CollectionCompiler
//!                          (export const ... = [...])    (filter, stable sort, report)
//!                                   │
//!                                   ▼
//!            plugin::FrontmatterCollectionPlugin ──► declaration::DeclarationEmitter
//!             (resolve/load/hot update)               (frontmatter-collection.d.ts)
//! ```
//!
//! # Core Modules
//!
//! - [`plugin`] - Host integration: virtual module resolution, loading and invalidation
//! - [`collection`] - Collection declarations, per-file processing and compilation
//! - [`schema`] - The [`schema::Schema`] trait and the declarative [`schema::ObjectSchema`]
//! - [`module`] - Virtual module body generation
//! - [`declaration`] - TypeScript declaration output
//! - [`config`] - `frontmatter-collection.toml` loading
//!
//! ## Supporting Modules
//! - [`pattern`] - Glob resolution with exclusions
//! - [`markdown`] - Frontmatter extraction
//! - [`core`] - Error types and user-facing error context
//! - [`utils`] - Identifier checks, path normalization and file writes
//! - [`constants`] - Shared names and defaults
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use frontmatter_collection::collection::CollectionConfig;
//! use frontmatter_collection::collection::sort::{SortOrder, by_field};
//! use frontmatter_collection::plugin::{BuildPlugin, FrontmatterCollectionPlugin, PluginOptions};
//! use frontmatter_collection::schema::{FieldSchema, ObjectSchema};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let posts = CollectionConfig::new("posts", "content/posts/**/*.mdx")
//!     .schema(
//!         ObjectSchema::new()
//!             .field("title", FieldSchema::string())
//!             .field("date", FieldSchema::date()),
//!     )
//!     .sort(by_field("date", SortOrder::Descending));
//!
//! let mut plugin = FrontmatterCollectionPlugin::new(PluginOptions::new(vec![posts]))?;
//! plugin.config_resolved(Path::new("."))?;
//!
//! if let Some(id) = plugin.resolve_id("virtual:frontmatter-collection") {
//!     let body = plugin.load(&id)?;
//!     println!("{}", body.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and installs no subscriber. Per-file
//! failures are `warn!`; with [`plugin::PluginOptions::debug`] set, raw
//! frontmatter and per-collection counts are logged at `info!` under the
//! `frontmatter_collection::debug` target.

// Host integration
pub mod plugin;

// Collections and their compilation
pub mod collection;
pub mod declaration;
pub mod module;
pub mod schema;

// Configuration
pub mod config;
pub mod constants;

// Supporting modules
pub mod core;
pub mod markdown;
pub mod pattern;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use collection::{CollectionConfig, Contract};
pub use core::CollectionError;
pub use plugin::{BuildPlugin, FrontmatterCollectionPlugin, ModuleGraph, PluginOptions};
pub use schema::{ObjectSchema, Schema};
