//! Host build tool integration.
//!
//! The host drives the plugin through [`BuildPlugin`]: it reports the project
//! root once configuration is resolved, asks the plugin to resolve and load
//! module ids, and forwards file change notifications. The plugin answers
//! for exactly one module, [`VIRTUAL_MODULE_ID`].
//!
//! # Lifecycle
//!
//! ```text
//! new(options) ──► config_resolved(root) ──► resolve_id / load ◄──┐
//!                    (writes .d.ts)             │ rebuilds body   │
//!                                               ▼                 │
//!                                    handle_hot_update(path) ─────┘
//!                                      (marks stale, invalidates node)
//! ```
//!
//! Load always recomputes the module from disk; invalidation only flips the
//! stale flag and tells the host graph to drop its copy, so the next import
//! triggers a fresh load.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontmatter_collection::collection::CollectionConfig;
//! use frontmatter_collection::plugin::{BuildPlugin, FrontmatterCollectionPlugin, PluginOptions};
//! use frontmatter_collection::schema::{FieldSchema, ObjectSchema};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let options = PluginOptions::new(vec![
//!     CollectionConfig::new("posts", "content/posts/*.mdx")
//!         .schema(ObjectSchema::new().field("title", FieldSchema::string())),
//! ]);
//! let mut plugin = FrontmatterCollectionPlugin::new(options)?;
//! plugin.config_resolved(Path::new("/project"))?;
//!
//! let id = plugin.resolve_id("virtual:frontmatter-collection").unwrap();
//! let body = plugin.load(&id)?.unwrap();
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::collection::CollectionConfig;
use crate::constants::{
    DEFAULT_CONTENT_EXTENSIONS, DEFAULT_TYPES_PATH, PLUGIN_NAME, RESOLVED_VIRTUAL_MODULE_ID,
    VIRTUAL_MODULE_ID,
};
use crate::core::CollectionError;
use crate::declaration::DeclarationEmitter;
use crate::markdown::is_content_file;
use crate::module::ModuleAggregator;
use crate::utils::is_export_name;

/// The host's module graph, as far as invalidation needs it.
pub trait ModuleGraph {
    /// Whether the graph currently holds a module with this resolved id.
    fn has_module(&self, id: &str) -> bool;

    /// Drop the cached module so the host loads it again on next demand.
    fn invalidate_module(&mut self, id: &str);
}

/// Callbacks a host build tool invokes on a plugin.
pub trait BuildPlugin {
    /// Plugin name for host diagnostics.
    fn name(&self) -> &str;

    /// Called once the host configuration, including the project root, is known.
    fn config_resolved(&mut self, root: &Path) -> Result<()>;

    /// Map an import specifier to a resolved id, or decline with `None`.
    fn resolve_id(&self, id: &str) -> Option<String>;

    /// Produce the source for a resolved id, or decline with `Ok(None)`.
    fn load(&mut self, id: &str) -> Result<Option<String>>;

    /// React to a changed file. Returns whether the virtual module was invalidated.
    fn handle_hot_update(&mut self, file: &Path, graph: &mut dyn ModuleGraph) -> bool;
}

/// Plugin configuration.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// Collections in export order
    pub collections: Vec<CollectionConfig>,
    /// Declaration file path; relative paths are resolved against the root
    pub types_path: PathBuf,
    /// Whether to write the declaration file at all
    pub generate_dts: bool,
    /// Per-file diagnostics
    pub debug: bool,
    /// Extensions of content files whose changes invalidate the module
    pub extensions: Vec<String>,
}

impl PluginOptions {
    /// Options with defaults for everything but the collections.
    pub fn new(collections: Vec<CollectionConfig>) -> Self {
        Self {
            collections,
            types_path: PathBuf::from(DEFAULT_TYPES_PATH),
            generate_dts: true,
            debug: false,
            extensions: DEFAULT_CONTENT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Set the declaration file path.
    #[must_use]
    pub fn types_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.types_path = path.into();
        self
    }

    /// Enable or disable declaration output.
    #[must_use]
    pub fn generate_dts(mut self, enabled: bool) -> Self {
        self.generate_dts = enabled;
        self
    }

    /// Enable or disable per-file diagnostics.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Replace the content extensions.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Find a collection by name, e.g. to attach a parse function to a
    /// collection declared in a configuration file.
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut CollectionConfig> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    /// Check that collection names are unique, usable export names.
    ///
    /// # Errors
    ///
    /// [`CollectionError::InvalidCollectionName`] or
    /// [`CollectionError::DuplicateCollection`] for the first offending name.
    pub fn validate(&self) -> Result<(), CollectionError> {
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if !is_export_name(&collection.name) {
                return Err(CollectionError::InvalidCollectionName {
                    name: collection.name.clone(),
                });
            }
            if !seen.insert(collection.name.as_str()) {
                return Err(CollectionError::DuplicateCollection {
                    name: collection.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Per-instance state of the virtual module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualModuleState {
    body: Option<String>,
    stale: bool,
}

impl VirtualModuleState {
    /// Whether a content change arrived since the last load.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The body served by the last load, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    fn mark_stale(&mut self) {
        self.stale = true;
    }

    fn store(&mut self, body: String) {
        self.body = Some(body);
        self.stale = false;
    }
}

/// The plugin: owns the options, the project root and the module state.
#[derive(Debug)]
pub struct FrontmatterCollectionPlugin {
    options: PluginOptions,
    root: PathBuf,
    state: VirtualModuleState,
}

impl FrontmatterCollectionPlugin {
    /// Create the plugin. The root defaults to `.` until
    /// [`BuildPlugin::config_resolved`] provides the real one.
    ///
    /// # Errors
    ///
    /// Returns an error if collection names are invalid or duplicated.
    pub fn new(options: PluginOptions) -> Result<Self, CollectionError> {
        options.validate()?;
        Ok(Self {
            options,
            root: PathBuf::from("."),
            state: VirtualModuleState::default(),
        })
    }

    /// The configured options.
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The virtual module state.
    pub fn state(&self) -> &VirtualModuleState {
        &self.state
    }

    /// Absolute location of the declaration file.
    pub fn types_path(&self) -> PathBuf {
        if self.options.types_path.is_absolute() {
            self.options.types_path.clone()
        } else {
            self.root.join(&self.options.types_path)
        }
    }

    /// Write the declaration file unless disabled. Returns whether it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn emit_declarations(&self) -> Result<bool> {
        if !self.options.generate_dts {
            debug!("Declaration output disabled");
            return Ok(false);
        }
        DeclarationEmitter::emit(&self.options.collections, &self.types_path())
    }
}

impl BuildPlugin for FrontmatterCollectionPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn config_resolved(&mut self, root: &Path) -> Result<()> {
        self.root = root.to_path_buf();
        self.emit_declarations()?;
        Ok(())
    }

    fn resolve_id(&self, id: &str) -> Option<String> {
        (id == VIRTUAL_MODULE_ID).then(|| RESOLVED_VIRTUAL_MODULE_ID.to_string())
    }

    fn load(&mut self, id: &str) -> Result<Option<String>> {
        if id != RESOLVED_VIRTUAL_MODULE_ID {
            return Ok(None);
        }

        let body = ModuleAggregator::new(&self.root)
            .debug(self.options.debug)
            .aggregate(&self.options.collections)?;
        self.state.store(body.clone());
        Ok(Some(body))
    }

    fn handle_hot_update(&mut self, file: &Path, graph: &mut dyn ModuleGraph) -> bool {
        if !is_content_file(file, &self.options.extensions) {
            trace!("Ignoring change to {}", file.display());
            return false;
        }

        self.state.mark_stale();
        if graph.has_module(RESOLVED_VIRTUAL_MODULE_ID) {
            debug!("{} changed; invalidating {VIRTUAL_MODULE_ID}", file.display());
            graph.invalidate_module(RESOLVED_VIRTUAL_MODULE_ID);
            true
        } else {
            false
        }
    }
}
