//! Integration test suite for frontmatter-collection
//!
//! End-to-end tests driving the plugin the way a host build tool does:
//! configure, resolve, load, change files, invalidate, load again.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **plugin_flow**: resolve/load/hot-update cycle and declaration output
//! - **collections**: ordering, filtering, partial failures and determinism
//! - **config_file**: collections declared in `frontmatter-collection.toml`

mod collections;
mod config_file;
mod plugin_flow;

use frontmatter_collection::constants::RESOLVED_VIRTUAL_MODULE_ID;
use frontmatter_collection::plugin::ModuleGraph;
use std::collections::HashSet;

/// Minimal host module graph recording invalidations.
#[derive(Debug, Default)]
pub struct HostGraph {
    modules: HashSet<String>,
    pub invalidations: Vec<String>,
}

impl HostGraph {
    /// A graph that has already imported the virtual module.
    pub fn with_virtual_module() -> Self {
        let mut graph = Self::default();
        graph.modules.insert(RESOLVED_VIRTUAL_MODULE_ID.to_string());
        graph
    }
}

impl ModuleGraph for HostGraph {
    fn has_module(&self, id: &str) -> bool {
        self.modules.contains(id)
    }

    fn invalidate_module(&mut self, id: &str) {
        self.invalidations.push(id.to_string());
    }
}
