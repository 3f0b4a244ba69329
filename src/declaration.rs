//! Type declarations for the virtual module.
//!
//! Every collection with a schema contributes one line:
//!
//! ```text
//! // This file is generated by frontmatter-collection. Do not edit it by hand.
//!
//! declare module "virtual:frontmatter-collection" {
//!   export const posts: { date: string; title: string }[];
//! }
//! ```
//!
//! Collections that only have a parse function are left out; their types
//! have to be declared by hand. Rendering depends only on the schemas, so
//! the output is byte-identical across runs.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::collection::CollectionConfig;
use crate::constants::{GENERATED_HEADER, VIRTUAL_MODULE_ID};
use crate::utils::fs::write_if_changed;

/// Renders and writes the declaration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationEmitter;

impl DeclarationEmitter {
    /// Render the declaration file for `configs`.
    pub fn render(configs: &[CollectionConfig]) -> String {
        let exports: String = configs
            .iter()
            .filter_map(|config| {
                let schema = config.contract.schema.as_ref()?;
                let entry_type = array_item(&schema.type_declaration());
                Some(format!("  export const {}: {entry_type}[];\n", config.name))
            })
            .collect();

        format!("{GENERATED_HEADER}\n\ndeclare module \"{VIRTUAL_MODULE_ID}\" {{\n{exports}}}\n")
    }

    /// Write the declaration file to `output_path`.
    ///
    /// The file is only rewritten when its content changes. Returns whether
    /// it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn emit(configs: &[CollectionConfig], output_path: &Path) -> Result<bool> {
        let content = Self::render(configs);
        let written = write_if_changed(output_path, &content).with_context(|| {
            format!("Failed to write type declarations to {}", output_path.display())
        })?;

        if written {
            debug!("Wrote type declarations to {}", output_path.display());
        } else {
            debug!("Type declarations in {} are up to date", output_path.display());
        }
        Ok(written)
    }
}

/// Parenthesize union and intersection types so `[]` applies to the whole type.
fn array_item(entry_type: &str) -> String {
    if entry_type.contains('|') || entry_type.contains('&') {
        format!("({entry_type})")
    } else {
        entry_type.to_string()
    }
}
