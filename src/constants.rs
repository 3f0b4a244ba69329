//! Constants shared across the crate.
//!
//! The virtual module identity is fixed for the lifetime of a plugin
//! instance, so its public and resolved ids live here rather than on the
//! plugin options.

/// Name reported to the host build tool.
pub const PLUGIN_NAME: &str = "frontmatter-collection";

/// The identifier user code imports.
pub const VIRTUAL_MODULE_ID: &str = "virtual:frontmatter-collection";

/// The internal id the host sees after resolution.
///
/// The NUL prefix keeps other plugins (and the filesystem loader) from
/// treating it as a real path.
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:frontmatter-collection";

/// Default declaration output, relative to the project root.
pub const DEFAULT_TYPES_PATH: &str = "frontmatter-collection.d.ts";

/// Default configuration file name, relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = "frontmatter-collection.toml";

/// Content file extensions whose changes invalidate the virtual module.
pub const DEFAULT_CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Key injected into every raw frontmatter map.
pub const FILE_PATH_KEY: &str = "filePath";

/// Header written at the top of every generated declaration file.
pub const GENERATED_HEADER: &str =
    "// This file is generated by frontmatter-collection. Do not edit it by hand.";
