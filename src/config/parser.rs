//! Generic TOML parsing with file path context.

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::CollectionError;

/// Parse a TOML configuration file into `T`.
///
/// Read failures carry the path as context. Syntax and shape errors become
/// [`CollectionError::ConfigParse`] so callers can show them without the
/// anyhow chain.
///
/// # Examples
///
/// ```rust,no_run
/// use frontmatter_collection::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Config {
///     name: String,
/// }
///
/// # fn example() -> anyhow::Result<()> {
/// let config: Config = parse_config(Path::new("settings.toml"))?;
/// println!("{}", config.name);
/// # Ok(())
/// # }
/// ```
///
/// # Arguments
///
/// * `path` - Path to the TOML file
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content).map_err(|e| CollectionError::ConfigParse {
        file: path.display().to_string(),
        reason: e.message().to_string(),
    })?;

    Ok(config)
}
