//! Frontmatter extraction into an untyped attribute map.
//!
//! Two delimiters are recognized at the very top of a file:
//!
//! - `---` for YAML frontmatter (split with a raw `gray_matter` engine, parsed
//!   with `serde_yaml`)
//! - `+++` for TOML frontmatter (parsed with `toml`)
//!
//! Attributes come back as a `serde_json` map so every later stage works on a
//! single value model. Nothing here checks attribute types; that is the
//! collection contract's job.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontmatter_collection::markdown::frontmatter::FrontmatterParser;
//!
//! let parser = FrontmatterParser::new();
//! let extracted = parser.extract("---\ntitle: Hello\n---\n# Body\n").unwrap();
//! assert_eq!(extracted.attributes["title"], "Hello");
//! assert_eq!(extracted.body.trim(), "# Body");
//! ```

use anyhow::{Context, Result, bail};
use gray_matter::{Matter, Pod, engine::Engine};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Custom gray_matter engine that returns raw frontmatter text without parsing.
///
/// Parsing is done afterwards with `serde_yaml` so YAML errors carry the
/// parser's own line and column.
struct RawFrontmatter;

impl Engine for RawFrontmatter {
    fn parse(content: &str) -> Result<Pod, gray_matter::Error> {
        Ok(Pod::String(content.to_string()))
    }
}

/// Frontmatter syntax found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// `---` delimited YAML
    Yaml,
    /// `+++` delimited TOML
    Toml,
}

/// Result of splitting and parsing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFrontmatter {
    /// Parsed attributes; empty when the file has no frontmatter.
    pub attributes: Map<String, Value>,

    /// The content with frontmatter removed.
    pub body: String,

    /// Which syntax the frontmatter used, if any was present.
    pub format: Option<FrontmatterFormat>,
}

impl ExtractedFrontmatter {
    /// Check if frontmatter was present in the original content.
    pub fn has_frontmatter(&self) -> bool {
        self.format.is_some()
    }
}

/// Splits frontmatter from the body and parses it into attributes.
pub struct FrontmatterParser {
    raw_matter: Matter<RawFrontmatter>,
}

impl Debug for FrontmatterParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontmatterParser").finish()
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterParser {
    /// Create a new frontmatter parser.
    pub fn new() -> Self {
        Self {
            raw_matter: Matter::new(),
        }
    }

    /// Extract attributes and body from raw file text.
    ///
    /// A leading UTF-8 byte order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontmatter is syntactically invalid, is never
    /// closed, or is not a key/value mapping.
    pub fn extract(&self, content: &str) -> Result<ExtractedFrontmatter> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if let Some((frontmatter, body)) = split_toml_frontmatter(content) {
            let table: toml::Table =
                toml::from_str(frontmatter).context("Invalid TOML frontmatter")?;
            let attributes = table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect();

            return Ok(ExtractedFrontmatter {
                attributes,
                body: body.to_string(),
                format: Some(FrontmatterFormat::Toml),
            });
        }

        if starts_with_delimiter(content, "---") && split_delimited(content, "---").is_none() {
            bail!("Frontmatter opened with `---` is never closed");
        }

        let Some(raw) = self.extract_raw_frontmatter(content) else {
            return Ok(ExtractedFrontmatter {
                attributes: Map::new(),
                body: content.to_string(),
                format: None,
            });
        };

        let body = self.strip_frontmatter(content);
        let attributes = if raw.trim().is_empty() {
            Map::new()
        } else {
            parse_yaml_attributes(&raw)?
        };

        Ok(ExtractedFrontmatter {
            attributes,
            body,
            format: Some(FrontmatterFormat::Yaml),
        })
    }

    /// Extract just the raw YAML frontmatter text, if any.
    ///
    /// An empty block (`---\n---`) is reported as `Some("")`.
    pub fn extract_raw_frontmatter(&self, content: &str) -> Option<String> {
        if !starts_with_delimiter(content, "---") {
            return None;
        }
        match self.raw_matter.parse::<String>(content) {
            Ok(result) => result.data.or_else(|| Some(String::new())),
            Err(_) => None,
        }
    }

    /// Content with YAML frontmatter removed.
    pub fn strip_frontmatter(&self, content: &str) -> String {
        self.raw_matter
            .parse::<String>(content)
            .map(|result| result.content)
            .unwrap_or_else(|_| content.to_string())
    }
}

fn starts_with_delimiter(content: &str, delimiter: &str) -> bool {
    content
        .strip_prefix(delimiter)
        .is_some_and(|rest| rest.starts_with('\n') || rest.starts_with("\r\n"))
}

/// Split `+++` delimited frontmatter into (frontmatter, body).
fn split_toml_frontmatter(input: &str) -> Option<(&str, &str)> {
    split_delimited(input, "+++")
}

/// Split a block opened and closed by `delimiter` lines into (block, rest).
fn split_delimited<'a>(input: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    if !starts_with_delimiter(input, delimiter) {
        return None;
    }

    let opening = input.split_inclusive('\n').next()?;
    let start = opening.len();
    let mut pos = start;
    for line in input[start..].split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == delimiter {
            let body = &input[pos + line.len()..];
            return Some((&input[start..pos], body));
        }
        pos += line.len();
    }

    None
}

fn parse_yaml_attributes(raw: &str) -> Result<Map<String, Value>> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(raw).context("Invalid YAML frontmatter")?;

    match yaml {
        serde_yaml::Value::Null => Ok(Map::new()),
        serde_yaml::Value::Mapping(_) => {
            let json = serde_json::to_value(&yaml)
                .context("Frontmatter keys must be strings")?;
            match json {
                Value::Object(map) => Ok(map),
                _ => bail!("Frontmatter must be a key/value mapping"),
            }
        }
        other => bail!("Frontmatter must be a key/value mapping, found {}", yaml_kind(&other)),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Convert a TOML value to JSON; datetimes become their RFC 3339 text.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_yaml_frontmatter() {
        let parser = FrontmatterParser::new();
        let input = "---\ntitle: A\ndate: 2024-01-01\ntags:\n  - x\n  - y\n---\n\n# Hello\n";

        let extracted = parser.extract(input).unwrap();
        assert_eq!(extracted.format, Some(FrontmatterFormat::Yaml));
        assert_eq!(extracted.attributes["title"], json!("A"));
        assert_eq!(extracted.attributes["date"], json!("2024-01-01"));
        assert_eq!(extracted.attributes["tags"], json!(["x", "y"]));
        assert!(extracted.body.contains("# Hello"));
        assert!(!extracted.body.contains("title"));
    }

    #[test]
    fn test_extract_toml_frontmatter() {
        let parser = FrontmatterParser::new();
        let input = "+++\ntitle = \"A\"\ndate = 2024-01-01\ncount = 3\n+++\nBody\n";

        let extracted = parser.extract(input).unwrap();
        assert_eq!(extracted.format, Some(FrontmatterFormat::Toml));
        assert_eq!(extracted.attributes["title"], json!("A"));
        assert_eq!(extracted.attributes["date"], json!("2024-01-01"));
        assert_eq!(extracted.attributes["count"], json!(3));
        assert_eq!(extracted.body, "Body\n");
    }

    #[test]
    fn test_extract_without_frontmatter() {
        let parser = FrontmatterParser::new();
        let extracted = parser.extract("# Just content\n").unwrap();
        assert!(!extracted.has_frontmatter());
        assert!(extracted.attributes.is_empty());
        assert_eq!(extracted.body, "# Just content\n");
    }

    #[test]
    fn test_extract_empty_frontmatter() {
        let parser = FrontmatterParser::new();
        let extracted = parser.extract("---\n---\nBody\n").unwrap();
        assert!(extracted.has_frontmatter());
        assert!(extracted.attributes.is_empty());
    }

    #[test]
    fn test_extract_ignores_bom() {
        let parser = FrontmatterParser::new();
        let extracted = parser.extract("\u{feff}---\ntitle: Bom\n---\nBody\n").unwrap();
        assert_eq!(extracted.attributes["title"], json!("Bom"));
    }

    #[test]
    fn test_extract_toml_crlf() {
        let parser = FrontmatterParser::new();
        let extracted = parser.extract("+++\r\ntitle = \"Win\"\r\n+++\r\nBody\r\n").unwrap();
        assert_eq!(extracted.attributes["title"], json!("Win"));
        assert_eq!(extracted.body, "Body\r\n");
    }

    #[test]
    fn test_extract_invalid_yaml_is_error() {
        let parser = FrontmatterParser::new();
        let result = parser.extract("---\ntitle: [unclosed\n---\nBody\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_non_mapping_is_error() {
        let parser = FrontmatterParser::new();
        let err = parser.extract("---\n- a\n- b\n---\nBody\n").unwrap_err();
        assert!(err.to_string().contains("a list"));
    }

    #[test]
    fn test_extract_unclosed_block_is_error() {
        let parser = FrontmatterParser::new();
        let err = parser.extract("---\ntitle: X\n\n# Body text here\n").unwrap_err();
        assert!(err.to_string().contains("never closed"));

        let extracted = parser.extract("+++\ntitle = \"X\"\n\nBody\n").unwrap();
        assert!(!extracted.has_frontmatter());
        assert_eq!(extracted.body, "+++\ntitle = \"X\"\n\nBody\n");
    }

    #[test]
    fn test_horizontal_rule_is_not_frontmatter() {
        let parser = FrontmatterParser::new();
        let extracted = parser.extract("# Title\n\n---\n\ntext\n").unwrap();
        assert!(!extracted.has_frontmatter());
    }
}
