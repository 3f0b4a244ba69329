//! Per-file processing: raw frontmatter in, entry or failure out.
//!
//! [`EntryProcessor::process`] never propagates an error. Whatever the
//! contract rejects comes back as a [`ParseFailure`] naming the file, so the
//! compiler can record it and move on to the next file.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::info;

use super::Contract;
use crate::constants::FILE_PATH_KEY;

/// Attributes parsed from one file, with the file's path injected.
///
/// The path is relative to the project root with `/` separators and is
/// stored under the `filePath` key, replacing any attribute of that name.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrontmatter {
    file_path: String,
    attributes: Map<String, Value>,
}

impl RawFrontmatter {
    /// Build the raw map for `file_path`.
    pub fn new(file_path: impl Into<String>, mut attributes: Map<String, Value>) -> Self {
        let file_path = file_path.into();
        attributes.insert(FILE_PATH_KEY.to_string(), Value::String(file_path.clone()));
        Self {
            file_path,
            attributes,
        }
    }

    /// Path of the source file, relative to the project root.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// All attributes, including `filePath`.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Look up one attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The attributes as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// Where in the pipeline a file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The file could not be read
    Read,
    /// The frontmatter block could not be parsed
    Extract,
    /// The parse function returned an error
    Transform,
    /// The schema rejected the value
    Validate,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Extract => write!(f, "frontmatter"),
            Self::Transform => write!(f, "parse function"),
            Self::Validate => write!(f, "schema"),
        }
    }
}

/// A file excluded from its collection, with the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file_path}: {stage} error: {cause}")]
pub struct ParseFailure {
    /// Path of the rejected file, relative to the project root
    pub file_path: String,
    /// Pipeline stage that failed
    pub stage: FailureStage,
    /// Human-readable cause
    pub cause: String,
}

impl ParseFailure {
    /// Create a failure record.
    pub fn new(file_path: impl Into<String>, stage: FailureStage, cause: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            stage,
            cause: cause.into(),
        }
    }
}

/// Runs a collection's contract over raw frontmatter.
#[derive(Debug, Clone, Copy)]
pub struct EntryProcessor<'a> {
    contract: &'a Contract,
    debug: bool,
}

impl<'a> EntryProcessor<'a> {
    /// Create a processor for `contract`.
    pub const fn new(contract: &'a Contract) -> Self {
        Self {
            contract,
            debug: false,
        }
    }

    /// Emit each file's raw attributes before processing it.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Produce an entry from `raw`, or the reason it was rejected.
    pub fn process(&self, raw: &RawFrontmatter) -> Result<Value, ParseFailure> {
        if self.debug {
            info!(
                target: "frontmatter_collection::debug",
                file = raw.file_path(),
                "raw frontmatter: {}",
                raw.to_value()
            );
        }

        let value = match &self.contract.parse_front_matter {
            Some(parse) => parse(raw).map_err(|e| {
                ParseFailure::new(raw.file_path(), FailureStage::Transform, format!("{e:#}"))
            })?,
            None => raw.to_value(),
        };

        match &self.contract.schema {
            Some(schema) => schema.parse(&value).map_err(|e| {
                ParseFailure::new(raw.file_path(), FailureStage::Validate, e.to_string())
            }),
            None => Ok(value),
        }
    }
}
