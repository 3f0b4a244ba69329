//! Validation contracts for collection entries.
//!
//! A [`Schema`] turns an untyped attribute value into a validated entry and
//! can describe the entry's shape as a TypeScript type for the declaration
//! file. Two implementations ship with the crate:
//!
//! - [`ObjectSchema`]: declarative field schema, buildable in code or loaded
//!   from the TOML configuration
//! - [`TypedSchema`]: validates by deserializing into a Rust type `T`
//!
//! Any other engine can be plugged in by implementing the trait.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontmatter_collection::schema::{FieldSchema, ObjectSchema, Schema};
//! use serde_json::json;
//!
//! let schema = ObjectSchema::new()
//!     .field("title", FieldSchema::string())
//!     .field("date", FieldSchema::date());
//!
//! let entry = schema.parse(&json!({"title": "A", "date": "2024-01-01"})).unwrap();
//! assert_eq!(schema.type_declaration(), "{ date: string; title: string }");
//! # let _ = entry;
//! ```

pub mod object;

pub use object::{FieldKind, FieldSchema, ObjectSchema, UnknownKeys};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Why a value was rejected by a schema.
///
/// Holds every problem found, each prefixed with the path of the offending
/// field, so one message reports all of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .issues.join("; "))]
pub struct ValidationError {
    /// Individual problems, e.g. `"date: required"`
    pub issues: Vec<String>,
}

impl ValidationError {
    /// Create an error with a single issue.
    pub fn new(issue: impl Into<String>) -> Self {
        Self {
            issues: vec![issue.into()],
        }
    }
}

/// A validate-and-transform contract with a structural type description.
pub trait Schema: Send + Sync {
    /// Validate `input` and return the transformed entry.
    fn parse(&self, input: &Value) -> Result<Value, ValidationError>;

    /// TypeScript type of one entry, e.g. `{ title: string; date: string }`.
    fn type_declaration(&self) -> String;
}

impl fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("type", &self.type_declaration()).finish()
    }
}

/// A schema backed by a Rust type.
///
/// Entries are deserialized into `T` and serialized back, so whatever `T`'s
/// serde attributes do (renames, defaults, `deny_unknown_fields`) is the
/// validation. The TypeScript shape cannot be derived from `T`; supply it with
/// [`TypedSchema::with_declaration`] or it is emitted as `unknown`.
///
/// ```rust,no_run
/// use frontmatter_collection::schema::TypedSchema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Serialize)]
/// struct Post {
///     title: String,
///     #[serde(default)]
///     draft: bool,
/// }
///
/// let schema = TypedSchema::<Post>::new()
///     .with_declaration("{ title: string; draft: boolean }");
/// ```
pub struct TypedSchema<T> {
    declaration: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    /// Create a typed schema with an `unknown` declaration.
    pub fn new() -> Self {
        Self {
            declaration: "unknown".to_string(),
            _marker: PhantomData,
        }
    }

    /// Set the TypeScript type emitted for entries of this schema.
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = declaration.into();
        self
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Serialize,
{
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let typed: T = serde_json::from_value(input.clone())
            .map_err(|e| ValidationError::new(e.to_string()))?;
        serde_json::to_value(&typed).map_err(|e| ValidationError::new(e.to_string()))
    }

    fn type_declaration(&self) -> String {
        self.declaration.clone()
    }
}
