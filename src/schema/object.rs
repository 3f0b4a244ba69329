//! Declarative object schema.
//!
//! Fields are declared either in code with the [`FieldSchema`] constructors
//! or in TOML with a compact shorthand:
//!
//! ```toml
//! [collections.schema]
//! title = "string"
//! date = "date"
//! tags = "string[]?"
//! rating = { type = "integer", optional = true }
//! draft = { type = "boolean", default = false }
//! author = { type = "object", fields = { name = "string", url = "string?" } }
//! ```
//!
//! A trailing `?` marks a field optional and each trailing `[]` wraps the
//! kind in an array. Keys not declared in the schema are stripped unless the
//! schema is switched to [`UnknownKeys::Passthrough`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use strsim::levenshtein;

use super::{Schema, ValidationError};
use crate::core::CollectionError;
use crate::utils::is_identifier;

const KIND_NAMES: &[&str] =
    &["string", "number", "integer", "boolean", "date", "any", "array", "object"];

/// The value type a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any string
    String,
    /// Any JSON number
    Number,
    /// A whole number
    Integer,
    /// `true` or `false`
    Boolean,
    /// Zero-padded `YYYY-MM-DD` kept as is, or an RFC 3339 timestamp converted to UTC
    Date,
    /// Anything, passed through untouched
    Any,
    /// A list whose items all match the inner field
    Array(Box<FieldSchema>),
    /// A nested object
    Object(ObjectSchema),
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Any => "any",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    fn type_declaration(&self) -> String {
        match self {
            Self::String | Self::Date => "string".to_string(),
            Self::Number | Self::Integer => "number".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Any => "unknown".to_string(),
            Self::Array(item) => format!("{}[]", item.kind.type_declaration()),
            Self::Object(schema) => schema.type_declaration(),
        }
    }

    fn validate(&self, path: &str, value: &Value, issues: &mut Vec<String>) -> Option<Value> {
        match (self, value) {
            (Self::String, Value::String(_)) | (Self::Number, Value::Number(_)) => {
                Some(value.clone())
            }
            (Self::Boolean, Value::Bool(_)) | (Self::Any, _) => Some(value.clone()),
            (Self::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(value.clone()),
            (Self::Date, Value::String(text)) => match normalize_date(text) {
                Some(date) => Some(Value::String(date)),
                None => {
                    issues.push(format!("{path}: invalid date '{text}'"));
                    None
                }
            },
            (Self::Array(item), Value::Array(items)) => {
                let before = issues.len();
                let validated: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| item.kind.validate(&format!("{path}[{i}]"), v, issues))
                    .collect();
                (issues.len() == before).then_some(Value::Array(validated))
            }
            (Self::Object(schema), Value::Object(map)) => {
                let before = issues.len();
                let validated = schema.validate_map(path, map, issues);
                (issues.len() == before).then_some(Value::Object(validated))
            }
            _ => {
                issues.push(format!(
                    "{path}: expected {}, found {}",
                    self.name(),
                    json_kind(value)
                ));
                None
            }
        }
    }
}

/// One declared field: its kind, whether it may be absent and its default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Accepted value type
    pub kind: FieldKind,
    /// Whether the field may be missing or null
    pub optional: bool,
    /// Value used when the field is missing or null
    pub default: Option<Value>,
}

impl FieldSchema {
    /// A required field of the given kind.
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
        }
    }

    /// A required string field.
    pub const fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// A required number field.
    pub const fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// A required integer field.
    pub const fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// A required boolean field.
    pub const fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// A required date field.
    pub const fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    /// A required field accepting any value.
    pub const fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    /// A required array of `item`.
    pub fn array(item: FieldSchema) -> Self {
        Self::new(FieldKind::Array(Box::new(item)))
    }

    /// A required nested object.
    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(FieldKind::Object(schema))
    }

    /// Mark the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Use `value` when the field is missing or null.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether the field may be absent from a validated entry.
    fn may_be_absent(&self) -> bool {
        self.optional && self.default.is_none()
    }
}

impl FromStr for FieldSchema {
    type Err = CollectionError;

    /// Parse the shorthand form, e.g. `"string"`, `"date?"`, `"number[]?"`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        parse_shorthand("", spec)
    }
}

/// What to do with keys a schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Drop them from the entry
    #[default]
    Strip,
    /// Keep them unchanged
    Passthrough,
}

/// An object schema: named fields plus an unknown-key policy.
///
/// Field order is alphabetical in validated output and in the type
/// declaration, so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, FieldSpec>")]
pub struct ObjectSchema {
    fields: BTreeMap<String, FieldSchema>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    /// An empty schema that strips unknown keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Set the unknown-key policy.
    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Keep undeclared keys in validated entries.
    #[must_use]
    pub fn passthrough(self) -> Self {
        self.unknown_keys(UnknownKeys::Passthrough)
    }

    /// Declared fields, by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldSchema> {
        &self.fields
    }

    fn validate_map(
        &self,
        path: &str,
        map: &Map<String, Value>,
        issues: &mut Vec<String>,
    ) -> Map<String, Value> {
        let mut output = Map::new();

        for (name, field) in &self.fields {
            let field_path = join_path(path, name);
            match map.get(name) {
                None | Some(Value::Null) if field.default.is_some() => {
                    if let Some(default) = &field.default {
                        output.insert(name.clone(), default.clone());
                    }
                }
                None | Some(Value::Null) if field.optional => {}
                None => issues.push(format!("{field_path}: required")),
                Some(value) => {
                    if let Some(validated) = field.kind.validate(&field_path, value, issues) {
                        output.insert(name.clone(), validated);
                    }
                }
            }
        }

        if self.unknown_keys == UnknownKeys::Passthrough {
            for (key, value) in map {
                if !self.fields.contains_key(key) {
                    output.insert(key.clone(), value.clone());
                }
            }
        }

        output
    }
}

impl Schema for ObjectSchema {
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let Value::Object(map) = input else {
            return Err(ValidationError::new(format!(
                "expected object, found {}",
                json_kind(input)
            )));
        };

        let mut issues = Vec::new();
        let output = self.validate_map("", map, &mut issues);
        if issues.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(ValidationError { issues })
        }
    }

    fn type_declaration(&self) -> String {
        let mut members: Vec<String> = self
            .fields
            .iter()
            .map(|(name, field)| {
                let key = if is_identifier(name) {
                    name.clone()
                } else {
                    Value::String(name.clone()).to_string()
                };
                let marker = if field.may_be_absent() { "?" } else { "" };
                format!("{key}{marker}: {}", field.kind.type_declaration())
            })
            .collect();

        if self.unknown_keys == UnknownKeys::Passthrough {
            members.push("[key: string]: unknown".to_string());
        }

        if members.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", members.join("; "))
        }
    }
}

/// Serialized form of a field: shorthand string or detailed table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// `"string"`, `"date?"`, `"string[]"`
    Shorthand(String),
    /// `{ type = "...", optional = ..., default = ..., items = ..., fields = ... }`
    Detailed(DetailedFieldSpec),
}

/// Table form of a field declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedFieldSpec {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    items: Option<Box<FieldSpec>>,
    #[serde(default)]
    fields: Option<BTreeMap<String, FieldSpec>>,
}

impl TryFrom<BTreeMap<String, FieldSpec>> for ObjectSchema {
    type Error = CollectionError;

    fn try_from(specs: BTreeMap<String, FieldSpec>) -> Result<Self, Self::Error> {
        build_object("", specs)
    }
}

fn build_object(
    path: &str,
    specs: BTreeMap<String, FieldSpec>,
) -> Result<ObjectSchema, CollectionError> {
    let mut schema = ObjectSchema::new();
    for (name, spec) in specs {
        let field_path = join_path(path, &name);
        let field = build_field(&field_path, spec)?;
        schema.fields.insert(name, field);
    }
    Ok(schema)
}

fn build_field(path: &str, spec: FieldSpec) -> Result<FieldSchema, CollectionError> {
    match spec {
        FieldSpec::Shorthand(text) => parse_shorthand(path, &text),
        FieldSpec::Detailed(detail) => {
            let mut optional = detail.optional;
            let kind = match detail.kind.as_str() {
                "array" => {
                    let items = detail.items.ok_or_else(|| invalid(path, "array fields need `items`"))?;
                    FieldKind::Array(Box::new(build_field(&format!("{path}[]"), *items)?))
                }
                "object" => {
                    let fields =
                        detail.fields.ok_or_else(|| invalid(path, "object fields need `fields`"))?;
                    FieldKind::Object(build_object(path, fields)?)
                }
                other => {
                    let parsed = parse_shorthand(path, other)?;
                    optional |= parsed.optional;
                    parsed.kind
                }
            };
            let default = match detail.default {
                Some(value) => Some(check_default(path, &kind, &value)?),
                None => None,
            };
            Ok(FieldSchema {
                kind,
                optional,
                default,
            })
        }
    }
}

fn parse_shorthand(path: &str, spec: &str) -> Result<FieldSchema, CollectionError> {
    let mut rest = spec.trim();
    let optional = match rest.strip_suffix('?') {
        Some(stripped) => {
            rest = stripped.trim_end();
            true
        }
        None => false,
    };

    let mut depth = 0;
    while let Some(stripped) = rest.strip_suffix("[]") {
        rest = stripped.trim_end();
        depth += 1;
    }

    let mut kind = match rest {
        "string" => FieldKind::String,
        "number" => FieldKind::Number,
        "integer" => FieldKind::Integer,
        "boolean" => FieldKind::Boolean,
        "date" => FieldKind::Date,
        "any" => FieldKind::Any,
        "array" | "object" => {
            return Err(invalid(path, &format!("`{rest}` must use the table form")));
        }
        unknown => return Err(invalid(path, &unknown_kind_message(unknown))),
    };

    for _ in 0..depth {
        kind = FieldKind::Array(Box::new(FieldSchema::new(kind)));
    }

    Ok(FieldSchema {
        kind,
        optional,
        default: None,
    })
}

/// A default must itself satisfy the field's kind; the validated form is kept.
fn check_default(path: &str, kind: &FieldKind, value: &Value) -> Result<Value, CollectionError> {
    let mut issues = Vec::new();
    match kind.validate(path, value, &mut issues) {
        Some(validated) if issues.is_empty() => Ok(validated),
        _ => Err(invalid(path, &format!("default does not match its type: {}", issues.join("; ")))),
    }
}

fn unknown_kind_message(unknown: &str) -> String {
    let closest = KIND_NAMES
        .iter()
        .map(|name| (*name, levenshtein(unknown, name)))
        .min_by_key(|(_, distance)| *distance)
        .filter(|(name, distance)| *distance <= name.len() / 2);

    match closest {
        Some((name, _)) => format!("unknown type '{unknown}' (did you mean '{name}'?)"),
        None => format!("unknown type '{unknown}'"),
    }
}

fn invalid(path: &str, reason: &str) -> CollectionError {
    CollectionError::InvalidSchema {
        field: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
        reason: reason.to_string(),
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Zero-padded `YYYY-MM-DD` stays as is; RFC 3339 timestamps are converted
/// to UTC. Either way string order matches chronological order.
fn normalize_date(text: &str) -> Option<String> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let canonical = date.format("%Y-%m-%d").to_string();
        return (canonical == text).then_some(canonical);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
