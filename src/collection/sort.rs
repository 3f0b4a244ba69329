//! Ready-made comparators and predicates over entry fields.
//!
//! Fields are addressed by key, with `.` descending into nested objects
//! (`author.name`). A missing or `null` field sorts after every present one
//! in both directions.

use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

/// Look up a dotted field path in an entry; `null` counts as missing.
pub fn field<'a>(entry: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(entry, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

/// Total order over JSON values.
///
/// Values of different types are ranked `null < boolean < number < string <
/// array < object`. Within a type, numbers compare numerically, strings
/// lexicographically (schema-validated dates are zero-padded and UTC, so
/// this is chronological), booleans `false < true`. Arrays and objects all
/// compare equal, so a stable sort keeps them in their original order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Comparator ordering entries by one field.
pub fn by_field(
    path: impl Into<String>,
    order: SortOrder,
) -> impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static {
    let path = path.into();
    move |a, b| match (field(a, &path), field(b, &path)) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => compare_values(x, y),
            SortOrder::Descending => compare_values(y, x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Predicate over one field.
///
/// With `equals` and/or `not_equals` set, every given condition must hold.
/// With neither, the field must be present and not `false`.
pub fn field_matches(
    path: impl Into<String>,
    equals: Option<Value>,
    not_equals: Option<Value>,
) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    let path = path.into();
    move |entry| {
        let value = field(entry, &path);
        if equals.is_none() && not_equals.is_none() {
            return value.is_some_and(|v| v != &Value::Bool(false));
        }

        let equal_ok = equals.as_ref().is_none_or(|expected| value == Some(expected));
        let not_equal_ok = not_equals.as_ref().is_none_or(|rejected| value != Some(rejected));
        equal_ok && not_equal_ok
    }
}
