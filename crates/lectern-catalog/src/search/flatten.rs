//! Flattening of nested filter objects into query parameters.
//!
//! Nested objects are hoisted without a key prefix: `{num_range: {min, max}}`
//! becomes `{min, max}`. The backend's query parser reads exactly those bare
//! names, so this is the wire contract. When two nested objects share a key
//! the one visited later (in key order) wins.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Options for [`flatten_filters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Drop empty arrays and falsy scalars (`null`, `false`, `0`, `""`).
    pub drop_empty: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self { drop_empty: true }
    }
}

impl FlattenOptions {
    /// Keep every leaf, including empty and falsy ones.
    pub fn keep_all() -> Self {
        Self { drop_empty: false }
    }
}

/// A primitive query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// Whether the value should be omitted from a query string.
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    fn from_scalar(value: &Value) -> Self {
        match value {
            Value::String(s) => QueryValue::Text(s.clone()),
            Value::Bool(b) => QueryValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryValue::Integer(i),
                None => QueryValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::Null => QueryValue::Null,
            // Arrays and objects are handled by the caller.
            other => QueryValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => write!(f, "{}", s),
            QueryValue::Integer(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Null => Ok(()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Integer(i)
    }
}

/// Flatten a nested filter object into a flat key/value mapping.
///
/// Non-object input yields an empty mapping. Arrays are joined with `,`.
pub fn flatten_filters(value: &Value, options: FlattenOptions) -> BTreeMap<String, QueryValue> {
    let mut out = BTreeMap::new();
    if let Value::Object(map) = value {
        flatten_into(map, options, &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, options: FlattenOptions, out: &mut BTreeMap<String, QueryValue>) {
    for (key, value) in map {
        match value {
            Value::Object(inner) => flatten_into(inner, options, out),
            Value::Array(items) => {
                if options.drop_empty && items.is_empty() {
                    continue;
                }
                let joined = items.iter().map(join_part).collect::<Vec<_>>().join(",");
                out.insert(key.clone(), QueryValue::Text(joined));
            }
            scalar => {
                if options.drop_empty && is_falsy(scalar) {
                    continue;
                }
                out.insert(key.clone(), QueryValue::from_scalar(scalar));
            }
        }
    }
}

fn join_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |x| x == 0.0 || x.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
