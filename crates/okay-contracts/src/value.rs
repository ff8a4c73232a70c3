//! Classification of document values.
//!
//! Documents are `serde_json::Value` trees. The engine only cares about four
//! shapes: maps, ordered sequences, scalars, and the explicit null marker.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape of a document value as seen by the indexer and runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Object,
    List,
    Scalar,
    Null,
}

impl ValueKind {
    /// Classify `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::List,
            Value::Null => ValueKind::Null,
            _ => ValueKind::Scalar,
        }
    }
}

/// The kind of container an indexed value was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Object,
    List,
}

/// A short, human-readable name for the type of `value`.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
