//! Validator parameter extraction.
//!
//! Parameters arrive as a JSON map (from the builder API or a TOML schema
//! file). Each constructor states which keys it accepts; anything else, or a
//! value of the wrong type, is a schema-authoring error. A `null` value is
//! treated the same as an absent key.

use serde_json::{Map, Value};

use okay_contracts::error::SchemaError;

/// Validator parameters keyed by name, e.g. `{"min": 0, "max": 5}`.
pub type Params = Map<String, Value>;

/// A numeric bound that remembers how it was written.
///
/// `value` is echoed back in `expected` payloads so `5` stays `5` rather than
/// becoming `5.0`; `limit` is what comparisons use.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bound {
    pub(crate) value: Value,
    pub(crate) limit: f64,
}

pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidParameter {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Fail if `params` contains a key outside `allowed`.
pub(crate) fn reject_unknown(field: &str, params: &Params, allowed: &[&str]) -> Result<(), SchemaError> {
    match params.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid(field, format!("unknown parameter '{key}'"))),
        None => Ok(()),
    }
}

fn present<'p>(params: &'p Params, key: &str) -> Option<&'p Value> {
    params.get(key).filter(|v| !v.is_null())
}

pub(crate) fn bound(field: &str, params: &Params, key: &str) -> Result<Option<Bound>, SchemaError> {
    match present(params, key) {
        None => Ok(None),
        Some(value) => match value.as_f64() {
            Some(limit) => Ok(Some(Bound { value: value.clone(), limit })),
            None => Err(invalid(field, format!("'{key}' must be a number, got {value}"))),
        },
    }
}

pub(crate) fn count(field: &str, params: &Params, key: &str) -> Result<Option<usize>, SchemaError> {
    match present(params, key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(field, format!("'{key}' must be a non-negative integer, got {value}"))),
    }
}

pub(crate) fn string(field: &str, params: &Params, key: &str) -> Result<Option<String>, SchemaError> {
    match present(params, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(value) => Err(invalid(field, format!("'{key}' must be a string, got {value}"))),
    }
}

pub(crate) fn boolean(field: &str, params: &Params, key: &str) -> Result<Option<bool>, SchemaError> {
    match present(params, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(value) => Err(invalid(field, format!("'{key}' must be a boolean, got {value}"))),
    }
}

pub(crate) fn list<'p>(field: &str, params: &'p Params, key: &str) -> Result<Option<&'p Vec<Value>>, SchemaError> {
    match present(params, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(value) => Err(invalid(field, format!("'{key}' must be a list, got {value}"))),
    }
}
