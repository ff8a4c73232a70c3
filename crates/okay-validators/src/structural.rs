//! Shape validators: `any`, `object`, `list`, and `boolean`.

use serde_json::{json, Value};

use okay_contracts::{
    error::SchemaError,
    message::{kinds, Message},
    validator::TypeValidator,
};

use crate::params::{self, Params};

fn invalid_type(field: &str, expected: &str) -> Message {
    Message::new(kinds::INVALID_TYPE, field).with_expected(expected)
}

/// Accepts every value. Used for declarations that name no type.
#[derive(Debug, Default)]
pub struct AnyValidator;

impl AnyValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &[])?;
        Ok(Self)
    }
}

impl TypeValidator for AnyValidator {
    fn validate(&self, _field: &str, _value: &Value) -> Result<Option<Message>, SchemaError> {
        Ok(None)
    }
}

/// Requires a map.
#[derive(Debug, Default)]
pub struct ObjectValidator;

impl ObjectValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &[])?;
        Ok(Self)
    }
}

impl TypeValidator for ObjectValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        if value.is_object() {
            Ok(None)
        } else {
            Ok(Some(invalid_type(field, "object")))
        }
    }
}

/// Requires `true` or `false`.
#[derive(Debug, Default)]
pub struct BooleanValidator;

impl BooleanValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &[])?;
        Ok(Self)
    }
}

impl TypeValidator for BooleanValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        if value.is_boolean() {
            Ok(None)
        } else {
            Ok(Some(invalid_type(field, "boolean")))
        }
    }
}

/// Requires a sequence, optionally with an element count in `[min, max]`.
#[derive(Debug, Default)]
pub struct ListValidator {
    min: Option<usize>,
    max: Option<usize>,
}

impl ListValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &["min", "max"])?;
        Ok(Self {
            min: params::count(field, params, "min")?,
            max: params::count(field, params, "max")?,
        })
    }

    fn expected(&self) -> Value {
        json!({ "min": self.min, "max": self.max })
    }
}

impl TypeValidator for ListValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        let Some(items) = value.as_array() else {
            return Ok(Some(invalid_type(field, "list")));
        };

        if self.min.is_some_and(|min| items.len() < min) {
            return Ok(Some(
                Message::new(kinds::TOO_FEW_ELEMENTS, field).with_expected(self.expected()),
            ));
        }

        if self.max.is_some_and(|max| items.len() > max) {
            return Ok(Some(
                Message::new(kinds::TOO_MANY_ELEMENTS, field).with_expected(self.expected()),
            ));
        }

        Ok(None)
    }
}
