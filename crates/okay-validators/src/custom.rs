//! The `custom` validator: delegates to a caller-supplied function.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use okay_contracts::{
    error::SchemaError,
    message::Message,
    validator::{CustomFn, TypeValidator},
};

use crate::params::{self, Params};

/// Wraps a user function `(field, value, params) -> Result<Option<Message>, BoxError>`.
///
/// Parameters are not interpreted here; every one is handed to the function
/// on each call. An error returned by the function is not a document
/// finding: it is re-raised as `SchemaError::CustomValidator` with the
/// original error kept as its source.
pub struct CustomValidator {
    function: Arc<CustomFn>,
    params: Params,
}

impl CustomValidator {
    pub fn new(field: &str, params: &Params, function: Option<&Arc<CustomFn>>) -> Result<Self, SchemaError> {
        let function = function
            .cloned()
            .ok_or_else(|| params::invalid(field, "no custom validation function specified"))?;
        Ok(Self {
            function,
            params: params.clone(),
        })
    }
}

impl TypeValidator for CustomValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        (self.function)(field, value, &self.params).map_err(|source| {
            warn!(field = %field, error = %source, "custom validation function failed");
            SchemaError::CustomValidator {
                field: field.to_string(),
                source,
            }
        })
    }
}
