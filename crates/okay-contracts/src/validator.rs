//! The validator contract shared by the registry and the runner.

use serde_json::{Map, Value};

use crate::{
    error::{BoxError, SchemaError},
    message::Message,
};

/// A compiled, parameterized type check for one field path.
///
/// Implementations are immutable after construction and are invoked once per
/// indexed value, so the same validator runs against every element of a list.
/// Returning `Ok(None)` means the value conforms.
pub trait TypeValidator: Send + Sync {
    /// Check `value`, found at the concrete path `field`.
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError>;
}

/// A caller-supplied validation function used by the `custom` type.
///
/// Receives the concrete field path, the value, and the parameters given
/// with the declaration (empty when there were none). Errors are wrapped
/// into `SchemaError::CustomValidator` by the registry.
pub type CustomFn =
    dyn Fn(&str, &Value, &Map<String, Value>) -> Result<Option<Message>, BoxError> + Send + Sync;
