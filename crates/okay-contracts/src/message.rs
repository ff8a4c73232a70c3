//! Validation messages.
//!
//! A `Message` is one structured finding about a document. Messages are the
//! only output of a validation run; they are collected, never raised.
//!
//! Wire shape (what downstream consumers see):
//!
//! ```json
//! { "type": "number_too_large", "field": "ratings[2].score",
//!   "expected": { "min": 0, "max": 5 }, "source": "hotels.jsonl" }
//! ```
//!
//! Caller-supplied context keys are flattened to the top level.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key/value pairs merged into every message of a run (e.g. a source file).
pub type MessageContext = Map<String, Value>;

/// The closed vocabulary of message tags produced by the engine itself.
///
/// Custom validators may emit any other tag.
pub mod kinds {
    pub const MISSING_FIELD: &str = "missing_field";
    pub const EXTRA_FIELD: &str = "extra_field";
    pub const INVALID_TYPE: &str = "invalid_type";
    pub const NULL_VALUE: &str = "null_value";
    pub const TOO_FEW_ELEMENTS: &str = "too_few_elements";
    pub const TOO_MANY_ELEMENTS: &str = "too_many_elements";
    pub const NUMBER_TOO_SMALL: &str = "number_too_small";
    pub const NUMBER_TOO_LARGE: &str = "number_too_large";
    pub const INVALID_NUMBER_OPTION: &str = "invalid_number_option";
    pub const NO_MATCH: &str = "no_match";
    pub const STRING_TOO_SHORT: &str = "string_too_short";
    pub const STRING_TOO_LONG: &str = "string_too_long";
    pub const INVALID_STRING_OPTION: &str = "invalid_string_option";
    pub const MALFORMED_JSON: &str = "malformed_json";
}

/// Keys owned by the message itself; context entries never overwrite them.
const RESERVED_KEYS: [&str; 3] = ["type", "field", "expected"];

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The finding's tag, e.g. `"missing_field"`. Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,

    /// The concrete path of the offending location, e.g. `"ratings[1].score"`.
    pub field: String,

    /// The constraint that was violated, when there is one to report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    /// Caller-supplied context, flattened into the top level on the wire.
    #[serde(flatten)]
    pub context: MessageContext,
}

impl Message {
    /// Create a message with no `expected` payload and no context.
    pub fn new(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            field: field.into(),
            expected: None,
            context: MessageContext::new(),
        }
    }

    /// Attach the violated constraint.
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach one context entry. Reserved keys (`type`, `field`, `expected`)
    /// are ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.context.insert(key, value.into());
        }
        self
    }

    /// Merge every entry of `context` into this message.
    ///
    /// Later values win over earlier ones; reserved keys are skipped.
    pub fn extend_context(&mut self, context: &MessageContext) {
        for (key, value) in context {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                self.context.insert(key.clone(), value.clone());
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.field)
    }
}
