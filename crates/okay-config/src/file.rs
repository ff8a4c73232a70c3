//! Schema file types.
//!
//! A `SchemaFile` is deserialized from TOML and holds an ordered list of
//! field declarations. Declarations are applied in file order, exactly as if
//! they had been written as `required` / `optional` calls.
//!
//! ```toml
//! ignore_extra_fields = false
//!
//! [[fields]]
//! path = "accommodation.ratings[].score"
//! type = "number"
//! max = 5
//!
//! [[fields]]
//! path = "metadata"
//! presence = "optional"
//! type = "object?"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a declared path must appear. Written in lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    #[default]
    Required,
    Optional,
}

/// One `[[fields]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field path template, e.g. `accommodation.ratings[].score`.
    pub path: String,

    #[serde(default)]
    pub presence: Presence,

    /// Type name, optionally suffixed with `?` for nullable. Absent means
    /// the field only has to exist.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,

    /// Name of a registered custom validator. Only valid with `type = "custom"`.
    #[serde(default)]
    pub validator: Option<String>,

    /// Every other key is passed to the validator as a parameter.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A whole schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default)]
    pub ignore_extra_fields: bool,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}
