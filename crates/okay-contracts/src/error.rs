//! Error types for the okay validation engine.
//!
//! There are two disjoint failure channels. Findings about a *document* are
//! `Message`s and are always collected, never raised. Problems with a
//! *schema* (or with the inputs handed to the engine) are the errors defined
//! here and are returned immediately.

use thiserror::Error;

/// Boxed error produced by caller-supplied code such as custom validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A schema-authoring error.
///
/// Raised while compiling a schema, or while running a custom validator whose
/// user-supplied function failed. Every variant names the field path it
/// concerns so the author can find the offending declaration.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The root `"."` was declared optional. The root is the document itself.
    #[error("root cannot be optional")]
    OptionalNotAllowed { field: String },

    /// An `optional` declaration hit a path that is already required.
    #[error("field '{field}' marked as optional, but it's already required")]
    AlreadyRequired { field: String },

    /// A `required` declaration hit a path that is already optional.
    #[error("field '{field}' marked as required, but it's already optional")]
    AlreadyOptional { field: String },

    /// A non-nullable redeclaration of a path that is explicitly nullable.
    #[error("field '{field}' marked as non-nullable, but it's already nullable")]
    AlreadyNullable { field: String },

    /// A nullable redeclaration of a path that is explicitly non-nullable.
    #[error("field '{field}' marked as nullable, but it's already non-nullable")]
    AlreadyNonNullable { field: String },

    /// The type name does not resolve to a known validator.
    #[error("type '{type_name}' specified for field '{field}' is invalid")]
    UnknownType { field: String, type_name: String },

    /// A validator parameter is unknown, has the wrong type, or is malformed.
    #[error("invalid parameter for field '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    /// The field path does not follow the path grammar.
    #[error("invalid field path '{field}': {reason}")]
    InvalidPath { field: String, reason: String },

    /// A custom validation function returned an error.
    ///
    /// The original error is kept as the `source` so callers can walk the
    /// chain down to the root cause.
    #[error("custom validator for field '{field}' failed: {source}")]
    CustomValidator {
        field: String,
        #[source]
        source: BoxError,
    },
}

impl SchemaError {
    /// The stable snake_case tag for this error, e.g. `"already_required"`.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaError::OptionalNotAllowed { .. } => "optional_not_allowed",
            SchemaError::AlreadyRequired { .. } => "already_required",
            SchemaError::AlreadyOptional { .. } => "already_optional",
            SchemaError::AlreadyNullable { .. } => "already_nullable",
            SchemaError::AlreadyNonNullable { .. } => "already_non_nullable",
            SchemaError::UnknownType { .. } => "unknown_type",
            SchemaError::InvalidParameter { .. } => "invalid_parameter",
            SchemaError::InvalidPath { .. } => "invalid_path",
            SchemaError::CustomValidator { .. } => "custom_validator",
        }
    }

    /// The field path the error refers to.
    pub fn field(&self) -> &str {
        match self {
            SchemaError::OptionalNotAllowed { field }
            | SchemaError::AlreadyRequired { field }
            | SchemaError::AlreadyOptional { field }
            | SchemaError::AlreadyNullable { field }
            | SchemaError::AlreadyNonNullable { field }
            | SchemaError::UnknownType { field, .. }
            | SchemaError::InvalidParameter { field, .. }
            | SchemaError::InvalidPath { field, .. }
            | SchemaError::CustomValidator { field, .. } => field,
        }
    }
}

/// The unified error type returned by the okay crates.
#[derive(Debug, Error)]
pub enum OkayError {
    /// The schema itself is malformed or self-contradictory.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The document handed to the runner is not a map at the root.
    #[error("document must be an object, found {found}")]
    DocumentNotObject { found: String },

    /// A schema file is missing, unreadable, or does not parse.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Reading or writing documents failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },

    /// The compiled-schema cache lock was poisoned by a panicking thread.
    #[error("schema registry unavailable: {reason}")]
    RegistryPoisoned { reason: String },
}

/// Convenience alias used throughout the okay crates.
pub type OkayResult<T> = Result<T, OkayError>;
