//! Schema compilation and document validation.
//!
//! This crate turns a sequence of `required` / `optional` declarations into a
//! compiled [`Schema`], indexes documents against it, and runs every rule to
//! produce the full list of [`Message`]s for a document.
//!
//! ```
//! use okay_core::{validate, Schema};
//! use okay_validators::TypeSpec;
//! use serde_json::json;
//!
//! let schema = Schema::compile(|s| {
//!     s.required("accommodation.name", "string")?;
//!     s.required("accommodation.ratings[].score", TypeSpec::number().max(5))?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let document = json!({
//!     "accommodation": { "name": "Heartbreak Hotel", "ratings": [{ "score": 6 }] }
//! });
//! let messages = validate(&schema, &document, None).unwrap();
//!
//! assert_eq!(messages[0].kind, "number_too_large");
//! assert_eq!(messages[0].field, "accommodation.ratings[0].score");
//! ```

pub mod compiler;
pub mod index;
pub mod path;
pub mod registry;
pub mod runner;
pub mod schema;

pub use compiler::SchemaBuilder;
pub use index::{create_index, Index, IndexEntry, KnownPaths};
pub use registry::SchemaRegistry;
pub use runner::validate;
pub use schema::{FieldDefinition, Rule, Schema, Strictness};

pub use okay_contracts::message::Message;
