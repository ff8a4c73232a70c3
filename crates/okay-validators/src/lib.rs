//! # okay-validators
//!
//! The type validator registry for the okay validation engine.
//!
//! Every supported type is a [`registry::TypeTag`] mapped to one validator
//! constructor. Validators implement
//! [`okay_contracts::validator::TypeValidator`] and are pure after
//! construction: `(field, value) -> Option<Message>`.
//!
//! | type | parameters | failure tags |
//! |---|---|---|
//! | `object` | none | `invalid_type` |
//! | `list` | `min`, `max` (element count) | `invalid_type`, `too_few_elements`, `too_many_elements` |
//! | `number` | `min`, `max`, `options` | `invalid_type`, `number_too_small`, `number_too_large`, `invalid_number_option` |
//! | `integer` | as `number` | as `number` |
//! | `string` | `regex`, `options`, `case_sensitive`, `min`, `max` | `invalid_type`, `no_match`, `invalid_string_option`, `string_too_short`, `string_too_long` |
//! | `boolean` | none | `invalid_type` |
//! | `any` | none | none |
//! | `custom` | a function | whatever the function emits |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use okay_validators::TypeSpec;
//!
//! let resolved = TypeSpec::number().min(0).max(5).resolve("score")?;
//! let message = resolved.validator.validate("score", &serde_json::json!(6))?;
//! ```

pub mod custom;
pub mod number;
pub mod params;
pub mod registry;
pub mod string;
pub mod structural;

pub use params::Params;
pub use registry::{IntoTypeSpec, ResolvedType, TypeSpec, TypeTag};
