//! # okay-config
//!
//! TOML-declared schemas for the okay validation engine.
//!
//! A schema file lists `[[fields]]` declarations that are applied in order
//! through the same compiler as hand-written `required` / `optional` calls.
//! Custom validators cannot be written in TOML, so they are registered in
//! code under a name and referenced from the file:
//!
//! ```rust,ignore
//! use std::path::Path;
//! use okay_config::{CustomValidators, SchemaFile};
//!
//! let mut custom = CustomValidators::new();
//! custom.register("hotel_id", |field, value, params| Ok(None));
//!
//! let schema = SchemaFile::from_file(Path::new("schemas/hotel.toml"))?.compile(&custom)?;
//! ```

pub mod file;
pub mod loader;

pub use file::{FieldDecl, Presence, SchemaFile};
pub use loader::CustomValidators;
