//! Loading and compiling schema files.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use okay_contracts::{
    error::{BoxError, OkayError, OkayResult, SchemaError},
    message::Message,
    validator::CustomFn,
};
use okay_core::Schema;
use okay_validators::{Params, TypeSpec};
use serde_json::Value;
use tracing::debug;

use crate::file::{FieldDecl, Presence, SchemaFile};

/// Named custom validation functions that schema files refer to by name.
#[derive(Clone, Default)]
pub struct CustomValidators {
    functions: HashMap<String, Arc<CustomFn>>,
}

impl CustomValidators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&str, &Value, &Params) -> Result<Option<Message>, BoxError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<CustomFn>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl fmt::Debug for CustomValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CustomValidators").field("names", &names).finish()
    }
}

impl SchemaFile {
    /// Parse `s` as a TOML schema file.
    ///
    /// Returns `OkayError::ConfigError` if the TOML is malformed or does not
    /// match the expected layout.
    pub fn from_toml_str(s: &str) -> OkayResult<Self> {
        toml::from_str(s).map_err(|e| OkayError::ConfigError {
            reason: format!("failed to parse schema TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a TOML schema file.
    pub fn from_file(path: &Path) -> OkayResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| OkayError::ConfigError {
            reason: format!("failed to read schema file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply every declaration in file order and compile the result.
    pub fn compile(&self, custom: &CustomValidators) -> OkayResult<Schema> {
        let schema = Schema::compile(|s| {
            if self.ignore_extra_fields {
                s.ignore_extra_fields();
            }
            for decl in &self.fields {
                let spec = decl.type_spec(custom)?;
                match decl.presence {
                    Presence::Required => s.required(&decl.path, spec)?,
                    Presence::Optional => s.optional(&decl.path, spec)?,
                };
            }
            Ok(())
        })?;

        debug!(
            declarations = self.fields.len(),
            field_count = schema.len(),
            "schema file compiled"
        );
        Ok(schema)
    }
}

impl FieldDecl {
    /// The type part of this declaration, with any named validator attached.
    pub fn type_spec(&self, custom: &CustomValidators) -> Result<TypeSpec, SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidParameter {
            field: self.path.clone(),
            reason,
        };

        let mut spec = match self.type_name.as_deref() {
            Some(name) => TypeSpec::named(name),
            None => TypeSpec::untyped(),
        };

        if let Some(name) = &self.validator {
            if spec.type_name() != Some("custom") {
                return Err(invalid(format!(
                    "validator '{name}' requires type 'custom'"
                )));
            }
            let function = custom
                .get(name)
                .ok_or_else(|| invalid(format!("no custom validator registered as '{name}'")))?;
            spec = spec.with_function(function);
        }

        Ok(spec.params(self.params.clone()))
    }
}
