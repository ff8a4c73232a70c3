//! Compiled-schema cache.
//!
//! `SchemaRegistry` maps a caller-chosen schema id to its compiled
//! [`Schema`]. A definition is compiled the first time its id is seen and
//! every later lookup returns the same `Arc<Schema>`. The lock is held across
//! the whole compile-or-fetch step, so one id is never compiled twice even
//! when several threads ask for it at once.
//!
//! A definition closure must not call back into the registry that is
//! compiling it; the lock is not re-entrant.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use okay_contracts::error::{OkayError, OkayResult, SchemaError};
use okay_contracts::message::{Message, MessageContext};
use serde_json::Value;
use tracing::{debug, info};

use crate::compiler::SchemaBuilder;
use crate::runner;
use crate::schema::Schema;

/// Thread-safe cache of compiled schemas keyed by id.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Mutex<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the schema cached under `id`, compiling `definition` if absent.
    ///
    /// A definition that fails to compile is not cached.
    pub fn get_or_compile<F>(&self, id: &str, definition: F) -> OkayResult<Arc<Schema>>
    where
        F: FnOnce(&mut SchemaBuilder) -> Result<(), SchemaError>,
    {
        let mut schemas = self.lock()?;
        if let Some(schema) = schemas.get(id) {
            debug!(schema_id = id, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(Schema::compile(definition)?);
        info!(
            schema_id = id,
            field_count = schema.len(),
            "schema compiled and cached"
        );
        schemas.insert(id.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Cache an already compiled schema under `id`, replacing any previous one.
    pub fn insert(&self, id: impl Into<String>, schema: Schema) -> OkayResult<Arc<Schema>> {
        let id = id.into();
        let schema = Arc::new(schema);
        info!(schema_id = %id, field_count = schema.len(), "schema registered");
        self.lock()?.insert(id, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, id: &str) -> OkayResult<Option<Arc<Schema>>> {
        Ok(self.lock()?.get(id).cloned())
    }

    pub fn len(&self) -> OkayResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Compile (or fetch) the schema for `id` and validate `document` with it.
    pub fn validate<F>(
        &self,
        id: &str,
        definition: F,
        document: &Value,
        context: Option<&MessageContext>,
    ) -> OkayResult<Vec<Message>>
    where
        F: FnOnce(&mut SchemaBuilder) -> Result<(), SchemaError>,
    {
        let schema = self.get_or_compile(id, definition)?;
        runner::validate(&schema, document, context)
    }

    fn lock(&self) -> OkayResult<MutexGuard<'_, HashMap<String, Arc<Schema>>>> {
        self.schemas.lock().map_err(|e| OkayError::RegistryPoisoned {
            reason: e.to_string(),
        })
    }
}
