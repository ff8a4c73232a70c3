//! Schema compiler.
//!
//! A schema is authored as a sequence of `required` / `optional` declarations
//! against a [`SchemaBuilder`]. Each declaration walks from the declared path
//! up to the root, creating every ancestor on the way and attaching the
//! structural rule that ancestor needs (an `object` rule for a parent of
//! `a.b`, a `list` rule for a parent of `a[]`). Conflicting declarations are
//! rejected as soon as they are seen.

use okay_contracts::error::SchemaError;
use okay_contracts::validator::TypeValidator;
use okay_validators::{IntoTypeSpec, TypeTag};
use tracing::debug;

use crate::path;
use crate::schema::{FieldDefinition, Rule, Schema, Strictness};

/// Collects declarations and produces a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `path` as present in every document whose ancestors are present.
    ///
    /// Pass `None` for an untyped declaration.
    pub fn required(
        &mut self,
        path: &str,
        type_spec: impl IntoTypeSpec,
    ) -> Result<&mut Self, SchemaError> {
        self.declare(path, type_spec, Strictness::Required)?;
        Ok(self)
    }

    /// Declare `path` as allowed but not expected. The root cannot be optional.
    pub fn optional(
        &mut self,
        path: &str,
        type_spec: impl IntoTypeSpec,
    ) -> Result<&mut Self, SchemaError> {
        if path::is_root(path.trim()) {
            return Err(SchemaError::OptionalNotAllowed {
                field: path::ROOT.to_string(),
            });
        }
        self.declare(path, type_spec, Strictness::Optional)?;
        Ok(self)
    }

    /// Stop reporting paths the schema does not know about.
    pub fn ignore_extra_fields(&mut self) -> &mut Self {
        self.schema.set_ignore_extra_fields(true);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }

    fn declare(
        &mut self,
        path: &str,
        type_spec: impl IntoTypeSpec,
        strictness: Strictness,
    ) -> Result<(), SchemaError> {
        let declared = path::normalize(path.trim());
        path::segments(declared)?;

        let resolved = type_spec.into_type_spec().resolve(declared)?;

        // A list declaration also fixes the strictness of its elements.
        if resolved.tag == TypeTag::List && !resolved.implicit {
            let elements = path::element_path(declared);
            let field = self.schema.entry(&elements);
            check_strictness(field, &elements, strictness)?;
            if field.strictness == Strictness::Unknown {
                field.strictness = strictness;
            }
        }

        let field = self.schema.entry(declared);
        check_strictness(field, declared, strictness)?;
        if !resolved.implicit {
            check_nullability(field, declared, resolved.nullable)?;
        }
        place_rule(
            field,
            Rule {
                tag: resolved.tag,
                nullable: resolved.nullable,
                implicit: resolved.implicit,
                validator: resolved.validator,
            },
        );
        field.nullable |= resolved.nullable;
        if field.strictness == Strictness::Unknown {
            field.strictness = strictness;
        }

        let mut current = parent_step(declared, strictness);
        while let Some((parent, tag, parent_strictness)) = current {
            let field = self.schema.entry(parent);
            check_strictness(field, parent, parent_strictness)?;
            if !field.has_rule_for(tag) {
                let validator: Box<dyn TypeValidator> = tag.build_default(parent)?;
                field.rules.push(Rule {
                    tag,
                    nullable: false,
                    implicit: true,
                    validator,
                });
            }
            if field.strictness == Strictness::Unknown {
                field.strictness = parent_strictness;
            }
            current = parent_step(parent, parent_strictness);
        }

        Ok(())
    }
}

impl Schema {
    /// Compile a schema from a declaration closure.
    ///
    /// ```
    /// use okay_core::Schema;
    ///
    /// let schema = Schema::compile(|s| {
    ///     s.required("accommodation.name", "string")?;
    ///     s.optional("accommodation.ratings[].score", "number")?;
    ///     Ok(())
    /// })
    /// .unwrap();
    ///
    /// assert!(schema.contains("accommodation.ratings[]"));
    /// ```
    pub fn compile<F>(definition: F) -> Result<Schema, SchemaError>
    where
        F: FnOnce(&mut SchemaBuilder) -> Result<(), SchemaError>,
    {
        let mut builder = SchemaBuilder::new();
        definition(&mut builder)?;
        let schema = builder.build();
        debug!(
            field_count = schema.len(),
            ignore_extra_fields = schema.ignores_extra_fields(),
            "schema compiled"
        );
        Ok(schema)
    }
}

/// The container one level up and the structural rule it implies.
///
/// Lists pass their strictness on to the container; object members leave
/// their parent `Unknown`; top-level keys make the root required.
fn parent_step(path: &str, strictness: Strictness) -> Option<(&str, TypeTag, Strictness)> {
    if path::is_root(path) {
        return None;
    }
    if let Some(container) = path.strip_suffix("[]") {
        return Some((container, TypeTag::List, strictness));
    }
    match path.rfind('.') {
        Some(dot) => Some((&path[..dot], TypeTag::Object, Strictness::Unknown)),
        None => Some((path::ROOT, TypeTag::Object, Strictness::Required)),
    }
}

fn place_rule(field: &mut FieldDefinition, rule: Rule) {
    if rule.implicit {
        if !field.has_rule_for(rule.tag) {
            field.rules.push(rule);
        }
        return;
    }
    if rule.tag.is_structural() {
        field.rules.retain(|existing| existing.tag != rule.tag);
    }
    field.rules.push(rule);
}

fn check_strictness(
    field: &FieldDefinition,
    path: &str,
    strictness: Strictness,
) -> Result<(), SchemaError> {
    let field_name = || path::strip_list_markers(path).to_string();
    match (field.strictness, strictness) {
        (Strictness::Required, Strictness::Optional) => Err(SchemaError::AlreadyRequired {
            field: field_name(),
        }),
        (Strictness::Optional, Strictness::Required) => Err(SchemaError::AlreadyOptional {
            field: field_name(),
        }),
        _ => Ok(()),
    }
}

fn check_nullability(
    field: &FieldDefinition,
    path: &str,
    nullable: bool,
) -> Result<(), SchemaError> {
    if !field.has_explicit_rule() || field.nullable == nullable {
        return Ok(());
    }
    let field_name = path::strip_list_markers(path).to_string();
    if nullable {
        Err(SchemaError::AlreadyNonNullable { field: field_name })
    } else {
        Err(SchemaError::AlreadyNullable { field: field_name })
    }
}
