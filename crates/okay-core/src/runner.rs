//! Validation runner.
//!
//! Runs a compiled [`Schema`] over one document and collects every finding.
//! Document problems never fail a run; only a non-object root or a failing
//! custom validator does.

use okay_contracts::error::{OkayError, OkayResult};
use okay_contracts::message::{kinds, Message, MessageContext};
use okay_contracts::value::{describe, ParentKind, ValueKind};
use serde_json::Value;
use tracing::debug;

use crate::index::{create_index, Index};
use crate::path;
use crate::schema::{Schema, Strictness};

/// Validate `document` against `schema`.
///
/// Messages come out in schema declaration order, then document order within
/// each path: rule findings first, then missing fields, then extra fields.
/// Every key of `context` is merged into every message.
pub fn validate(
    schema: &Schema,
    document: &Value,
    context: Option<&MessageContext>,
) -> OkayResult<Vec<Message>> {
    if ValueKind::of(document) != ValueKind::Object {
        return Err(OkayError::DocumentNotObject {
            found: describe(document).to_string(),
        });
    }

    let index = create_index(document, schema);
    let mut messages = Vec::new();

    check_values(schema, &index, &mut messages)?;
    report_missing(schema, &index, &mut messages);
    if !schema.ignores_extra_fields() {
        messages.extend(
            index
                .extra_fields()
                .iter()
                .map(|field| Message::new(kinds::EXTRA_FIELD, field.as_str())),
        );
    }

    if let Some(context) = context {
        for message in &mut messages {
            message.extend_context(context);
        }
    }

    debug!(message_count = messages.len(), "document validated");
    Ok(messages)
}

fn check_values(schema: &Schema, index: &Index<'_>, messages: &mut Vec<Message>) -> OkayResult<()> {
    for (template, field) in schema.fields() {
        for entry in index.entries(template) {
            if ValueKind::of(entry.value) == ValueKind::Null {
                if !field.nullable {
                    debug!(
                        field = %entry.path,
                        element = entry.parent_kind == Some(ParentKind::List),
                        "null value"
                    );
                    messages.push(Message::new(kinds::NULL_VALUE, entry.path.as_str()));
                }
                continue;
            }
            for rule in &field.rules {
                if let Some(message) = rule.validator.validate(&entry.path, entry.value)? {
                    messages.push(message);
                }
            }
        }
    }
    Ok(())
}

/// Required object members absent from a parent that is present and is an
/// object. A parent that is missing, null, or of the wrong type has already
/// been reported (or allowed), so its children stay silent.
fn report_missing(schema: &Schema, index: &Index<'_>, messages: &mut Vec<Message>) {
    for (template, field) in schema.fields() {
        if field.strictness != Strictness::Required || path::is_list_template(template) {
            continue;
        }
        let Some((parent, key)) = path::split_last_segment(template) else {
            continue;
        };
        for parent_entry in index.entries(parent) {
            if let Value::Object(members) = parent_entry.value {
                if !members.contains_key(key) {
                    messages.push(Message::new(
                        kinds::MISSING_FIELD,
                        path::concrete_child(&parent_entry.path, key),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use okay_contracts::error::SchemaError;
    use okay_validators::TypeSpec;
    use serde_json::json;

    use super::*;
    use crate::compiler::SchemaBuilder;

    fn run<F>(definition: F, document: Value) -> Vec<Message>
    where
        F: FnOnce(&mut SchemaBuilder) -> Result<(), SchemaError>,
    {
        let schema = Schema::compile(definition).unwrap();
        validate(&schema, &document, None).unwrap()
    }

    fn summary(messages: &[Message]) -> Vec<(&str, &str)> {
        messages
            .iter()
            .map(|m| (m.kind.as_str(), m.field.as_str()))
            .collect()
    }

    // ── Rules ────────────────────────────────────────────────────────

    /// Every element is checked and each failure names its own index.
    #[test]
    fn test_list_element_findings() {
        let messages = run(
            |s| {
                s.required("accommodation.ratings[].score", TypeSpec::number().max(5))?;
                Ok(())
            },
            json!({ "accommodation": { "ratings": [{ "score": 3 }, { "score": "x" }, { "score": 6 }] } }),
        );
        assert_eq!(
            summary(&messages),
            vec![
                ("invalid_type", "accommodation.ratings[1].score"),
                ("number_too_large", "accommodation.ratings[2].score"),
            ]
        );
        assert_eq!(messages[0].expected, Some(json!("number")));
    }

    #[test]
    fn test_valid_document_has_no_messages() {
        let messages = run(
            |s| {
                s.required("name", "string")?;
                s.optional("stars", TypeSpec::integer().min(1).max(5))?;
                Ok(())
            },
            json!({ "name": "Heartbreak Hotel", "stars": 4 }),
        );
        assert!(messages.is_empty());
    }

    /// Each nesting level is checked on its own: a scalar where an inner
    /// list belongs is the outer element's problem, not its contents'.
    #[test]
    fn test_nested_list_findings() {
        let messages = run(
            |s| {
                s.required("m[][]", "number")?;
                Ok(())
            },
            json!({ "m": [[1, "x"], 3, [null]] }),
        );
        assert_eq!(
            summary(&messages),
            vec![
                ("invalid_type", "m[0][1]"),
                ("null_value", "m[2][0]"),
                ("invalid_type", "m[1]"),
            ]
        );
        assert_eq!(messages[0].expected, Some(json!("number")));
        assert_eq!(messages[2].expected, Some(json!("list")));
    }

    #[test]
    fn test_heterogeneous_list() {
        let messages = run(
            |s| {
                s.required("ratings[].score", "number")?;
                Ok(())
            },
            json!({ "ratings": [{ "score": 4 }, "good", [5], null, { "score": "high" }] }),
        );
        assert_eq!(
            summary(&messages),
            vec![
                ("invalid_type", "ratings[4].score"),
                ("invalid_type", "ratings[1]"),
                ("invalid_type", "ratings[2]"),
                ("null_value", "ratings[3]"),
            ]
        );
        assert_eq!(messages[1].expected, Some(json!("object")));
    }

    /// An object where a list was declared is reported once for its type,
    /// and its keys still surface as extra fields.
    #[test]
    fn test_object_in_place_of_list() {
        let messages = run(
            |s| {
                s.required("r", "list")?;
                Ok(())
            },
            json!({ "r": { "k": "v" } }),
        );
        assert_eq!(
            summary(&messages),
            vec![("invalid_type", "r"), ("extra_field", "r.k")]
        );
        assert_eq!(messages[0].expected, Some(json!("list")));
    }

    // ── Nulls ────────────────────────────────────────────────────────

    #[test]
    fn test_nullable_elements() {
        let messages = run(
            |s| {
                s.required("values[]", "number?")?;
                Ok(())
            },
            json!({ "values": [null, null] }),
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_nullable_object() {
        let messages = run(
            |s| {
                s.optional("metadata", "object?")?;
                Ok(())
            },
            json!({ "metadata": null }),
        );
        assert!(messages.is_empty());

        let messages = run(
            |s| {
                s.optional("metadata", "object")?;
                Ok(())
            },
            json!({ "metadata": null }),
        );
        assert_eq!(summary(&messages), vec![("null_value", "metadata")]);
    }

    #[test]
    fn test_null_parent_silences_required_children() {
        let messages = run(
            |s| {
                s.optional("metadata", "object?")?;
                s.required("metadata.partner", "string")?;
                Ok(())
            },
            json!({ "metadata": null }),
        );
        assert!(messages.is_empty());
    }

    // ── Missing fields ───────────────────────────────────────────────

    #[test]
    fn test_missing_required_field() {
        let messages = run(
            |s| {
                s.required("accommodation.name", "string")?;
                s.optional("accommodation.stars", "integer")?;
                Ok(())
            },
            json!({ "accommodation": {} }),
        );
        assert_eq!(summary(&messages), vec![("missing_field", "accommodation.name")]);
    }

    #[test]
    fn test_missing_ancestor_reports_only_itself() {
        let messages = run(
            |s| {
                s.required("accommodation", "object")?;
                s.required("accommodation.name", "string")?;
                s.required("accommodation.geo.lat", "number")?;
                Ok(())
            },
            json!({}),
        );
        assert_eq!(summary(&messages), vec![("missing_field", "accommodation")]);
    }

    #[test]
    fn test_implicit_ancestor_is_never_missing() {
        let messages = run(
            |s| {
                s.required("accommodation.name", "string")?;
                Ok(())
            },
            json!({}),
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_wrongly_typed_parent_reported_once() {
        let messages = run(
            |s| {
                s.required("accommodation.name", "string")?;
                s.required("accommodation.stars", "integer")?;
                Ok(())
            },
            json!({ "accommodation": "Heartbreak Hotel" }),
        );
        assert_eq!(summary(&messages), vec![("invalid_type", "accommodation")]);
        assert_eq!(messages[0].expected, Some(json!("object")));
    }

    #[test]
    fn test_missing_field_in_list_elements() {
        let messages = run(
            |s| {
                s.required("ratings[].aspect", "string")?;
                s.required("ratings[].score", "number")?;
                Ok(())
            },
            json!({ "ratings": [{ "score": 4.2 }, { "aspect": "staff", "score": 3.9 }, 7] }),
        );
        assert_eq!(
            summary(&messages),
            vec![
                ("invalid_type", "ratings[2]"),
                ("missing_field", "ratings[0].aspect"),
            ]
        );
    }

    // ── Extra fields ─────────────────────────────────────────────────

    #[test]
    fn test_empty_schema_reports_every_key() {
        let messages = run(|_| Ok(()), json!({ "name": "x", "stars": 3, "geo": { "lat": 1 } }));
        assert_eq!(
            summary(&messages),
            vec![
                ("extra_field", "name"),
                ("extra_field", "stars"),
                ("extra_field", "geo"),
            ]
        );
    }

    #[test]
    fn test_ignore_extra_fields() {
        let messages = run(
            |s| {
                s.ignore_extra_fields();
                s.required("name", "string")?;
                Ok(())
            },
            json!({ "name": "x", "color": "blue" }),
        );
        assert!(messages.is_empty());
    }

    // ── Context and errors ───────────────────────────────────────────

    #[test]
    fn test_context_is_merged_into_every_message() {
        let schema = Schema::compile(|s| {
            s.required("name", "string")?;
            Ok(())
        })
        .unwrap();
        let mut context = MessageContext::new();
        context.insert("store".into(), json!("hotels.jsonl"));
        context.insert("document_number".into(), json!(7));

        let messages = validate(&schema, &json!({ "color": "blue" }), Some(&context)).unwrap();

        assert_eq!(messages.len(), 2);
        for message in &messages {
            assert_eq!(message.context.get("store"), Some(&json!("hotels.jsonl")));
            assert_eq!(message.context.get("document_number"), Some(&json!(7)));
        }
    }

    #[test]
    fn test_non_object_document_is_an_error() {
        let schema = Schema::compile(|_| Ok(())).unwrap();
        let err = validate(&schema, &json!([1, 2]), None).unwrap_err();
        assert!(matches!(err, OkayError::DocumentNotObject { ref found } if found == "list"));
    }

    #[test]
    fn test_custom_validator_failure_is_an_error() {
        let schema = Schema::compile(|s| {
            s.required(
                "id",
                TypeSpec::custom(|_, _, _| Err("lookup service unavailable".into())),
            )?;
            Ok(())
        })
        .unwrap();
        let err = validate(&schema, &json!({ "id": "H-1" }), None).unwrap_err();
        match err {
            OkayError::Schema(SchemaError::CustomValidator { field, source }) => {
                assert_eq!(field, "id");
                assert_eq!(source.to_string(), "lookup service unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = Schema::compile(|s| {
            s.required("accommodation.ratings[].score", TypeSpec::number().min(0).max(5))?;
            s.required("accommodation.name", "string")?;
            Ok(())
        })
        .unwrap();
        let document = json!({
            "accommodation": { "ratings": [{ "score": -1 }, {}, { "score": 9 }], "extra": true }
        });

        let first = validate(&schema, &document, None).unwrap();
        let second = validate(&schema, &document, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }
}
