//! Per-document index of values by path template.
//!
//! The indexer walks a document guided by the paths a schema knows. Every
//! value found at a known template is recorded with its concrete location;
//! the shallowest key the schema does not know is recorded as extra and not
//! descended into.

use std::collections::{HashMap, HashSet};

use okay_contracts::value::ParentKind;
use serde_json::{Map, Value};

use crate::path;
use crate::schema::Schema;

/// The set of path templates the indexer follows.
pub trait KnownPaths {
    fn knows(&self, path: &str) -> bool;
}

impl KnownPaths for Schema {
    fn knows(&self, path: &str) -> bool {
        self.contains(path)
    }
}

impl KnownPaths for HashSet<String> {
    fn knows(&self, path: &str) -> bool {
        self.contains(path)
    }
}

impl KnownPaths for [&str] {
    fn knows(&self, path: &str) -> bool {
        self.iter().any(|known| *known == path)
    }
}

impl<const N: usize> KnownPaths for [&str; N] {
    fn knows(&self, path: &str) -> bool {
        self.as_slice().knows(path)
    }
}

/// One occurrence of a template in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<'d> {
    /// Concrete path, e.g. `ratings[1].score`.
    pub path: String,
    pub value: &'d Value,
    /// `None` only for the document root.
    pub parent_kind: Option<ParentKind>,
}

/// Values of one document grouped by template, plus uncovered paths.
///
/// Borrows from the document it was built from and lives only for the
/// duration of one validation.
#[derive(Debug, Default)]
pub struct Index<'d> {
    fields: HashMap<String, Vec<IndexEntry<'d>>>,
    extra_fields: Vec<String>,
}

impl<'d> Index<'d> {
    /// Entries for `template` in document order. Empty if none were found.
    pub fn entries(&self, template: &str) -> &[IndexEntry<'d>] {
        self.fields.get(template).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if the template was reached during indexing, even with no entries.
    pub fn contains(&self, template: &str) -> bool {
        self.fields.contains_key(template)
    }

    /// Concrete paths of keys the schema does not know, in document order.
    pub fn extra_fields(&self) -> &[String] {
        &self.extra_fields
    }

    fn push(&mut self, template: &str, entry: IndexEntry<'d>) {
        self.fields.entry(template.to_string()).or_default().push(entry);
    }
}

/// Build the index of `document` against `known` templates.
pub fn create_index<'d, K>(document: &'d Value, known: &K) -> Index<'d>
where
    K: KnownPaths + ?Sized,
{
    let mut index = Index::default();

    if known.knows(path::ROOT) {
        index.push(
            path::ROOT,
            IndexEntry {
                path: path::ROOT.to_string(),
                value: document,
                parent_kind: None,
            },
        );
    }
    if let Value::Object(members) = document {
        index_object(&mut index, members, known, path::ROOT, path::ROOT);
    }

    index
}

fn index_object<'d, K>(
    index: &mut Index<'d>,
    members: &'d Map<String, Value>,
    known: &K,
    template: &str,
    concrete: &str,
) where
    K: KnownPaths + ?Sized,
{
    for (key, value) in members {
        let child_template = path::child_path(template, key);
        let child_concrete = path::child_path(concrete, key);

        if !known.knows(&child_template) {
            index.extra_fields.push(child_concrete);
            continue;
        }

        index.push(
            &child_template,
            IndexEntry {
                path: child_concrete.clone(),
                value,
                parent_kind: Some(ParentKind::Object),
            },
        );
        descend(index, value, known, &child_template, &child_concrete);
    }
}

fn index_list<'d, K>(
    index: &mut Index<'d>,
    items: &'d [Value],
    known: &K,
    template: &str,
    concrete: &str,
) where
    K: KnownPaths + ?Sized,
{
    let element_template = path::element_path(template);
    if !known.knows(&element_template) {
        return;
    }

    index.fields.entry(element_template.clone()).or_default();
    for (position, item) in items.iter().enumerate() {
        let element_concrete = path::concrete_element(concrete, position);
        index.push(
            &element_template,
            IndexEntry {
                path: element_concrete.clone(),
                value: item,
                parent_kind: Some(ParentKind::List),
            },
        );
        descend(index, item, known, &element_template, &element_concrete);
    }
}

/// Recurse into `value` by its actual shape, not its declared type.
///
/// An object found where a list was declared is still walked as an object,
/// so its keys surface as extra fields next to the container's own
/// `invalid_type`. A list found where an object was declared reaches the
/// element template only if the schema knows one.
fn descend<'d, K>(index: &mut Index<'d>, value: &'d Value, known: &K, template: &str, concrete: &str)
where
    K: KnownPaths + ?Sized,
{
    match value {
        Value::Object(members) => index_object(index, members, known, template, concrete),
        Value::Array(items) => index_list(index, items, known, template, concrete),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths<'a>(index: &'a Index<'_>, template: &str) -> Vec<&'a str> {
        index
            .entries(template)
            .iter()
            .map(|entry| entry.path.as_str())
            .collect()
    }

    // ── Coverage ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_document_and_schema() {
        let document = json!({});
        let known: [&str; 0] = [];
        let index = create_index(&document, &known);
        assert!(!index.contains("."));
        assert!(index.entries(".").is_empty());
        assert!(index.extra_fields().is_empty());
    }

    #[test]
    fn test_root_entry_when_known() {
        let document = json!({ "name": "Heartbreak Hotel" });
        let index = create_index(&document, &[".", "name"]);

        let root = &index.entries(".")[0];
        assert_eq!(root.path, ".");
        assert_eq!(root.value, &document);
        assert_eq!(root.parent_kind, None);
    }

    #[test]
    fn test_top_level_field() {
        let document = json!({ "name": "Heartbreak Hotel" });
        let index = create_index(&document, &["name"]);

        let entries = index.entries("name");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "name");
        assert_eq!(entries[0].value, &json!("Heartbreak Hotel"));
        assert_eq!(entries[0].parent_kind, Some(ParentKind::Object));
    }

    #[test]
    fn test_nested_fields() {
        let document = json!({ "accommodation": { "geo": { "longitude": 0 } } });
        let index = create_index(
            &document,
            &["accommodation", "accommodation.geo", "accommodation.geo.longitude"],
        );

        assert_eq!(paths(&index, "accommodation.geo.longitude"), vec!["accommodation.geo.longitude"]);
        assert_eq!(
            index.entries("accommodation.geo")[0].value,
            &json!({ "longitude": 0 })
        );
    }

    #[test]
    fn test_unknown_parent_hides_children() {
        let document = json!({ "accommodation": { "geo": { "latitude": 0 } } });
        let index = create_index(&document, &["accommodation.geo", "accommodation.geo.latitude"]);

        assert!(!index.contains("accommodation.geo"));
        assert!(!index.contains("accommodation.geo.latitude"));
        assert_eq!(index.extra_fields(), ["accommodation"]);
    }

    // ── Lists ────────────────────────────────────────────────────────

    #[test]
    fn test_list_of_scalars() {
        let document = json!({
            "accommodation": { "payment_methods": ["visa", "mastercard", "cash"] }
        });
        let index = create_index(
            &document,
            &[
                "accommodation",
                "accommodation.payment_methods",
                "accommodation.payment_methods[]",
            ],
        );

        let list = &index.entries("accommodation.payment_methods")[0];
        assert_eq!(list.parent_kind, Some(ParentKind::Object));

        let elements = index.entries("accommodation.payment_methods[]");
        assert_eq!(
            paths(&index, "accommodation.payment_methods[]"),
            vec![
                "accommodation.payment_methods[0]",
                "accommodation.payment_methods[1]",
                "accommodation.payment_methods[2]",
            ]
        );
        assert_eq!(elements[1].value, &json!("mastercard"));
        assert!(elements
            .iter()
            .all(|entry| entry.parent_kind == Some(ParentKind::List)));
    }

    #[test]
    fn test_list_of_objects() {
        let document = json!({
            "accommodation": {
                "ratings": [
                    { "score": 4.2 },
                    { "aspect": "staff", "score": 3.9 }
                ]
            }
        });
        let index = create_index(
            &document,
            &[
                "accommodation",
                "accommodation.ratings",
                "accommodation.ratings[]",
                "accommodation.ratings[].score",
                "accommodation.ratings[].aspect",
            ],
        );

        assert_eq!(
            paths(&index, "accommodation.ratings[].score"),
            vec!["accommodation.ratings[0].score", "accommodation.ratings[1].score"]
        );
        let aspects = index.entries("accommodation.ratings[].aspect");
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].path, "accommodation.ratings[1].aspect");
        assert_eq!(aspects[0].value, &json!("staff"));
        assert_eq!(aspects[0].parent_kind, Some(ParentKind::Object));
    }

    #[test]
    fn test_list_elements_not_in_schema() {
        let document = json!({ "ratings": [{ "aspect": "general", "score": 4.3 }] });
        let index = create_index(&document, &["ratings", "ratings[].aspect", "ratings[].score"]);

        assert!(!index.contains("ratings[]"));
        assert!(!index.contains("ratings[].aspect"));
        assert!(index.extra_fields().is_empty());
    }

    #[test]
    fn test_nested_list() {
        let document = json!({ "matrix": [[1, 2, 3], [4, 5]] });
        let index = create_index(&document, &["matrix", "matrix[]", "matrix[][]"]);

        assert_eq!(paths(&index, "matrix[]"), vec!["matrix[0]", "matrix[1]"]);
        assert_eq!(
            paths(&index, "matrix[][]"),
            vec!["matrix[0][0]", "matrix[0][1]", "matrix[0][2]", "matrix[1][0]", "matrix[1][1]"]
        );
        assert_eq!(index.entries("matrix[][]")[3].value, &json!(4));
    }

    #[test]
    fn test_nested_list_skipped_when_inner_template_unknown() {
        let document = json!({ "matrix": [[1, 2, 3], [9, 8, 7]] });
        let index = create_index(&document, &["matrix", "matrix[][]"]);
        assert!(!index.contains("matrix[][]"));
    }

    #[test]
    fn test_empty_list_reaches_element_template() {
        let document = json!({ "tags": [] });
        let index = create_index(&document, &["tags", "tags[]"]);
        assert!(index.contains("tags[]"));
        assert!(index.entries("tags[]").is_empty());
    }

    #[test]
    fn test_wrongly_shaped_container_is_walked_by_shape() {
        let document = json!({ "r": { "k": "v" } });
        let index = create_index(&document, &["r", "r[]"]);

        assert_eq!(paths(&index, "r"), vec!["r"]);
        assert!(!index.contains("r[]"));
        assert_eq!(index.extra_fields(), ["r.k"]);
    }

    // ── Extra fields ─────────────────────────────────────────────────

    #[test]
    fn test_extra_top_level_field() {
        let document = json!({ "accommodation": { "name": "Heartbreak Hotel" } });
        let known: [&str; 0] = [];
        let index = create_index(&document, &known);
        assert_eq!(index.extra_fields(), ["accommodation"]);
    }

    #[test]
    fn test_extra_nested_field_uses_concrete_path() {
        let document = json!({
            "accommodation": { "name": "Heartbreak Hotel" },
            "ratings": [{ "score": 4.0, "source": "web" }]
        });
        let index = create_index(
            &document,
            &["accommodation", "ratings", "ratings[]", "ratings[].score"],
        );
        assert_eq!(
            index.extra_fields(),
            ["accommodation.name", "ratings[0].source"]
        );
    }

    #[test]
    fn test_schema_as_known_paths() {
        let schema = Schema::compile(|s| {
            s.required("ratings[].score", "number")?;
            Ok(())
        })
        .unwrap();
        let document = json!({ "ratings": [{ "score": 4.0 }] });
        let index = create_index(&document, &schema);

        assert_eq!(index.entries(".").len(), 1);
        assert_eq!(paths(&index, "ratings[].score"), vec!["ratings[0].score"]);
    }
}
