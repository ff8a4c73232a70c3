//! Field path grammar.
//!
//! A field path is a template addressing a class of locations in documents of
//! one shape: identifiers joined by `.`, where any identifier may be followed
//! by one or more `[]` markers meaning "every element of the sequence here".
//! `.` (or the empty string) is the document root.
//!
//! | template | matches |
//! |---|---|
//! | `accommodation.name` | `accommodation.name` |
//! | `ratings[]` | `ratings[0]`, `ratings[1]`, … |
//! | `ratings[].score` | `ratings[0].score`, `ratings[1].score`, … |
//! | `matrix[][]` | `matrix[0][0]`, `matrix[0][1]`, … |
//!
//! Concrete paths use the same syntax with literal indices. Everything here
//! is a pure function over strings.

use okay_contracts::error::SchemaError;

/// The root path.
pub const ROOT: &str = ".";

const LIST_MARKER: &str = "[]";

/// One parsed path segment: a key plus the number of `[]` markers after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'p> {
    pub key: &'p str,
    pub list_depth: usize,
}

/// True for `.` and the empty path.
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == ROOT
}

/// Map the empty path to `.`; every other path is returned unchanged.
pub fn normalize(path: &str) -> &str {
    if path.is_empty() {
        ROOT
    } else {
        path
    }
}

/// True iff `path` ends with a `[]` marker.
pub fn is_list_template(path: &str) -> bool {
    path.ends_with(LIST_MARKER)
}

/// The path one level up: `a.b[]` → `a.b`, `a.b` → `a`, `a` → `.`.
///
/// The root has no parent.
pub fn parent_of(path: &str) -> Option<&str> {
    split_last_segment(path).map(|(parent, _)| parent)
}

/// Split off the last step: `a.b[]` → (`a.b`, `[]`), `a.b` → (`a`, `b`),
/// `a` → (`.`, `a`). `None` for the root.
pub fn split_last_segment(path: &str) -> Option<(&str, &str)> {
    if is_root(path) {
        return None;
    }
    if let Some(container) = path.strip_suffix(LIST_MARKER) {
        return Some((normalize(container), LIST_MARKER));
    }
    match path.rfind('.') {
        Some(dot) => Some((&path[..dot], &path[dot + 1..])),
        None => Some((ROOT, path)),
    }
}

/// Append an object key to a template or concrete path.
pub fn child_path(parent: &str, key: &str) -> String {
    if is_root(parent) {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Concrete path of member `key` of the object found at concrete `parent`.
pub fn concrete_child(parent: &str, key: &str) -> String {
    child_path(parent, key)
}

/// The element template of a list template: `ratings` → `ratings[]`.
pub fn element_path(template: &str) -> String {
    format!("{template}{LIST_MARKER}")
}

/// The concrete path of element `index` of the sequence at `parent`.
pub fn concrete_element(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// `a.b[][]` → `a.b`. Used to name fields in schema errors.
pub fn strip_list_markers(path: &str) -> &str {
    let stripped = path.trim_end_matches(LIST_MARKER);
    normalize(stripped)
}

/// Parse and validate `path`. The root parses to no segments.
pub fn segments(path: &str) -> Result<Vec<Segment<'_>>, SchemaError> {
    if is_root(path) {
        return Ok(Vec::new());
    }

    let invalid = |reason: &str| SchemaError::InvalidPath {
        field: path.to_string(),
        reason: reason.to_string(),
    };

    path.split('.')
        .map(|raw| {
            let mut key = raw;
            let mut list_depth = 0;
            while let Some(rest) = key.strip_suffix(LIST_MARKER) {
                key = rest;
                list_depth += 1;
            }
            if key.is_empty() {
                return Err(invalid("empty segment"));
            }
            if key.contains('[') || key.contains(']') {
                return Err(invalid("brackets may only appear as '[]' after a key"));
            }
            Ok(Segment { key, list_depth })
        })
        .collect()
}
