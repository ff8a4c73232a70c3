//! Compiled schema representation.

use std::collections::HashMap;
use std::fmt;

use okay_contracts::validator::TypeValidator;
use okay_validators::TypeTag;

/// Whether a path must be present in every document.
///
/// `Unknown` is the strictness of object ancestors that were only created
/// implicitly; such paths are never reported missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Unknown,
    Required,
    Optional,
}

impl Strictness {
    pub fn as_str(self) -> &'static str {
        match self {
            Strictness::Unknown => "unknown",
            Strictness::Required => "required",
            Strictness::Optional => "optional",
        }
    }
}

/// One validator attached to a field.
pub struct Rule {
    pub tag: TypeTag,
    pub nullable: bool,
    /// True if the compiler added this rule rather than the schema author.
    pub implicit: bool,
    pub validator: Box<dyn TypeValidator>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("tag", &self.tag)
            .field("nullable", &self.nullable)
            .field("implicit", &self.implicit)
            .finish_non_exhaustive()
    }
}

/// Everything the schema knows about one path template.
#[derive(Debug, Default)]
pub struct FieldDefinition {
    pub strictness: Strictness,
    pub nullable: bool,
    pub rules: Vec<Rule>,
}

impl FieldDefinition {
    pub fn has_explicit_rule(&self) -> bool {
        self.rules.iter().any(|rule| !rule.implicit)
    }

    pub fn has_rule_for(&self, tag: TypeTag) -> bool {
        self.rules.iter().any(|rule| rule.tag == tag)
    }

    /// Tags of the attached rules, in evaluation order.
    pub fn tags(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.rules.iter().map(|rule| rule.tag)
    }
}

/// A compiled schema: path templates mapped to their definitions.
///
/// Schemas are immutable once compiled and are shared between threads behind
/// an `Arc`. Paths iterate in the order they were first declared, which is
/// also the order in which the runner reports findings.
#[derive(Debug, Default)]
pub struct Schema {
    fields: HashMap<String, FieldDefinition>,
    order: Vec<String>,
    ignore_extra_fields: bool,
}

impl Schema {
    pub fn field(&self, path: &str) -> Option<&FieldDefinition> {
        self.fields.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// All `(path, definition)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.order
            .iter()
            .filter_map(|path| self.fields.get(path).map(|field| (path.as_str(), field)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn ignores_extra_fields(&self) -> bool {
        self.ignore_extra_fields
    }

    pub(crate) fn set_ignore_extra_fields(&mut self, ignore: bool) {
        self.ignore_extra_fields = ignore;
    }

    pub(crate) fn entry(&mut self, path: &str) -> &mut FieldDefinition {
        if !self.fields.contains_key(path) {
            self.order.push(path.to_string());
        }
        self.fields.entry(path.to_string()).or_default()
    }
}
