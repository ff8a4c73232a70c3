//! The closed table of supported types.
//!
//! A declaration names its type as a string (`"number"`, `"string?"`) or
//! through the [`TypeSpec`] builder. Names resolve to a [`TypeTag`], and
//! every tag maps to exactly one validator constructor. There is no dynamic
//! lookup: an unknown name is a `SchemaError::UnknownType`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use okay_contracts::{
    error::{BoxError, SchemaError},
    message::Message,
    validator::{CustomFn, TypeValidator},
};

use crate::{
    custom::CustomValidator,
    number::{IntegerValidator, NumberValidator},
    params::Params,
    string::StringValidator,
    structural::{AnyValidator, BooleanValidator, ListValidator, ObjectValidator},
};

/// Every type the engine knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Any,
    Object,
    List,
    Number,
    Integer,
    String,
    Boolean,
    Custom,
}

/// Accepted type names. `int` and `bool` are aliases.
const TYPE_NAMES: [(&str, TypeTag); 10] = [
    ("any", TypeTag::Any),
    ("object", TypeTag::Object),
    ("list", TypeTag::List),
    ("number", TypeTag::Number),
    ("integer", TypeTag::Integer),
    ("int", TypeTag::Integer),
    ("string", TypeTag::String),
    ("boolean", TypeTag::Boolean),
    ("bool", TypeTag::Boolean),
    ("custom", TypeTag::Custom),
];

impl TypeTag {
    /// Resolve a type name (without the nullable `?` suffix).
    pub fn from_name(name: &str) -> Option<Self> {
        TYPE_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, tag)| *tag)
    }

    /// The canonical name of this tag.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::Object => "object",
            TypeTag::List => "list",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Custom => "custom",
        }
    }

    /// True for the container tags the compiler infers on ancestors.
    pub fn is_structural(self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::List)
    }

    /// Construct the validator for this tag from its parameters.
    fn build(
        self,
        field: &str,
        params: &Params,
        function: Option<&Arc<CustomFn>>,
    ) -> Result<Box<dyn TypeValidator>, SchemaError> {
        let validator: Box<dyn TypeValidator> = match self {
            TypeTag::Any => Box::new(AnyValidator::new(field, params)?),
            TypeTag::Object => Box::new(ObjectValidator::new(field, params)?),
            TypeTag::List => Box::new(ListValidator::new(field, params)?),
            TypeTag::Number => Box::new(NumberValidator::new(field, params)?),
            TypeTag::Integer => Box::new(IntegerValidator::new(field, params)?),
            TypeTag::String => Box::new(StringValidator::new(field, params)?),
            TypeTag::Boolean => Box::new(BooleanValidator::new(field, params)?),
            TypeTag::Custom => Box::new(CustomValidator::new(field, params, function)?),
        };
        Ok(validator)
    }

    /// Build a parameterless validator for this tag, as the compiler does for
    /// ancestors of a declared path.
    pub fn build_default(self, field: &str) -> Result<Box<dyn TypeValidator>, SchemaError> {
        self.build(field, &Params::new(), None)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The type part of a `required`/`optional` declaration.
///
/// Either untyped (the compiler records an implicit `any` rule) or a named
/// type with a nullable flag and parameters:
///
/// ```rust,ignore
/// TypeSpec::from("number?");
/// TypeSpec::number().min(0).max(5);
/// TypeSpec::string().options(["sqm", "sqft"]).case_sensitive(false);
/// TypeSpec::custom(|field, value, params| Ok(None));
/// ```
#[derive(Clone, Default)]
pub struct TypeSpec {
    name: Option<String>,
    nullable: bool,
    params: Params,
    function: Option<Arc<CustomFn>>,
}

/// A declaration's type after name resolution and validator construction.
pub struct ResolvedType {
    pub tag: TypeTag,
    pub nullable: bool,
    /// True when the declaration named no type.
    pub implicit: bool,
    pub validator: Box<dyn TypeValidator>,
}

impl TypeSpec {
    /// No type: the field only has to exist (if required).
    pub fn untyped() -> Self {
        Self::default()
    }

    /// A named type. A trailing `?` makes it nullable.
    pub fn named(name: &str) -> Self {
        let trimmed = name.trim();
        let (name, nullable) = match trimmed.strip_suffix('?') {
            Some(base) => (base.trim_end(), true),
            None => (trimmed, false),
        };
        Self {
            name: Some(name.to_string()),
            nullable,
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::named("any")
    }

    pub fn object() -> Self {
        Self::named("object")
    }

    pub fn list() -> Self {
        Self::named("list")
    }

    pub fn number() -> Self {
        Self::named("number")
    }

    pub fn integer() -> Self {
        Self::named("integer")
    }

    pub fn string() -> Self {
        Self::named("string")
    }

    pub fn boolean() -> Self {
        Self::named("boolean")
    }

    /// A `custom` type backed by `function`.
    pub fn custom<F>(function: F) -> Self
    where
        F: Fn(&str, &Value, &Params) -> Result<Option<Message>, BoxError> + Send + Sync + 'static,
    {
        Self::custom_shared(Arc::new(function))
    }

    /// A `custom` type backed by an already shared function.
    pub fn custom_shared(function: Arc<CustomFn>) -> Self {
        Self {
            function: Some(function),
            ..Self::named("custom")
        }
    }

    /// Attach the function a `custom` type calls, keeping name and nullability.
    pub fn with_function(mut self, function: Arc<CustomFn>) -> Self {
        self.function = Some(function);
        self
    }

    /// Allow the explicit null marker.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set an arbitrary validator parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merge a parameter map, e.g. one read from a schema file.
    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    pub fn min(self, min: impl Into<Value>) -> Self {
        self.param("min", min)
    }

    pub fn max(self, max: impl Into<Value>) -> Self {
        self.param("max", max)
    }

    pub fn regex(self, pattern: impl Into<String>) -> Self {
        self.param("regex", pattern.into())
    }

    pub fn options<I, V>(self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let options: Vec<Value> = options.into_iter().map(Into::into).collect();
        self.param("options", options)
    }

    pub fn case_sensitive(self, case_sensitive: bool) -> Self {
        self.param("case_sensitive", case_sensitive)
    }

    /// The declared type name, if any, without the `?` suffix.
    pub fn type_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Resolve the name and construct the validator for `field`.
    pub fn resolve(&self, field: &str) -> Result<ResolvedType, SchemaError> {
        let (tag, implicit) = match &self.name {
            None => (TypeTag::Any, true),
            Some(name) => match TypeTag::from_name(name) {
                Some(tag) => (tag, false),
                None => {
                    return Err(SchemaError::UnknownType {
                        field: field.to_string(),
                        type_name: name.clone(),
                    })
                }
            },
        };

        let validator = tag.build(field, &self.params, self.function.as_ref())?;

        Ok(ResolvedType {
            tag,
            nullable: self.nullable,
            implicit,
            validator,
        })
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("name", &self.name)
            .field("nullable", &self.nullable)
            .field("params", &self.params)
            .field("function", &self.function.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        Self::named(&name)
    }
}

/// Anything that can stand in the type position of a declaration.
///
/// Implemented for type names (`"number?"`), [`TypeSpec`] values, and
/// `Option<TypeSpec>` so that `None` means "no type".
pub trait IntoTypeSpec {
    fn into_type_spec(self) -> TypeSpec;
}

impl IntoTypeSpec for TypeSpec {
    fn into_type_spec(self) -> TypeSpec {
        self
    }
}

impl IntoTypeSpec for &str {
    fn into_type_spec(self) -> TypeSpec {
        TypeSpec::named(self)
    }
}

impl IntoTypeSpec for String {
    fn into_type_spec(self) -> TypeSpec {
        TypeSpec::named(&self)
    }
}

impl IntoTypeSpec for Option<TypeSpec> {
    fn into_type_spec(self) -> TypeSpec {
        self.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_names_resolve_to_tags() {
        assert_eq!(TypeTag::from_name("number"), Some(TypeTag::Number));
        assert_eq!(TypeTag::from_name("int"), Some(TypeTag::Integer));
        assert_eq!(TypeTag::from_name("bool"), Some(TypeTag::Boolean));
        assert_eq!(TypeTag::from_name("money"), None);
    }

    #[test]
    fn test_trailing_question_mark_is_nullable() {
        let spec = TypeSpec::from("number?");
        assert_eq!(spec.type_name(), Some("number"));
        assert!(spec.is_nullable());

        let spec = TypeSpec::from("object");
        assert!(!spec.is_nullable());
    }

    #[test]
    fn test_untyped_resolves_to_implicit_any() {
        let resolved = TypeSpec::untyped().resolve("metadata").unwrap();
        assert_eq!(resolved.tag, TypeTag::Any);
        assert!(resolved.implicit);
        assert!(!resolved.nullable);
    }

    #[test]
    fn test_explicit_any_is_not_implicit() {
        let resolved = TypeSpec::any().resolve("metadata").unwrap();
        assert_eq!(resolved.tag, TypeTag::Any);
        assert!(!resolved.implicit);
    }

    #[test]
    fn test_unknown_type_name() {
        let err = TypeSpec::from("money").resolve("price").err().unwrap();
        assert_eq!(err.kind(), "unknown_type");
        assert_eq!(err.field(), "price");
        assert!(err.to_string().contains("money"));
    }

    #[test]
    fn test_builder_parameters_reach_validator() {
        let resolved = TypeSpec::number().min(0).max(5).resolve("score").unwrap();

        assert!(resolved.validator.validate("score", &json!(5)).unwrap().is_none());
        let message = resolved.validator.validate("score", &json!(6)).unwrap().unwrap();
        assert_eq!(message.kind, "number_too_large");
        assert_eq!(message.expected, Some(json!({ "min": 0, "max": 5 })));
    }

    #[test]
    fn test_parameters_checked_against_type() {
        let err = TypeSpec::boolean().max(3).resolve("flag").err().unwrap();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_custom_without_function() {
        let err = TypeSpec::from("custom").resolve("id").err().unwrap();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_custom_with_function() {
        let spec = TypeSpec::custom(|field, value, _| {
            if value.as_str().is_some_and(|s| s.starts_with("H-")) {
                Ok(None)
            } else {
                Ok(Some(Message::new("invalid_hotel_id", field)))
            }
        });
        let resolved = spec.resolve("id").unwrap();

        assert_eq!(resolved.tag, TypeTag::Custom);
        assert!(resolved.validator.validate("id", &json!("H-12")).unwrap().is_none());
        assert_eq!(
            resolved.validator.validate("id", &json!("12")).unwrap().unwrap().kind,
            "invalid_hotel_id"
        );
    }
}
