//! String validator.
//!
//! Three constraint families can be configured: a `regex` (full-string
//! match), an `options` allow-list (optionally case-insensitive), and a
//! `min`/`max` length in characters. A string passes when any configured
//! family accepts it. With no family configured only the type is checked.

use regex::Regex;
use serde_json::{Map, Value};

use okay_contracts::{
    error::SchemaError,
    message::{kinds, Message},
    validator::TypeValidator,
};

use crate::params::{self, Params};

const STRING_PARAMS: [&str; 5] = ["regex", "options", "case_sensitive", "min", "max"];

#[derive(Debug)]
struct Pattern {
    source: String,
    anchored: Regex,
}

#[derive(Debug)]
struct Options {
    declared: Vec<Value>,
    normalized: Vec<String>,
    case_sensitive: bool,
}

impl Options {
    fn contains(&self, value: &str) -> bool {
        if self.case_sensitive {
            self.normalized.iter().any(|o| o == value)
        } else {
            let lowered = value.to_lowercase();
            self.normalized.iter().any(|o| *o == lowered)
        }
    }
}

#[derive(Debug, Default)]
pub struct StringValidator {
    pattern: Option<Pattern>,
    options: Option<Options>,
    min: Option<usize>,
    max: Option<usize>,
}

impl StringValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &STRING_PARAMS)?;

        let pattern = match params::string(field, params, "regex")? {
            None => None,
            Some(source) => {
                let anchored = Regex::new(&format!("^(?:{source})$"))
                    .map_err(|e| params::invalid(field, format!("invalid regex '{source}': {e}")))?;
                Some(Pattern { source, anchored })
            }
        };

        let case_sensitive = params::boolean(field, params, "case_sensitive")?.unwrap_or(true);
        let options = match params::list(field, params, "options")? {
            None => None,
            Some(items) => {
                let mut normalized = Vec::with_capacity(items.len());
                for item in items {
                    let Some(option) = item.as_str() else {
                        return Err(params::invalid(field, format!("string option {item} is not a string")));
                    };
                    normalized.push(if case_sensitive {
                        option.to_string()
                    } else {
                        option.to_lowercase()
                    });
                }
                Some(Options {
                    declared: items.clone(),
                    normalized,
                    case_sensitive,
                })
            }
        };

        Ok(Self {
            pattern,
            options,
            min: params::count(field, params, "min")?,
            max: params::count(field, params, "max")?,
        })
    }

    fn has_length(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn expected(&self) -> Value {
        let mut expected = Map::new();
        if let Some(pattern) = &self.pattern {
            expected.insert("regex".to_string(), Value::String(pattern.source.clone()));
        }
        if let Some(options) = &self.options {
            expected.insert("options".to_string(), Value::Array(options.declared.clone()));
        }
        if self.has_length() {
            expected.insert("min".to_string(), self.min.into());
            expected.insert("max".to_string(), self.max.into());
        }
        Value::Object(expected)
    }
}

impl TypeValidator for StringValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        let Some(s) = value.as_str() else {
            return Ok(Some(
                Message::new(kinds::INVALID_TYPE, field).with_expected("string"),
            ));
        };

        if self.pattern.is_none() && self.options.is_none() && !self.has_length() {
            return Ok(None);
        }

        let matches = self.pattern.as_ref().is_some_and(|p| p.anchored.is_match(s));
        let in_options = self.options.as_ref().is_some_and(|o| o.contains(s));
        let length = s.chars().count();
        let too_short = self.min.is_some_and(|min| length < min);
        let too_long = self.max.is_some_and(|max| length > max);
        let within_length = self.has_length() && !too_short && !too_long;

        if matches || in_options || within_length {
            return Ok(None);
        }

        let kind = if self.pattern.is_some() {
            kinds::NO_MATCH
        } else if self.options.is_some() {
            kinds::INVALID_STRING_OPTION
        } else if too_short {
            kinds::STRING_TOO_SHORT
        } else {
            kinds::STRING_TOO_LONG
        };

        Ok(Some(Message::new(kind, field).with_expected(self.expected())))
    }
}
