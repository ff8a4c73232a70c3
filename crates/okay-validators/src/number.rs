//! Numeric validators: `number` and `integer`.
//!
//! A number passes when it is one of the configured `options`, or when it
//! lies within `[min, max]`. With `options` configured and no bounds, only
//! membership counts. Failures are tagged in a fixed order: too small, then
//! too large, then not an option.

use serde_json::{json, Map, Value};

use okay_contracts::{
    error::SchemaError,
    message::{kinds, Message},
    validator::TypeValidator,
};

use crate::params::{self, Bound, Params};

const NUMBER_PARAMS: [&str; 3] = ["min", "max", "options"];

/// Accepts any JSON number, subject to bounds and an allow-list.
#[derive(Debug, Default)]
pub struct NumberValidator {
    min: Option<Bound>,
    max: Option<Bound>,
    options: Option<Vec<Bound>>,
}

impl NumberValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        params::reject_unknown(field, params, &NUMBER_PARAMS)?;

        let options = match params::list(field, params, "options")? {
            None => None,
            Some(items) => Some(
                items
                    .iter()
                    .map(|item| {
                        item.as_f64()
                            .map(|limit| Bound { value: item.clone(), limit })
                            .ok_or_else(|| {
                                params::invalid(field, format!("number option {item} is not a number"))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(Self {
            min: params::bound(field, params, "min")?,
            max: params::bound(field, params, "max")?,
            options,
        })
    }

    fn options_value(&self) -> Option<Value> {
        self.options
            .as_ref()
            .map(|options| Value::Array(options.iter().map(|o| o.value.clone()).collect()))
    }

    fn bounds_expected(&self) -> Value {
        let mut expected = Map::new();
        expected.insert("min".to_string(), self.min.as_ref().map_or(Value::Null, |b| b.value.clone()));
        expected.insert("max".to_string(), self.max.as_ref().map_or(Value::Null, |b| b.value.clone()));
        if let Some(options) = self.options_value() {
            expected.insert("options".to_string(), options);
        }
        Value::Object(expected)
    }

    /// Range and option checks on an already type-checked number.
    pub(crate) fn check(&self, field: &str, n: f64) -> Option<Message> {
        let in_options = self
            .options
            .as_ref()
            .is_some_and(|options| options.iter().any(|o| o.limit == n));
        let too_small = self.min.as_ref().is_some_and(|min| n < min.limit);
        let too_large = self.max.as_ref().is_some_and(|max| n > max.limit);
        let has_bounds = self.min.is_some() || self.max.is_some();
        let within_bounds = !too_small && !too_large && (has_bounds || self.options.is_none());

        if in_options || within_bounds {
            return None;
        }

        let message = if too_small {
            Message::new(kinds::NUMBER_TOO_SMALL, field).with_expected(self.bounds_expected())
        } else if too_large {
            Message::new(kinds::NUMBER_TOO_LARGE, field).with_expected(self.bounds_expected())
        } else {
            Message::new(kinds::INVALID_NUMBER_OPTION, field)
                .with_expected(json!({ "options": self.options_value() }))
        };
        Some(message)
    }
}

impl TypeValidator for NumberValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        match value.as_f64() {
            Some(n) => Ok(self.check(field, n)),
            None => Ok(Some(
                Message::new(kinds::INVALID_TYPE, field).with_expected("number"),
            )),
        }
    }
}

/// Accepts integral numbers, including floats with no fractional part, then
/// applies the same range and option checks as [`NumberValidator`].
#[derive(Debug, Default)]
pub struct IntegerValidator {
    number: NumberValidator,
}

impl IntegerValidator {
    pub fn new(field: &str, params: &Params) -> Result<Self, SchemaError> {
        Ok(Self {
            number: NumberValidator::new(field, params)?,
        })
    }
}

fn integral(value: &Value) -> Option<f64> {
    if value.is_i64() || value.is_u64() {
        return value.as_f64();
    }
    value.as_f64().filter(|n| n.is_finite() && n.fract() == 0.0)
}

impl TypeValidator for IntegerValidator {
    fn validate(&self, field: &str, value: &Value) -> Result<Option<Message>, SchemaError> {
        match integral(value) {
            Some(n) => Ok(self.number.check(field, n)),
            None => Ok(Some(
                Message::new(kinds::INVALID_TYPE, field).with_expected("integer"),
            )),
        }
    }
}
