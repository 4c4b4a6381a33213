//! Number schema
//!
//! Accepts JSON numbers and numeric strings. Unlike strings, numbers treat
//! the empty string as absent.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::{
    AnySchema, CastError, Message, Messages, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors, param,
};
use crate::json::{is_blank, number_value, string_form};

static NUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+\-]?([0-9]*\.[0-9]+|[0-9]+)$").expect("numeric regex is valid")
});

fn decimal_places_message() -> Message {
    Message::template(|params| {
        match (param(params, "min"), param(params, "max")) {
            (Some(min), Some(max)) if min == max => format!("must have {min} decimal places"),
            (Some(min), Some(max)) => format!("must have between {min} and {max} decimal places"),
            (None, Some(max)) => format!("must have at most {max} decimal places"),
            _ => "must have a valid number of decimal places".to_string(),
        }
    })
}

/// Requires the value to be a number, or a string representing a number.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let schema = number().integer();
/// assert!(schema.validate(&json!("12")).is_valid());
/// assert!(schema.validate(&json!("")).is_valid());
/// assert_eq!(
///     schema.validate(&json!("not a number")),
///     vec![ValidationError::root("must be a number")]
/// );
/// assert_eq!(number().cast(&json!("5")).unwrap(), Some(5.0));
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    base: Schema,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberSchema {
    /// Creates a number schema.
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new()
            .with("type", "must be a number")
            .with("integer", "must be a whole number")
            .with("decimal_places", decimal_places_message());
        Self {
            base: Schema::typed(TypeTest::new(is_numeric), &messages),
        }
    }

    /// Requires the number not to have a fractional part.
    #[must_use]
    pub fn integer(&self) -> Self {
        self.add_test(
            |value, _| is_blank(value) || read_number(value).is_some_and(|n| n.fract() == 0.0),
            self.message("integer", &[]),
        )
    }

    /// Requires at most `max` decimal places.
    #[must_use]
    pub fn decimal_places(&self, max: usize) -> Self {
        let message = self.message("decimal_places", &[("max", max.to_string())]);
        self.add_test(
            move |value, _| {
                is_blank(value)
                    || string_form(value)
                        .and_then(|s| fraction_digits(&s))
                        .is_some_and(|(_, digits)| digits <= max)
            },
            message,
        )
    }

    /// Requires between `min` and `max` decimal places. A decimal point is
    /// mandatory.
    #[must_use]
    pub fn decimal_places_between(&self, min: usize, max: usize) -> Self {
        let message = self.message(
            "decimal_places",
            &[("min", min.to_string()), ("max", max.to_string())],
        );
        self.add_test(
            move |value, _| {
                is_blank(value)
                    || string_form(value)
                        .and_then(|s| fraction_digits(&s))
                        .is_some_and(|(point, digits)| point && (min..=max).contains(&digits))
            },
            message,
        )
    }

    /// Parses the value as a number. Null and the empty string cast to
    /// `None`.
    pub fn cast(&self, value: &Value) -> Result<Option<f64>, CastError> {
        if is_blank(value) {
            return Ok(None);
        }
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| CastError::conversion(s.clone(), e.to_string())),
            other => Err(CastError::mismatch("number", other)),
        }
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Null | Value::Number(_) => true,
        Value::String(s) => s.is_empty() || NUMERIC_REGEX.is_match(s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => false,
    }
}

fn read_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Splits an unsigned decimal literal into (has decimal point, number of
/// fraction digits). Returns `None` for anything that is not
/// `digits[.digits]`.
fn fraction_digits(s: &str) -> Option<(bool, usize)> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match fraction {
        None => Some((false, 0)),
        Some(f) if f.bytes().all(|b| b.is_ascii_digit()) => Some((true, f.len())),
        Some(_) => None,
    }
}

impl SchemaBuilder for NumberSchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for NumberSchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        Ok(self.cast(value)?.map_or(Value::Null, number_value))
    }
}
