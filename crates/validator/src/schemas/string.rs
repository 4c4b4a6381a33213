//! String schema
//!
//! Accepts strings and any scalar with a string form (numbers, booleans);
//! arrays and objects are rejected. Content rules skip absent values, except
//! `min`/`max`, which only skip null: an empty string is zero characters
//! long.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::{
    AnySchema, CastError, Messages, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors,
};
use crate::json::{is_blank, string_form};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'’*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("email regex is valid")
});

/// Requires the value to be a string, or a scalar with a string form.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let schema = string().email();
/// assert!(schema.validate(&json!("")).is_valid());
/// assert!(schema.validate(&json!("test+123@example.com")).is_valid());
/// assert_eq!(
///     schema.validate(&json!("fish and chips")),
///     vec![ValidationError::root("must be an email address")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StringSchema {
    base: Schema,
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl StringSchema {
    /// Creates a string schema.
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new()
            .with("type", "must be a string")
            .with("regex", "must match regex {regex}")
            .with("email", "must be an email address")
            .with("min", "must be at least {length} characters")
            .with("max", "must be at most {length} characters");
        Self {
            base: Schema::typed(
                TypeTest::new(|v| v.is_null() || string_form(v).is_some()),
                &messages,
            ),
        }
    }

    /// Requires the value to match `regex`.
    #[must_use]
    pub fn regex(&self, regex: Regex) -> Self {
        let message = self.message("regex", &[("regex", format!("/{}/", regex.as_str()))]);
        self.regex_with_message(regex, message)
    }

    /// Like [`regex`](Self::regex) with a custom message.
    #[must_use]
    pub fn regex_with_message(&self, regex: Regex, message: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        self.add_test(
            move |value, _| is_blank(value) || string_form(value).is_some_and(|s| regex.is_match(&s)),
            message,
        )
    }

    /// Requires the value to be an email address.
    #[must_use]
    pub fn email(&self) -> Self {
        let message = self.message("email", &[]);
        self.regex_with_message(EMAIL_REGEX.clone(), message)
    }

    /// Requires at least `length` characters.
    #[must_use]
    pub fn min(&self, length: usize) -> Self {
        self.add_test(
            move |value, _| value.is_null() || char_len(value).is_some_and(|n| n >= length),
            self.message("min", &[("length", length.to_string())]),
        )
    }

    /// Requires at most `length` characters.
    #[must_use]
    pub fn max(&self, length: usize) -> Self {
        self.add_test(
            move |value, _| value.is_null() || char_len(value).is_some_and(|n| n <= length),
            self.message("max", &[("length", length.to_string())]),
        )
    }

    /// Returns the string form of the value; null casts to `None`.
    pub fn cast(&self, value: &Value) -> Result<Option<String>, CastError> {
        if value.is_null() {
            return Ok(None);
        }
        string_form(value)
            .map(Some)
            .ok_or_else(|| CastError::mismatch("string", value))
    }
}

fn char_len(value: &Value) -> Option<usize> {
    string_form(value).map(|s| s.chars().count())
}

impl SchemaBuilder for StringSchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for StringSchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        Ok(self.cast(value)?.map_or(Value::Null, Value::String))
    }
}
