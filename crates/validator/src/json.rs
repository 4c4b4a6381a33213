//! Helpers for reading `serde_json::Value` input the way form data is read.
//!
//! Input arrives untyped, so leaf schemas need a shared vocabulary for
//! "absent", "string form" and "loosely equal". These helpers keep those
//! rules in one place.
//!
//! # Examples
//!
//! ```
//! use tessel_validator::json::{is_blank, loosely_equal, string_form};
//! use serde_json::json;
//!
//! assert!(is_blank(&json!("")));
//! assert!(loosely_equal(&json!("5"), &json!(5)));
//! assert_eq!(string_form(&json!(5.0)).as_deref(), Some("5"));
//! ```

use serde_json::Value;

/// Shared `null` used as the model of a root context and as the value of
/// missing keys.
pub(crate) static NULL: Value = Value::Null;

/// Returns true for `null`.
#[must_use]
pub fn is_absent(value: &Value) -> bool {
    value.is_null()
}

/// Returns true for `null` and the empty string.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Name of the JSON kind of `value`, for error messages.
#[must_use]
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the string form of a scalar value.
///
/// Integral floats print without a fractional part (`5.0` becomes `"5"`).
/// `null`, arrays and objects have no string form.
#[must_use]
pub fn string_form(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Formats a float without a trailing `.0` when it is integral.
#[must_use]
pub fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Converts an `f64` into a JSON number, preferring an integer
/// representation when the value is integral.
///
/// Non-finite values have no JSON representation and become `null`.
#[must_use]
pub fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

/// Numeric reading of a scalar, as loose equality performs it.
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse().ok()
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose equality over JSON values.
///
/// Scalars of different kinds compare by their numeric reading (`"5" == 5`,
/// `true == 1`); `null` equals only `null`; arrays and objects compare
/// structurally.
#[must_use]
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => a == b,
        _ => matches!((to_number(a), to_number(b)), (Some(x), Some(y)) if x == y),
    }
}
