//! Boolean schema

use serde_json::Value;

use crate::foundation::{
    AnySchema, CastError, Messages, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors,
};

/// Requires the value to be a boolean, `"true"` or `"false"`.
///
/// Null and the empty string pass.
#[derive(Debug, Clone)]
pub struct BooleanSchema {
    base: Schema,
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanSchema {
    /// Creates a boolean schema.
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new().with("type", "must be a boolean");
        Self {
            base: Schema::typed(
                TypeTest::new(|v| match v {
                    Value::Null | Value::Bool(_) => true,
                    Value::String(s) => matches!(s.as_str(), "" | "true" | "false"),
                    _ => false,
                }),
                &messages,
            ),
        }
    }

    /// `true` and `"true"` cast to `true`, null to `None`, anything else to
    /// `false`.
    pub fn cast(&self, value: &Value) -> Result<Option<bool>, CastError> {
        Ok(match value {
            Value::Null => None,
            Value::Bool(b) => Some(*b),
            Value::String(s) => Some(s == "true"),
            _ => Some(false),
        })
    }
}

impl SchemaBuilder for BooleanSchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for BooleanSchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        Ok(self.cast(value)?.map_or(Value::Null, Value::Bool))
    }
}
