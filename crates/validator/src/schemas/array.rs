//! Array schema - validates every element of a JSON array

use std::sync::Arc;

use serde_json::Value;

use crate::foundation::{
    AnySchema, CastError, Messages, Rule, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors,
};
use crate::json::is_blank;

/// Requires a value to be an array (or null, or the empty string).
///
/// With an element schema, each element is validated at path `base.i`,
/// and errors are reported in index order.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let schema = array().of(number());
/// assert_eq!(
///     schema.validate(&json!([1, "2", false])),
///     vec![ValidationError::new("must be a number", Some("2"))]
/// );
/// ```
#[derive(Clone)]
pub struct ArraySchema {
    base: Schema,
    element: Option<Arc<dyn AnySchema>>,
    element_rule: Option<usize>,
}

impl Default for ArraySchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ArraySchema {
    /// Creates an array schema without an element schema.
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new().with("type", "must be an array");
        Self {
            base: Schema::typed(TypeTest::new(|v| is_blank(v) || v.is_array()), &messages),
            element: None,
            element_rule: None,
        }
    }

    /// Sets the schema every element must satisfy.
    #[must_use]
    pub fn of(&self, element: impl AnySchema + 'static) -> Self {
        self.of_shared(Arc::new(element))
    }

    /// Sets an already shared element schema.
    ///
    /// Setting it again replaces the previous element schema; the element
    /// rule keeps its position among the other rules.
    #[must_use]
    pub fn of_shared(&self, element: Arc<dyn AnySchema>) -> Self {
        self.derive(|schema| {
            let rule_element = Arc::clone(&element);
            let rule = Rule::new(move |value, context| {
                Ok(validate_elements(rule_element.as_ref(), value, context))
            });
            schema.element_rule = Some(schema.base.put_rule(schema.element_rule, rule));
            schema.element = Some(element);
        })
    }

    /// The element schema, if any.
    #[must_use]
    pub fn element(&self) -> Option<&Arc<dyn AnySchema>> {
        self.element.as_ref()
    }

    /// Casts every element with the element schema, preserving order and
    /// length.
    ///
    /// Without an element schema, or for null and empty-string input, the
    /// value is returned as is.
    pub fn cast(&self, value: &Value) -> Result<Value, CastError> {
        let Some(element) = &self.element else {
            return Ok(value.clone());
        };
        match value {
            v if is_blank(v) => Ok(v.clone()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| element.cast_value(item).map_err(|e| e.within(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(CastError::mismatch("array", other)),
        }
    }
}

fn validate_elements(element: &dyn AnySchema, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let Some(items) = value.as_array() else {
        return errors;
    };
    for (i, item) in items.iter().enumerate() {
        let child = context.descend(value, i);
        tracing::trace!(path = ?child.path(), "validating array element");
        errors.append(element.validate_in(item, &child));
    }
    errors
}

impl std::fmt::Debug for ArraySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySchema")
            .field("base", &self.base)
            .field("element", &self.element.as_ref().map(|_| "<schema>"))
            .finish()
    }
}

impl SchemaBuilder for ArraySchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for ArraySchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        self.cast(value)
    }
}
