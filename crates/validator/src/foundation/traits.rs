//! Core traits for the schema system
//!
//! - [`AnySchema`] is the object-safe capability set `{validate, cast}`.
//!   Composite schemas hold their children as `Arc<dyn AnySchema>`, so any
//!   type implementing it can be nested.
//! - [`SchemaBuilder`] is the fluent surface shared by every schema. Every
//!   method takes `&self` and returns a new schema; the receiver is never
//!   touched, so one base schema can be specialised into many variants.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::{
    CastError, Message, Messages, Rule, RuleFault, Schema, ValidationContext, ValidationErrors,
};
use crate::json::{NULL, is_blank, loosely_equal, string_form};

// ============================================================================
// ANY SCHEMA
// ============================================================================

/// What a composite needs from a child schema.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let children: Vec<Arc<dyn AnySchema>> = vec![Arc::new(string()), Arc::new(number())];
/// assert!(children.iter().all(|s| s.validate(&json!("5")).is_valid()));
/// ```
pub trait AnySchema: Send + Sync {
    /// Validates `value` inside `context`.
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors;

    /// Casts `value` into the schema's canonical JSON form.
    fn cast_value(&self, value: &Value) -> Result<Value, CastError>;

    /// Validates a top-level value.
    fn validate(&self, value: &Value) -> ValidationErrors {
        self.validate_in(value, &ValidationContext::root())
    }
}

impl AnySchema for Schema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        Schema::validate_in(self, value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        Ok(self.cast(value))
    }
}

// ============================================================================
// SCHEMA BUILDER
// ============================================================================

/// Fluent builder methods available on every schema.
///
/// Implementors expose their base [`Schema`]; everything else is provided.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let base = string();
/// let name = base.required();
/// let code = base.min(3);
///
/// // Branches never see each other's rules.
/// assert!(base.validate(&json!(null)).is_valid());
/// assert!(code.validate(&json!(null)).is_valid());
/// assert!(!name.validate(&json!(null)).is_valid());
/// ```
pub trait SchemaBuilder: Clone {
    /// The base schema.
    fn base(&self) -> &Schema;

    /// Mutable access to the base schema.
    fn base_mut(&mut self) -> &mut Schema;

    /// Clones `self` once and applies `mutate` to the clone.
    ///
    /// Several internal mutations can be batched into one call; only one copy
    /// is made.
    #[must_use]
    fn derive(&self, mutate: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        mutate(&mut next);
        next
    }

    /// Renders a message from this schema's table.
    fn message(&self, kind: &str, params: &[(&str, String)]) -> Cow<'static, str> {
        self.base().message_table().render(kind, params)
    }

    /// Adds a rule.
    #[must_use]
    fn add_rule<F>(&self, rule: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> Result<ValidationErrors, RuleFault>
            + Send
            + Sync
            + 'static,
    {
        self.derive(|schema| {
            schema.base_mut().push_rule(Rule::new(rule));
        })
    }

    /// Adds a rule from a boolean test; a false result reports `message` at
    /// the current path.
    #[must_use]
    fn add_test<F>(&self, test: F, message: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.add_rule(move |value, context| {
            Ok(ValidationErrors::from_test(
                test(value, context),
                [message.clone()],
                context.path(),
            ))
        })
    }

    /// Requires the value to be present: not null and not the empty string.
    #[must_use]
    fn required(&self) -> Self {
        self.add_test(|value, _| !is_blank(value), self.message("required", &[]))
    }

    /// Requires the value to be present whenever `condition` holds.
    #[must_use]
    fn required_when<C>(&self, condition: C) -> Self
    where
        C: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.add_test(
            move |value, context| !condition(value, context) || !is_blank(value),
            self.message("required", &[]),
        )
    }

    /// Requires the value to loosely equal the sibling at `key` in the
    /// context model.
    #[must_use]
    fn matches(&self, key: &str) -> Self {
        let message = self.message("matches", &[("key", key.to_string())]);
        self.matches_with_message(key, message)
    }

    /// Like [`matches`](Self::matches) with a custom message.
    #[must_use]
    fn matches_with_message(&self, key: &str, message: impl Into<Cow<'static, str>>) -> Self {
        let key = key.to_string();
        self.add_test(
            move |value, context| {
                context.model().is_object()
                    && loosely_equal(value, context.sibling(&key).unwrap_or(&NULL))
            },
            message,
        )
    }

    /// Requires the value to loosely equal one of `values`. Absent values
    /// pass.
    #[must_use]
    fn one_of<I>(&self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let listed = values
            .iter()
            .map(|v| string_form(v).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        let message = self.message("one_of", &[("values", listed)]);
        self.add_test(
            move |value, _| is_blank(value) || values.iter().any(|allowed| loosely_equal(value, allowed)),
            message,
        )
    }

    /// Merges `overrides` into the message table.
    ///
    /// Affects messages rendered by later builder calls and the type message
    /// read at validation time; rules already added keep their text.
    #[must_use]
    fn messages(&self, overrides: &Messages) -> Self {
        self.derive(|schema| {
            let merged = schema.base().message_table().clone().merged(overrides);
            *schema.base_mut().messages_mut() = merged;
        })
    }

    /// Sets a single message kind.
    #[must_use]
    fn message_for(&self, kind: &'static str, message: impl Into<Message>) -> Self {
        let message = message.into();
        self.derive(|schema| schema.base_mut().messages_mut().set(kind, message))
    }
}

impl SchemaBuilder for Schema {
    fn base(&self) -> &Schema {
        self
    }

    fn base_mut(&mut self) -> &mut Schema {
        self
    }
}
