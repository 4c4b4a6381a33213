//! Object schema - validates a JSON object key by key
//!
//! Each declared key is validated with its own child schema. Children see a
//! context whose model is the whole object (so `matches` can compare
//! siblings) and whose path is the parent path extended by the key.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::foundation::{
    AnySchema, CastError, Messages, Rule, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors,
};
use crate::json::NULL;

// ============================================================================
// KEY VALIDATION
// ============================================================================

/// Child schemas by key, in declaration order.
///
/// The order decides both the order of reported errors and the key order of
/// `cast` output.
#[derive(Clone, Default)]
pub struct KeyValidation {
    keys: IndexMap<String, Arc<dyn AnySchema>>,
}

impl KeyValidation {
    /// Creates an empty key table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `key` with the given schema, replacing any earlier
    /// declaration of the same key.
    #[must_use = "builder methods must be chained or built"]
    pub fn key(mut self, key: impl Into<String>, schema: impl AnySchema + 'static) -> Self {
        self.insert(key, Arc::new(schema));
        self
    }

    /// Declares `key` with an already shared schema.
    pub fn insert(&mut self, key: impl Into<String>, schema: Arc<dyn AnySchema>) {
        self.keys.insert(key.into(), schema);
    }

    /// Returns the schema declared for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn AnySchema>> {
        self.keys.get(key)
    }

    /// Iterates over declared keys and their schemas in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn AnySchema>)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Declared key names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of declared keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Validates every declared key of `object` and concatenates the results.
    fn validate_keys(&self, object: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if object.is_null() {
            return errors;
        }
        for (key, schema) in &self.keys {
            let child = context.descend(object, key);
            tracing::trace!(path = ?child.path(), "validating object key");
            let value = object.get(key).unwrap_or(&NULL);
            errors.append(schema.validate_in(value, &child));
        }
        errors
    }
}

impl std::fmt::Debug for KeyValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys.keys()).finish()
    }
}

// ============================================================================
// OBJECT SCHEMA
// ============================================================================

/// Requires a value to be a plain JSON object (or null).
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let schema = object().keys(keys! {
///     "name" => string().required(),
///     "age" => number(),
/// });
///
/// assert!(schema.validate(&json!({"name": "Stewart", "age": 29})).is_valid());
/// assert_eq!(
///     schema.validate(&json!({"name": "", "age": "frobble"})),
///     vec![
///         ValidationError::new("required", Some("name")),
///         ValidationError::new("must be a number", Some("age")),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    base: Schema,
    keys: Option<KeyValidation>,
    key_rule: Option<usize>,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSchema {
    /// Creates an object schema with no declared keys.
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new().with("type", "must be a plain object");
        Self {
            base: Schema::typed(TypeTest::new(|v| v.is_null() || v.is_object()), &messages),
            keys: None,
            key_rule: None,
        }
    }

    /// Declares the child schema of each key.
    ///
    /// Declaring keys again replaces the previous declaration; the key rule
    /// keeps its position among the other rules.
    #[must_use]
    pub fn keys(&self, keys: KeyValidation) -> Self {
        self.derive(|schema| schema.install(keys))
    }

    /// Declares one more key, keeping the keys already declared.
    #[must_use]
    pub fn key(&self, key: impl Into<String>, child: impl AnySchema + 'static) -> Self {
        let keys = self.keys.clone().unwrap_or_default().key(key, child);
        self.keys(keys)
    }

    /// The declared keys, if any.
    #[must_use]
    pub fn key_validation(&self) -> Option<&KeyValidation> {
        self.keys.as_ref()
    }

    fn install(&mut self, keys: KeyValidation) {
        let rule_keys = keys.clone();
        let rule = Rule::new(move |value, context| Ok(rule_keys.validate_keys(value, context)));
        self.key_rule = Some(self.base.put_rule(self.key_rule, rule));
        self.keys = Some(keys);
    }

    /// Builds a new object holding exactly the declared keys, each cast by
    /// its child schema. Undeclared keys are dropped.
    ///
    /// Null input, or a schema without declared keys, returns the value as
    /// is.
    pub fn cast(&self, value: &Value) -> Result<Value, CastError> {
        let Some(keys) = &self.keys else {
            return Ok(value.clone());
        };
        let object = match value {
            Value::Null => return Ok(Value::Null),
            Value::Object(object) => object,
            other => return Err(CastError::mismatch("plain object", other)),
        };

        let mut out = Map::with_capacity(keys.len());
        for (key, schema) in &keys.keys {
            let child = object.get(key).unwrap_or(&NULL);
            let cast = schema.cast_value(child).map_err(|e| e.within(key))?;
            out.insert(key.clone(), cast);
        }
        Ok(Value::Object(out))
    }
}

impl SchemaBuilder for ObjectSchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for ObjectSchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        self.cast(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidationError;
    use crate::schemas::{number, string};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn type_accepts_null_and_objects_only() {
        let schema = ObjectSchema::new();
        assert!(schema.validate(&json!({})).is_valid());
        assert!(schema.validate(&json!(null)).is_valid());
        for value in [json!(5), json!("5"), json!(""), json!([])] {
            assert_eq!(
                schema.validate(&value),
                vec![ValidationError::root("must be a plain object")]
            );
        }
    }

    #[test]
    fn null_object_skips_key_validation() {
        let schema = ObjectSchema::new().key("name", string().required());
        assert!(schema.validate(&json!(null)).is_valid());
    }

    #[test]
    fn missing_keys_validate_as_null() {
        let schema = ObjectSchema::new()
            .key("name", string().required())
            .key("age", number());
        assert_eq!(
            schema.validate(&json!({})),
            vec![ValidationError::new("required", Some("name"))]
        );
    }

    #[test]
    fn redeclaring_keys_replaces_the_key_rule() {
        let schema = ObjectSchema::new()
            .keys(KeyValidation::new().key("a", string().required()))
            .keys(KeyValidation::new().key("b", string().required()));

        assert_eq!(schema.base().rule_count(), 1);
        assert_eq!(
            schema.validate(&json!({})),
            vec![ValidationError::new("required", Some("b"))]
        );
    }

    #[test]
    fn key_rule_keeps_its_position() {
        let schema = ObjectSchema::new()
            .key("a", string().required())
            .add_test(|_, _| false, "object rule")
            .key("b", string().required());

        assert_eq!(
            schema.validate(&json!({})),
            vec![
                ValidationError::new("required", Some("a")),
                ValidationError::new("required", Some("b")),
                ValidationError::root("object rule"),
            ]
        );
    }

    #[test]
    fn cast_drops_undeclared_keys() {
        let schema = ObjectSchema::new().key("n", number());
        assert_eq!(schema.cast(&json!({"n": "5", "o": true})).unwrap(), json!({"n": 5}));
    }

    #[test]
    fn cast_fills_missing_declared_keys_with_null() {
        let schema = ObjectSchema::new().key("n", number()).key("s", string());
        assert_eq!(schema.cast(&json!({})).unwrap(), json!({"n": null, "s": null}));
    }

    #[test]
    fn cast_without_keys_is_identity() {
        let value = json!({"anything": [1, 2]});
        assert_eq!(ObjectSchema::new().cast(&value).unwrap(), value);
        assert_eq!(ObjectSchema::new().key("a", number()).cast(&json!(null)).unwrap(), json!(null));
    }

    #[test]
    fn cast_reports_child_path() {
        let schema = ObjectSchema::new().key("n", number());
        let err = schema.cast(&json!({"n": "abc"})).unwrap_err();
        assert_eq!(err.path(), Some("n"));

        let err = schema.cast(&json!([1])).unwrap_err();
        assert_eq!(err.path(), None);
    }
}
