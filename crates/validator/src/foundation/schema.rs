//! The base schema engine.
//!
//! A [`Schema`] is a type predicate, an ordered list of rules and a message
//! table. Validation runs the predicate as a gate, then every rule in order,
//! and concatenates what the rules report. Leaf and composite schemas wrap a
//! `Schema` and add their own predicate, rules and casting.
//!
//! Rules and predicates are fallible: returning `Err(RuleFault)` is how they
//! signal that they could not reach a verdict. A panicking rule or predicate
//! is caught and turned into a fault as well. The engine reports every fault
//! as an ordinary validation error, so `validate` itself never fails.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::{Messages, RuleFault, ValidationContext, ValidationErrors};

type RuleFn = dyn Fn(&Value, &ValidationContext<'_>) -> Result<ValidationErrors, RuleFault> + Send + Sync;
type TypeTestFn = dyn Fn(&Value) -> Result<bool, RuleFault> + Send + Sync;

// ============================================================================
// RULE
// ============================================================================

/// A registered check run after the type predicate.
///
/// A rule may report any number of errors. Rules are immutable and shared
/// between a schema and the schemas derived from it.
#[derive(Clone)]
pub struct Rule(Arc<RuleFn>);

impl Rule {
    /// Wraps a rule function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> Result<ValidationErrors, RuleFault>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the rule. A panic inside the rule is returned as a fault.
    pub fn check(&self, value: &Value, context: &ValidationContext<'_>) -> Result<ValidationErrors, RuleFault> {
        guarded(|| (self.0)(value, context))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(<function>)")
    }
}

// ============================================================================
// TYPE TEST
// ============================================================================

/// The gate deciding whether rules run at all for a value.
#[derive(Clone)]
pub struct TypeTest(Arc<TypeTestFn>);

impl TypeTest {
    /// Wraps an infallible predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |value| Ok(f(value))))
    }

    /// Wraps a predicate that may fault.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the predicate. A panic inside the predicate is returned as a
    /// fault.
    pub fn check(&self, value: &Value) -> Result<bool, RuleFault> {
        guarded(|| (self.0)(value))
    }
}

fn guarded<T>(call: impl FnOnce() -> Result<T, RuleFault>) -> Result<T, RuleFault> {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(RuleFault::new(format!("panicked: {}", panic_reason(payload.as_ref())))))
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl fmt::Debug for TypeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeTest(<function>)")
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// The untyped base schema.
///
/// Without a type predicate every value is "the right type" and only rules
/// decide. `cast` is the identity.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let schema = any().required();
/// assert_eq!(
///     schema.validate(&json!(null)),
///     vec![ValidationError::root("required")]
/// );
/// assert!(schema.validate(&json!(false)).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    type_test: Option<TypeTest>,
    rules: Vec<Rule>,
    messages: Messages,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Creates an untyped schema with the base message table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_test: None,
            rules: Vec::new(),
            messages: Messages::base(),
        }
    }

    /// Creates a schema gated by `type_test`, with `messages` merged over the
    /// base table.
    #[must_use]
    pub fn typed(type_test: TypeTest, messages: &Messages) -> Self {
        Self {
            type_test: Some(type_test),
            rules: Vec::new(),
            messages: Messages::base().merged(messages),
        }
    }

    /// Returns true if `value` passes the type predicate.
    ///
    /// A faulting predicate counts as a mismatch.
    #[must_use]
    pub fn is_type(&self, value: &Value) -> bool {
        let Some(test) = &self.type_test else {
            return true;
        };
        match test.check(value) {
            Ok(passed) => passed,
            Err(fault) => {
                tracing::debug!(error = %fault, "type predicate faulted; treating value as mismatched");
                false
            }
        }
    }

    /// Validates a top-level value.
    #[must_use]
    pub fn validate(&self, value: &Value) -> ValidationErrors {
        self.validate_in(value, &ValidationContext::root())
    }

    /// Validates a value inside the given context.
    ///
    /// A type mismatch yields exactly one error and skips the rules.
    /// Otherwise every rule runs and their errors are concatenated in
    /// registration order.
    #[must_use]
    pub fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        let path = context.path();

        if !self.is_type(value) {
            return ValidationErrors::single(self.messages.render("type", &[]), path);
        }

        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            match rule.check(value, context) {
                Ok(found) => errors.append(found),
                Err(fault) => {
                    tracing::debug!(path = ?path, error = %fault, "rule faulted; reporting unknown problem");
                    errors.push(crate::foundation::ValidationError::new(
                        self.messages.render("unknown", &[]),
                        path,
                    ));
                }
            }
        }
        errors
    }

    /// Validates and converts the outcome into a `Result`.
    pub fn check(&self, value: &Value) -> Result<(), ValidationErrors> {
        self.validate(value).into_result()
    }

    /// Returns the value unchanged.
    #[must_use]
    pub fn cast(&self, value: &Value) -> Value {
        value.clone()
    }

    /// The message table.
    #[must_use]
    pub fn message_table(&self) -> &Messages {
        &self.messages
    }

    /// Mutable access to the message table.
    pub fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Appends a rule and returns its position.
    pub fn push_rule(&mut self, rule: Rule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Replaces the rule at `slot`, or appends when the slot is empty.
    ///
    /// Composites use this so that redeclaring their children replaces the
    /// child rule instead of stacking a second one.
    pub fn put_rule(&mut self, slot: Option<usize>, rule: Rule) -> usize {
        match slot {
            Some(index) if index < self.rules.len() => {
                self.rules[index] = rule;
                index
            }
            _ => self.push_rule(rule),
        }
    }

    /// Replaces the type predicate.
    pub fn set_type_test(&mut self, type_test: TypeTest) {
        self.type_test = Some(type_test);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{SchemaBuilder, ValidationError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn failing(message: &'static str) -> Rule {
        Rule::new(move |_, ctx| Ok(ValidationErrors::single(message, ctx.path())))
    }

    #[test]
    fn untyped_schema_accepts_everything() {
        let schema = Schema::new();
        for value in [json!(null), json!(""), json!(1), json!({"a": []})] {
            assert!(schema.validate(&value).is_valid());
        }
    }

    #[test]
    fn type_mismatch_skips_rules() {
        let mut schema = Schema::typed(TypeTest::new(Value::is_string), &Messages::new().with("type", "must be text"));
        schema.push_rule(failing("never reported"));

        assert_eq!(schema.validate(&json!(5)), vec![ValidationError::root("must be text")]);
        assert_eq!(schema.validate(&json!("x")), vec![ValidationError::root("never reported")]);
    }

    #[test]
    fn faulting_predicate_is_a_mismatch() {
        let schema = Schema::typed(
            TypeTest::fallible(|_| Err(RuleFault::new("predicate exploded"))),
            &Messages::new(),
        );
        assert_eq!(schema.validate(&json!(1)), vec![ValidationError::root("invalid")]);
        assert!(!schema.is_type(&json!(1)));
    }

    #[test]
    fn type_message_falls_back_to_unknown() {
        let mut schema = Schema::typed(TypeTest::new(|_| false), &Messages::new());
        *schema.messages_mut() = Messages::new().with("unknown", "no idea");
        assert_eq!(schema.validate(&json!(1)), vec![ValidationError::root("no idea")]);
    }

    #[test]
    fn faulting_rule_becomes_unknown_problem_and_others_still_run() {
        let mut schema = Schema::new();
        schema.push_rule(failing("first"));
        schema.push_rule(Rule::new(|_, _| Err(RuleFault::new("boom"))));
        schema.push_rule(failing("third"));

        let model = json!({});
        let ctx = ValidationContext::new(&model).at("field");
        assert_eq!(
            schema.validate_in(&json!(1), &ctx),
            vec![
                ValidationError::new("first", Some("field")),
                ValidationError::new("unknown problem", Some("field")),
                ValidationError::new("third", Some("field")),
            ]
        );
    }

    #[test]
    fn panicking_rule_becomes_unknown_problem() {
        let schema = Schema::new()
            .add_test(|v, _| v.as_str().unwrap().is_empty(), "must be empty")
            .add_test(|_, _| false, "still runs");

        assert_eq!(
            schema.validate(&json!(1)),
            vec![
                ValidationError::root("unknown problem"),
                ValidationError::root("still runs"),
            ]
        );
        assert_eq!(schema.validate(&json!("")), vec![ValidationError::root("still runs")]);
    }

    #[test]
    fn panicking_predicate_is_a_mismatch() {
        let schema = Schema::typed(
            TypeTest::new(|v| v.as_str().expect("text only").is_empty()),
            &Messages::new().with("type", "must be empty text"),
        );
        assert_eq!(schema.validate(&json!(1)), vec![ValidationError::root("must be empty text")]);
        assert!(schema.validate(&json!("")).is_valid());
    }

    #[test]
    fn panic_reason_is_kept_in_fault() {
        let rule = Rule::new(|_, _| panic!("lookup table missing"));
        let fault = rule.check(&json!(1), &ValidationContext::root()).unwrap_err();
        assert_eq!(fault.reason(), "panicked: lookup table missing");
    }

    #[test]
    fn put_rule_replaces_in_place() {
        let mut schema = Schema::new();
        let slot = schema.push_rule(failing("old"));
        schema.push_rule(failing("after"));
        schema.put_rule(Some(slot), failing("new"));

        assert_eq!(schema.rule_count(), 2);
        assert_eq!(
            schema.validate(&json!(1)),
            vec![ValidationError::root("new"), ValidationError::root("after")]
        );
    }

    #[test]
    fn cast_is_identity() {
        let value = json!({"keep": ["me"]});
        assert_eq!(Schema::new().cast(&value), value);
    }

    #[test]
    fn check_wraps_errors() {
        let mut schema = Schema::new();
        schema.push_rule(failing("bad"));
        assert!(schema.check(&json!(1)).is_err());
        assert!(Schema::new().check(&json!(1)).is_ok());
    }
}
