//! Integration tests for the prelude module.
//!
//! Verifies that `use tessel_validator::prelude::*` brings in everything a
//! consumer needs for common validation scenarios.

use pretty_assertions::assert_eq;
use serde_json::json;
use tessel_validator::foundation::param;
use tessel_validator::prelude::*;

// ============================================================================
// ABSENCE
// ============================================================================

#[test]
fn absent_values_pass_every_schema_by_default() {
    let schemas: Vec<Box<dyn AnySchema>> = vec![
        Box::new(any()),
        Box::new(string().min(3).email()),
        Box::new(number().integer()),
        Box::new(boolean()),
        Box::new(object().key("a", string().required())),
        Box::new(array().of(number().required())),
    ];
    for schema in &schemas {
        assert!(schema.validate(&json!(null)).is_valid());
    }
}

#[test]
fn required_rejects_null_and_empty_string() {
    let schema = string().required();
    assert_eq!(schema.validate(&json!(null)), vec![ValidationError::root("required")]);
    assert_eq!(schema.validate(&json!("")), vec![ValidationError::root("required")]);
    assert!(schema.validate(&json!(" ")).is_valid());
    assert!(schema.validate(&json!(0)).is_valid());
    assert!(schema.validate(&json!(false)).is_valid());
}

// ============================================================================
// IMMUTABLE BUILDING
// ============================================================================

#[test]
fn builder_calls_do_not_alias() {
    let base = string();
    let required = base.required();
    let short = base.max(2);

    assert!(base.validate(&json!("long enough")).is_valid());
    assert!(required.validate(&json!("long enough")).is_valid());
    assert!(short.validate(&json!(null)).is_valid());
    assert_eq!(
        short.validate(&json!("abc")),
        vec![ValidationError::root("must be at most 2 characters")]
    );
    assert_eq!(base.base().rule_count(), 0);
}

#[test]
fn repeated_rule_calls_accumulate() {
    let schema = string().min(2).min(4);
    assert_eq!(
        schema.validate(&json!("a")),
        vec![
            ValidationError::root("must be at least 2 characters"),
            ValidationError::root("must be at least 4 characters"),
        ]
    );
}

// ============================================================================
// ONE OF
// ============================================================================

#[test]
fn one_of_lists_allowed_values() {
    let schema = string().one_of(["a", "b"]);
    assert!(schema.validate(&json!("a")).is_valid());
    assert!(schema.validate(&json!("")).is_valid());
    assert_eq!(
        schema.validate(&json!("c")),
        vec![ValidationError::root("must be one of: a, b")]
    );
}

#[test]
fn one_of_compares_loosely() {
    let schema = number().one_of([1, 2, 3]);
    assert!(schema.validate(&json!("2")).is_valid());
    assert_eq!(
        schema.validate(&json!(4)),
        vec![ValidationError::root("must be one of: 1, 2, 3")]
    );
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn type_message_can_be_overridden() {
    let schema = number().message_for("type", "numbers only, please");
    assert_eq!(
        schema.validate(&json!("x")),
        vec![ValidationError::root("numbers only, please")]
    );
}

#[test]
fn overrides_apply_to_rules_added_afterwards() {
    let overrides = Messages::new().with("required", "cannot be blank");
    let before = string().required().messages(&overrides);
    let after = string().messages(&overrides).required();

    assert_eq!(before.validate(&json!("")), vec![ValidationError::root("required")]);
    assert_eq!(after.validate(&json!("")), vec![ValidationError::root("cannot be blank")]);
}

#[test]
fn message_table_deserializes_from_json() {
    let overrides: Messages = serde_json::from_value(json!({
        "type": "not a whole thing",
        "min": "at least {length} please",
    }))
    .unwrap();

    let schema = string().messages(&overrides).min(3);
    assert_eq!(
        schema.validate(&json!({})),
        vec![ValidationError::root("not a whole thing")]
    );
    assert_eq!(
        schema.validate(&json!("ab")),
        vec![ValidationError::root("at least 3 please")]
    );
}

#[test]
fn template_messages_receive_parameters() {
    let schema = string()
        .message_for(
            "max",
            Message::template(|params| {
                let length = params.iter().find(|(name, _)| *name == "length").map(|(_, v)| v.as_str());
                format!("keep it under {}", length.unwrap_or("?"))
            }),
        )
        .max(5);
    assert_eq!(
        schema.validate(&json!("too long")),
        vec![ValidationError::root("keep it under 5")]
    );
}

#[test]
fn decimal_places_template_can_be_overridden() {
    let overrides = Messages::new().with(
        "decimal_places",
        Message::template(|params| match (param(params, "min"), param(params, "max")) {
            (Some(min), Some(max)) => format!("{min} to {max} digits after the point"),
            (_, max) => format!("no more than {} digits after the point", max.unwrap_or("?")),
        }),
    );
    let at_most = number().messages(&overrides).decimal_places(2);
    let between = number().messages(&overrides).decimal_places_between(1, 3);

    assert!(at_most.validate(&json!("1.25")).is_valid());
    assert_eq!(
        at_most.validate(&json!("1.255")),
        vec![ValidationError::root("no more than 2 digits after the point")]
    );
    assert_eq!(
        between.validate(&json!(4)),
        vec![ValidationError::root("1 to 3 digits after the point")]
    );
}

// ============================================================================
// FAULTS
// ============================================================================

#[test]
fn panicking_test_is_reported_as_unknown_problem() {
    let schema = any().add_test(|v, _| v.as_str().unwrap().is_empty(), "must be empty");
    assert_eq!(
        schema.validate(&json!(1)),
        vec![ValidationError::root("unknown problem")]
    );

    let nested = object().key("x", schema);
    assert_eq!(
        nested.validate(&json!({"x": 1})),
        vec![ValidationError::new("unknown problem", Some("x"))]
    );
}

#[test]
fn faulting_rule_is_reported_as_unknown_problem() {
    let schema = string()
        .add_rule(|_, _| Err(RuleFault::new("lookup table missing")))
        .min(3);

    assert_eq!(
        schema.validate(&json!("ab")),
        vec![
            ValidationError::root("unknown problem"),
            ValidationError::root("must be at least 3 characters"),
        ]
    );
}

#[test]
fn faulting_rule_message_is_overridable() {
    let schema = any()
        .message_for("unknown", "something went wrong")
        .add_rule(|_, _| Err(RuleFault::new("boom")));
    assert_eq!(
        schema.validate(&json!(1)),
        vec![ValidationError::root("something went wrong")]
    );
}

// ============================================================================
// RESULTS
// ============================================================================

#[test]
fn errors_convert_into_result() {
    let schema = number().required();
    assert!(schema.validate(&json!(1)).into_result().is_ok());

    let err = schema.validate(&json!(null)).into_result().unwrap_err();
    assert_eq!(err.to_string(), "required");
}

#[test]
fn errors_serialize_as_list() {
    let schema = object().key("a", number());
    let errors = schema.validate(&json!({"a": "x"}));
    assert_eq!(
        serde_json::to_value(&errors).unwrap(),
        json!([{"message": "must be a number", "path": "a"}])
    );
}
