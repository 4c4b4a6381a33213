//! Core schema types and traits
//!
//! This module contains the building blocks every schema is made of:
//!
//! - **Traits**: [`AnySchema`], [`SchemaBuilder`]
//! - **Engine**: [`Schema`], [`Rule`], [`TypeTest`]
//! - **Context**: [`ValidationContext`]
//! - **Errors**: [`ValidationError`], [`ValidationErrors`], [`RuleFault`], [`CastError`]
//! - **Messages**: [`Message`], [`Messages`]
//!
//! # Architecture
//!
//! ## 1. Immutable fluent building
//!
//! Every builder call clones the schema, mutates the clone and returns it:
//!
//! ```rust,ignore
//! let base = string();
//! let a = base.required();
//! let b = base.min(3); // `b` never sees `a`'s required rule
//! ```
//!
//! ## 2. Gate, then rules
//!
//! `validate` runs the type predicate first. A mismatch is reported once and
//! no rule runs. Otherwise every rule runs and all failures are collected;
//! nothing short-circuits.
//!
//! ## 3. Context threading
//!
//! Composite schemas validate their children with a derived
//! [`ValidationContext`] whose model is the composite's own input and whose
//! path is extended by the child's key or index.
//!
//! ## 4. Faults never escape
//!
//! A rule or predicate returning `Err(RuleFault)` is reported as an "unknown
//! problem" (or a type mismatch, for predicates). `validate` is total.

pub mod context;
pub mod error;
pub mod message;
pub mod schema;
pub mod traits;

pub use context::ValidationContext;
pub use error::{CastError, RuleFault, ValidationError, ValidationErrors};
pub use message::{Message, MessageParams, Messages, UNKNOWN_PROBLEM, param};
pub use schema::{Rule, Schema, TypeTest};
pub use traits::{AnySchema, SchemaBuilder};

// ============================================================================
// UTILITIES
// ============================================================================

/// Validates a value against several schemas and concatenates the results.
///
/// # Examples
///
/// ```
/// use tessel_validator::foundation::{AnySchema, validate_with_all};
/// use tessel_validator::prelude::*;
/// use serde_json::json;
///
/// let result = validate_with_all(&json!("x"), &[&string().min(2), &string().max(0)]);
/// assert_eq!(result.len(), 2);
/// ```
#[must_use]
pub fn validate_with_all(value: &serde_json::Value, schemas: &[&dyn AnySchema]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for schema in schemas {
        errors.append(schema.validate(value));
    }
    errors
}

#[cfg(test)]
mod core_tests {
    use super::*;
    use serde_json::json;

    fn always_fails() -> Schema {
        Schema::new().add_test(|_, _| false, "always fails")
    }

    #[test]
    fn validate_with_all_success() {
        let a = Schema::new();
        let b = Schema::new();
        assert!(validate_with_all(&json!(1), &[&a, &b]).is_valid());
    }

    #[test]
    fn validate_with_all_collects_every_failure() {
        let a = always_fails();
        let b = Schema::new();
        let c = always_fails();
        let result = validate_with_all(&json!(1), &[&a, &b, &c]);
        assert_eq!(result.len(), 2);
    }
}
