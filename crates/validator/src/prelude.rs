//! Prelude module for convenient imports.
//!
//! Provides a single `use tessel_validator::prelude::*;` import that brings
//! in the traits, error types, schemas and factory functions.
//!
//! # Examples
//!
//! ```
//! use tessel_validator::prelude::*;
//! use serde_json::json;
//!
//! let age = number().integer().required();
//! assert!(age.validate(&json!(42)).is_valid());
//! ```

// ============================================================================
// FOUNDATION: Traits, errors, messages
// ============================================================================

pub use crate::foundation::{
    AnySchema, CastError, Message, Messages, RuleFault, Schema, SchemaBuilder, ValidationContext,
    ValidationError, ValidationErrors,
};

// ============================================================================
// SCHEMAS: Types and factories
// ============================================================================

pub use crate::schemas::{
    ArraySchema, BooleanSchema, KeyValidation, NumberSchema, ObjectSchema, StringSchema, any,
    array, boolean, number, object, string,
};

#[cfg(feature = "date")]
pub use crate::schemas::{DateSchema, date};

// ============================================================================
// MACROS
// ============================================================================

pub use crate::keys;
