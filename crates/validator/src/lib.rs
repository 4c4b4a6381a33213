//! # tessel-validator
//!
//! Declarative, composable validation of JSON data.
//!
//! A schema pairs a type predicate with an ordered list of rules. Schemas are
//! built fluently and immutably: every builder call returns a new schema and
//! leaves its receiver untouched.
//!
//! ## Quick Start
//!
//! ```
//! use tessel_validator::prelude::*;
//! use serde_json::json;
//!
//! let user = object().keys(keys! {
//!     "email" => string().email().required(),
//!     "password" => string().min(8).required(),
//!     "confirm" => string().matches("password"),
//!     "tags" => array().of(string().one_of(["admin", "staff"])),
//! });
//!
//! let errors = user.validate(&json!({
//!     "email": "not an email",
//!     "password": "hunter22",
//!     "confirm": "hunter2",
//!     "tags": ["staff", "root"],
//! }));
//!
//! assert_eq!(
//!     errors,
//!     vec![
//!         ValidationError::new("must be an email address", Some("email")),
//!         ValidationError::new("must match key password", Some("confirm")),
//!         ValidationError::new("must be one of: admin, staff", Some("tags.1")),
//!     ]
//! );
//! ```
//!
//! ## Semantics
//!
//! - **Absence is valid**: null (and, for most schemas, the empty string)
//!   passes unless `required` is called.
//! - **Gate, then rules**: a type mismatch yields exactly one error and no
//!   rule runs. Otherwise all failures are collected.
//! - **Paths**: nested errors carry dot-joined paths such as `a.b` or
//!   `items.2`; top-level errors have no path.
//! - **Total validation**: rules that fault are reported as an "unknown
//!   problem" instead of aborting.
//!
//! ## Feature flags
//!
//! - `date` (default): [`date`](schemas::date()) schemas, backed by chrono.

// CastError carries the offending input for diagnostics.
#![allow(clippy::result_large_err)]

pub mod foundation;
pub mod json;
mod macros;
pub mod prelude;
pub mod schemas;
