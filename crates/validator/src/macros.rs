//! Macros for declaring schemas with less boilerplate.

// ============================================================================
// KEYS MACRO
// ============================================================================

/// Builds a [`KeyValidation`](crate::schemas::KeyValidation) from
/// `"key" => schema` pairs, in the order written.
///
/// ```
/// use tessel_validator::prelude::*;
///
/// let keys = keys! {
///     "email" => string().email().required(),
///     "age" => number().integer(),
/// };
/// assert_eq!(keys.names().collect::<Vec<_>>(), ["email", "age"]);
/// ```
#[macro_export]
macro_rules! keys {
    () => {
        $crate::schemas::KeyValidation::new()
    };
    ($($key:expr => $schema:expr),+ $(,)?) => {
        $crate::schemas::KeyValidation::new()$(.key($key, $schema))+
    };
}

// ============================================================================
// TESTS
// ============================================================================
