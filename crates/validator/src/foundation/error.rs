//! Error types for validation failures
//!
//! Validation never fails as a Rust error: every problem with the input is a
//! [`ValidationError`] record inside a [`ValidationErrors`] sequence. The two
//! real error types live at the edges:
//!
//! - [`RuleFault`] is what a rule or type predicate returns when it cannot
//!   reach a verdict. The engine downgrades it to an "unknown problem" record.
//! - [`CastError`] is returned by `cast` when a value cannot be coerced.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// One validation failure: a message and the path of the offending value.
///
/// `path` is `None` at the root, or a dotted chain of keys and indices such
/// as `"address.street"` or `"items.2"`.
///
/// # Examples
///
/// ```
/// use tessel_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("required", Some("user.name"));
/// assert_eq!(error.to_string(), "user.name: required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Why the value is invalid.
    pub message: Cow<'static, str>,

    /// Where the value sits inside the validated input.
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new error stamped with `path`.
    ///
    /// An empty path is stored as `None`.
    pub fn new(message: impl Into<Cow<'static, str>>, path: Option<&str>) -> Self {
        Self {
            message: message.into(),
            path: path.filter(|p| !p.is_empty()).map(str::to_owned),
        }
    }

    /// Creates an error at the root of the input.
    pub fn root(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(message, None)
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// The ordered result of one `validate` call. Empty means valid.
///
/// Errors appear in rule registration order; composite schemas splice their
/// children's errors in at the position of their key or index rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Creates an empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result holding exactly one error.
    pub fn single(message: impl Into<Cow<'static, str>>, path: Option<&str>) -> Self {
        Self {
            errors: vec![ValidationError::new(message, path)],
        }
    }

    /// Builds a result from the outcome of a boolean test.
    ///
    /// A passing test yields no errors; a failing one yields one error per
    /// message, all stamped with `path`.
    pub fn from_test<M>(passed: bool, messages: impl IntoIterator<Item = M>, path: Option<&str>) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        if passed {
            return Self::new();
        }
        messages
            .into_iter()
            .map(|message| ValidationError::new(message, path))
            .collect()
    }

    /// Appends one error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends every error of `other`, preserving its order.
    pub fn append(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Returns the errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Finds the first error recorded at `path`.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path() == Some(path))
    }

    /// Converts into `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl PartialEq<Vec<ValidationError>> for ValidationErrors {
    fn eq(&self, other: &Vec<ValidationError>) -> bool {
        &self.errors == other
    }
}

// ============================================================================
// RULE FAULT
// ============================================================================

/// A rule or type predicate could not evaluate the value.
///
/// Faults never reach the caller of `validate`: the engine reports them as a
/// generic "unknown problem" and logs the detail at debug level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RuleFault {
    reason: Cow<'static, str>,
}

impl RuleFault {
    /// Creates a fault with the given reason.
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason given by the failing rule.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

// ============================================================================
// CAST ERROR
// ============================================================================

/// Coercion failed for a value that the schema cannot represent.
///
/// `cast` does not validate; callers that need a guaranteed cast should
/// validate first. For values that passed validation, casting succeeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    /// The value has the wrong shape for the schema.
    #[error("{}expected {expected}, found {found}", at_path(.path.as_deref()))]
    Mismatch {
        /// Path of the offending value.
        path: Option<String>,
        /// What the schema needed.
        expected: &'static str,
        /// JSON kind of the value that was found.
        found: &'static str,
    },

    /// The value has the right shape but could not be converted.
    #[error("{}cannot convert {input:?}: {reason}", at_path(.path.as_deref()))]
    Conversion {
        /// Path of the offending value.
        path: Option<String>,
        /// The offending input, rendered as text.
        input: String,
        /// Why conversion failed.
        reason: Cow<'static, str>,
    },
}

fn at_path(path: Option<&str>) -> String {
    path.map(|p| format!("at {p}: ")).unwrap_or_default()
}

impl CastError {
    /// Creates a shape mismatch error at the root.
    pub fn mismatch(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::Mismatch {
            path: None,
            expected,
            found: crate::json::kind(found),
        }
    }

    /// Creates a conversion error at the root.
    pub fn conversion(input: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Conversion {
            path: None,
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Path of the value that failed to cast.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Mismatch { path, .. } | Self::Conversion { path, .. } => path.as_deref(),
        }
    }

    /// Prefixes the error path with `segment`, as a composite does when a
    /// child cast fails.
    #[must_use = "builder methods must be chained or built"]
    pub fn within(mut self, segment: impl fmt::Display) -> Self {
        let slot = match &mut self {
            Self::Mismatch { path, .. } | Self::Conversion { path, .. } => path,
        };
        *slot = Some(match slot.take() {
            Some(rest) => format!("{segment}.{rest}"),
            None => segment.to_string(),
        });
        self
    }
}
