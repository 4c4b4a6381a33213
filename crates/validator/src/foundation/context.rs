//! Validation context threaded through nested validation.
//!
//! A context carries two things down the recursion:
//!
//! - the **model**: the raw input of the nearest enclosing composite, which is
//!   what lets a rule compare a value against its siblings;
//! - the **path**: where the value currently being validated sits, used to
//!   stamp errors and as the prefix when descending further.
//!
//! Contexts are passed by reference and never mutated; descending produces a
//! fresh child context.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::json::NULL;

/// Ambient `(model, path)` pair for one `validate` call.
///
/// # Examples
///
/// ```
/// use tessel_validator::foundation::ValidationContext;
/// use serde_json::json;
///
/// let model = json!({"password": "hunter2"});
/// let ctx = ValidationContext::new(&model).at("account");
/// let child = ctx.descend(&model, "confirm");
///
/// assert_eq!(child.path(), Some("account.confirm"));
/// assert_eq!(child.sibling("password"), Some(&json!("hunter2")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext<'a> {
    model: &'a Value,
    path: Option<Cow<'a, str>>,
}

impl ValidationContext<'static> {
    /// Context for a top-level `validate` call: no enclosing composite and no
    /// path.
    #[must_use]
    pub fn root() -> Self {
        Self {
            model: &NULL,
            path: None,
        }
    }
}

impl Default for ValidationContext<'static> {
    fn default() -> Self {
        Self::root()
    }
}

impl<'a> ValidationContext<'a> {
    /// Creates a context with the given model and no path.
    #[must_use]
    pub fn new(model: &'a Value) -> Self {
        Self { model, path: None }
    }

    /// Sets the path of this context.
    #[must_use = "builder methods must be chained or built"]
    pub fn at(mut self, path: impl Into<Cow<'a, str>>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The raw input of the nearest enclosing composite.
    #[must_use]
    pub fn model(&self) -> &'a Value {
        self.model
    }

    /// Looks up a sibling value in the model.
    ///
    /// Returns `None` when the model is not an object or lacks `key`.
    #[must_use]
    pub fn sibling(&self, key: &str) -> Option<&'a Value> {
        self.model.as_object().and_then(|m| m.get(key))
    }

    /// The current path, with an empty path reported as `None`.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Derives the context for a child of the current value.
    ///
    /// The child's model is `model` (the composite's own input) and its path
    /// is the current path extended by `segment`.
    #[must_use]
    pub fn descend<'b>(&self, model: &'b Value, segment: impl fmt::Display) -> ValidationContext<'b> {
        let path = match self.path() {
            Some(base) => format!("{base}.{segment}"),
            None => segment.to_string(),
        };
        ValidationContext {
            model,
            path: Some(Cow::Owned(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_has_null_model_and_no_path() {
        let ctx = ValidationContext::root();
        assert!(ctx.model().is_null());
        assert_eq!(ctx.path(), None);
    }

    #[test]
    fn empty_path_reads_as_none() {
        let model = json!({});
        let ctx = ValidationContext::new(&model).at("");
        assert_eq!(ctx.path(), None);
    }

    #[test]
    fn descend_from_root_uses_bare_segment() {
        let model = json!([1, 2, 3]);
        let child = ValidationContext::root().descend(&model, 2);
        assert_eq!(child.path(), Some("2"));
        assert_eq!(child.model(), &model);
    }

    #[test]
    fn descend_joins_with_dot() {
        let outer = json!({"a": {"b": 1}});
        let inner = &outer["a"];
        let ctx = ValidationContext::root().descend(&outer, "a");
        let child = ctx.descend(inner, "b");
        assert_eq!(child.path(), Some("a.b"));
        assert_eq!(child.sibling("b"), Some(&json!(1)));
    }

    #[test]
    fn descend_from_empty_path_does_not_prefix_dot() {
        let model = json!({});
        let ctx = ValidationContext::new(&model).at("");
        assert_eq!(ctx.descend(&model, "x").path(), Some("x"));
    }

    #[test]
    fn sibling_requires_object_model() {
        let model = json!(["b"]);
        assert_eq!(ValidationContext::new(&model).sibling("b"), None);
    }
}
