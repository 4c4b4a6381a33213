//! Message tables.
//!
//! Every schema owns a [`Messages`] table mapping a message kind (`type`,
//! `required`, `min`, ...) to a [`Message`]. An entry is either a text
//! template with `{name}` placeholders or a function of named parameters,
//! for messages whose wording depends on the arguments.
//!
//! Tables deserialize from a JSON object of `kind -> text`, so overrides can
//! be loaded from configuration:
//!
//! ```
//! use tessel_validator::foundation::Messages;
//!
//! let overrides: Messages = serde_json::from_str(r#"{"required": "can't be blank"}"#).unwrap();
//! assert_eq!(overrides.render("required", &[]), "can't be blank");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Named parameters substituted into a message.
pub type MessageParams<'a> = &'a [(&'a str, String)];

type TemplateFn = dyn Fn(MessageParams<'_>) -> String + Send + Sync;

/// Text rendered when a kind is missing from the table entirely.
pub const UNKNOWN_PROBLEM: &str = "unknown problem";

// ============================================================================
// MESSAGE
// ============================================================================

/// One message table entry.
#[derive(Clone)]
pub enum Message {
    /// Text with optional `{name}` placeholders.
    Text(Cow<'static, str>),
    /// A function producing the text from named parameters.
    Template(Arc<TemplateFn>),
}

impl Message {
    /// Creates a text entry.
    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a function entry.
    pub fn template<F>(f: F) -> Self
    where
        F: Fn(MessageParams<'_>) -> String + Send + Sync + 'static,
    {
        Self::Template(Arc::new(f))
    }

    /// Renders the entry with the given parameters.
    #[must_use]
    pub fn render(&self, params: MessageParams<'_>) -> Cow<'static, str> {
        match self {
            Self::Text(text) if params.is_empty() || !text.contains('{') => text.clone(),
            Self::Text(text) => {
                let mut out = text.to_string();
                for (name, value) in params {
                    out = out.replace(&format!("{{{name}}}"), value);
                }
                Cow::Owned(out)
            }
            Self::Template(f) => Cow::Owned(f(params)),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Template(_) => f.write_str("Template(<function>)"),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Cow<'static, str>> for Message {
    fn from(text: Cow<'static, str>) -> Self {
        Self::text(text)
    }
}

/// Looks up a named parameter.
#[must_use]
pub fn param<'a>(params: MessageParams<'a>, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.as_str())
}

// ============================================================================
// MESSAGES
// ============================================================================

/// An ordered table of message kinds.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: IndexMap<Cow<'static, str>, Message>,
}

impl Messages {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every schema starts from.
    #[must_use]
    pub fn base() -> Self {
        Self::new()
            .with("type", "invalid")
            .with("required", "required")
            .with("unknown", UNKNOWN_PROBLEM)
            .with("matches", "must match key {key}")
            .with("one_of", "must be one of: {values}")
    }

    /// Adds or replaces an entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, kind: impl Into<Cow<'static, str>>, message: impl Into<Message>) -> Self {
        self.set(kind, message);
        self
    }

    /// Adds or replaces an entry in place.
    pub fn set(&mut self, kind: impl Into<Cow<'static, str>>, message: impl Into<Message>) {
        self.entries.insert(kind.into(), message.into());
    }

    /// Returns the table with every entry of `overrides` applied on top.
    #[must_use = "builder methods must be chained or built"]
    pub fn merged(mut self, overrides: &Messages) -> Self {
        for (kind, message) in &overrides.entries {
            self.entries.insert(kind.clone(), message.clone());
        }
        self
    }

    /// Returns the entry for `kind`.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Message> {
        self.entries.get(kind)
    }

    /// Returns true if the table has an entry for `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Renders `kind`, falling back to the `unknown` entry and then to
    /// [`UNKNOWN_PROBLEM`].
    #[must_use]
    pub fn render(&self, kind: &str, params: MessageParams<'_>) -> Cow<'static, str> {
        self.get(kind)
            .or_else(|| self.get("unknown"))
            .map_or(Cow::Borrowed(UNKNOWN_PROBLEM), |m| m.render(params))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, M> FromIterator<(K, M)> for Messages
where
    K: Into<Cow<'static, str>>,
    M: Into<Message>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut messages = Self::new();
        for (kind, message) in iter {
            messages.set(kind, message);
        }
        messages
    }
}

impl<'de> Deserialize<'de> for Messages {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_substitutes_named_params() {
        let message = Message::text("must be at least {length} characters");
        assert_eq!(
            message.render(&[("length", "3".to_string())]),
            "must be at least 3 characters"
        );
    }

    #[test]
    fn text_without_params_is_returned_verbatim() {
        assert_eq!(Message::text("required").render(&[]), "required");
    }

    #[test]
    fn template_sees_params() {
        let message = Message::template(|params| {
            format!("got {}", param(params, "n").unwrap_or("nothing"))
        });
        assert_eq!(message.render(&[("n", "7".to_string())]), "got 7");
        assert_eq!(message.render(&[]), "got nothing");
    }

    #[test]
    fn render_falls_back_to_unknown() {
        let messages = Messages::base();
        assert_eq!(messages.render("nope", &[]), "unknown problem");

        let custom = Messages::base().with("unknown", "something broke");
        assert_eq!(custom.render("nope", &[]), "something broke");

        assert_eq!(Messages::new().render("type", &[]), UNKNOWN_PROBLEM);
    }

    #[test]
    fn merged_overrides_only_given_kinds() {
        let merged = Messages::base().merged(&Messages::new().with("required", "needed"));
        assert_eq!(merged.render("required", &[]), "needed");
        assert_eq!(merged.render("type", &[]), "invalid");
    }

    #[test]
    fn deserializes_from_json_object() {
        let messages: Messages =
            serde_json::from_str(r#"{"type": "wrong", "min": "at least {length}"}"#).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages.render("min", &[("length", "2".into())]), "at least 2");
    }
}
