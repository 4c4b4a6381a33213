//! Date schema
//!
//! Dates arrive as strings and are parsed strictly against a format written
//! with moment-style tokens (`YYYY-MM-DD`, `HH:mm`, ...). Formats are
//! translated to chrono patterns once, when the schema is built.
//!
//! Parsing rules:
//!
//! - missing date parts default to 1970, January and the 1st, so `YYYY`
//!   and `MM/YYYY` are complete formats;
//! - missing time parts read as zero, and `hh` without `A` reads AM;
//! - a format without an offset reads UTC;
//! - a trailing `Z` is accepted wherever the format expects an offset.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::foundation::{
    AnySchema, CastError, Messages, Schema, SchemaBuilder, TypeTest, ValidationContext,
    ValidationErrors,
};
use crate::json::is_blank;

/// Parse format used until [`DateSchema::format`] is called.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DDTHH:mm:ss.SSSZ";

// ============================================================================
// DATE FORMAT
// ============================================================================

/// Moment-style tokens and their chrono equivalents, longest first.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("A", "%p"),
    ("a", "%P"),
];

/// A moment-style format translated to a chrono pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    pattern: String,
    fields: Fields,
}

/// Which fields a format reads; the others are filled with defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    meridiem: bool,
    minute: bool,
    offset: bool,
}

impl Fields {
    fn mark(&mut self, token: &str) {
        match token.as_bytes()[0] {
            b'Y' => self.year = true,
            b'M' => self.month = true,
            b'D' => self.day = true,
            b'H' => self.hour = true,
            b'h' => {
                self.hour = true;
                self.hour12 = true;
            }
            b'A' | b'a' => self.meridiem = true,
            b'm' => self.minute = true,
            b'Z' => self.offset = true,
            _ => {}
        }
    }

    fn fill_defaults(self, parsed: &mut Parsed) -> ParseResult<()> {
        if !self.year {
            parsed.set_year(1970)?;
        }
        if !self.month {
            parsed.set_month(1)?;
        }
        if !self.day {
            parsed.set_day(1)?;
        }
        if !self.hour {
            parsed.set_hour(0)?;
        } else if self.hour12 && !self.meridiem {
            parsed.set_ampm(false)?;
        }
        if !self.minute {
            parsed.set_minute(0)?;
        }
        Ok(())
    }
}

impl DateFormat {
    /// Translates a moment-style format.
    ///
    /// Text inside `[...]` is copied literally; characters that are not
    /// tokens are literals too.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut format = Self {
            source: source.to_string(),
            pattern: String::with_capacity(source.len() * 2),
            fields: Fields::default(),
        };

        let mut rest = source;
        while let Some(c) = rest.chars().next() {
            if c == '[' {
                let end = rest.find(']').unwrap_or(rest.len());
                format.push_literal(&rest[1..end]);
                rest = rest.get(end + 1..).unwrap_or("");
                continue;
            }
            if let Some((token, chrono)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
                format.pattern.push_str(chrono);
                format.fields.mark(token);
                rest = &rest[token.len()..];
                continue;
            }
            format.push_literal(&rest[..c.len_utf8()]);
            rest = &rest[c.len_utf8()..];
        }
        format
    }

    fn push_literal(&mut self, text: &str) {
        for c in text.chars() {
            if c == '%' {
                self.pattern.push_str("%%");
            } else {
                self.pattern.push(c);
            }
        }
    }

    /// The moment-style source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The translated chrono pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses `input` strictly: the whole input must match the format.
    #[must_use]
    pub fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        let input = match input.strip_suffix('Z') {
            Some(head) if self.fields.offset => Cow::Owned(format!("{head}+00:00")),
            _ => Cow::Borrowed(input),
        };

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, &input, StrftimeItems::new(&self.pattern)).ok()?;
        self.fields.fill_defaults(&mut parsed).ok()?;

        if self.fields.offset {
            parsed.to_datetime().ok()
        } else {
            parsed
                .to_naive_datetime_with_offset(0)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        }
    }

    /// Formats `instant` with this format.
    pub fn format(&self, instant: &DateTime<FixedOffset>) -> Result<String, CastError> {
        let mut out = String::new();
        write!(out, "{}", instant.format(&self.pattern))
            .map_err(|_| CastError::conversion(instant.to_rfc3339(), format!("cannot format as {}", self.source)))?;
        Ok(out)
    }
}

// ============================================================================
// DATE SCHEMA
// ============================================================================

/// What a date casts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCast {
    /// A parsed instant; the result when no cast format is set.
    Instant(DateTime<FixedOffset>),
    /// Text in the cast format.
    Formatted(String),
}

/// Requires the value to be a date string in the expected format.
///
/// # Examples
///
/// ```
/// use tessel_validator::prelude::*;
/// use tessel_validator::schemas::DateCast;
/// use serde_json::json;
///
/// let schema = date().format("DD/MM/YYYY").cast_format("YYYY-MM-DD");
/// assert!(schema.validate(&json!("09/11/1989")).is_valid());
/// assert_eq!(
///     schema.cast(&json!("09/11/1989")).unwrap(),
///     Some(DateCast::Formatted("1989-11-09".to_string()))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DateSchema {
    base: Schema,
    parse_format: DateFormat,
    cast_format: Option<DateFormat>,
}

impl Default for DateSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl DateSchema {
    /// Creates a date schema using [`DEFAULT_FORMAT`].
    #[must_use]
    pub fn new() -> Self {
        let messages = Messages::new()
            .with("type", "must be a date")
            .with("format", "must match format {format}");
        let parse_format = DateFormat::new(DEFAULT_FORMAT);
        let mut schema = Self {
            base: Schema::typed(TypeTest::new(|_| true), &messages),
            parse_format,
            cast_format: None,
        };
        schema.refresh_type_test();
        schema
    }

    /// Sets the format dates are parsed with. The type message becomes
    /// `must match format <format>`.
    #[must_use]
    pub fn format(&self, format: &str) -> Self {
        self.derive(|schema| {
            schema.parse_format = DateFormat::new(format);
            let message = schema.message("format", &[("format", format.to_string())]);
            schema.base.messages_mut().set("type", message);
            schema.refresh_type_test();
        })
    }

    /// Sets the format `cast` renders dates with. Input in this format is
    /// also accepted.
    #[must_use]
    pub fn cast_format(&self, format: &str) -> Self {
        self.derive(|schema| {
            schema.cast_format = Some(DateFormat::new(format));
            schema.refresh_type_test();
        })
    }

    fn refresh_type_test(&mut self) {
        let parse_format = self.parse_format.clone();
        let cast_format = self.cast_format.clone();
        self.base.set_type_test(TypeTest::new(move |value| match value {
            v if is_blank(v) => true,
            Value::String(s) => {
                parse_format.parse(s).is_some()
                    || cast_format.as_ref().is_some_and(|f| f.parse(s).is_some())
            }
            _ => false,
        }));
    }

    fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        self.parse_format
            .parse(input)
            .or_else(|| self.cast_format.as_ref().and_then(|f| f.parse(input)))
    }

    /// Parses the value; null and the empty string cast to `None`.
    pub fn cast(&self, value: &Value) -> Result<Option<DateCast>, CastError> {
        if is_blank(value) {
            return Ok(None);
        }
        let Value::String(text) = value else {
            return Err(CastError::mismatch("date string", value));
        };
        let instant = self.parse(text).ok_or_else(|| {
            CastError::conversion(text.clone(), format!("does not match format {}", self.parse_format.source()))
        })?;
        match &self.cast_format {
            Some(format) => format.format(&instant).map(|s| Some(DateCast::Formatted(s))),
            None => Ok(Some(DateCast::Instant(instant))),
        }
    }
}

impl SchemaBuilder for DateSchema {
    fn base(&self) -> &Schema {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Schema {
        &mut self.base
    }
}

impl AnySchema for DateSchema {
    fn validate_in(&self, value: &Value, context: &ValidationContext<'_>) -> ValidationErrors {
        self.base.validate_in(value, context)
    }

    fn cast_value(&self, value: &Value) -> Result<Value, CastError> {
        Ok(match self.cast(value)? {
            None => Value::Null,
            Some(DateCast::Instant(instant)) => Value::String(instant.to_rfc3339()),
            Some(DateCast::Formatted(text)) => Value::String(text),
        })
    }
}
