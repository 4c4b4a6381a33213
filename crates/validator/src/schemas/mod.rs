//! Concrete schemas and their factory functions
//!
//! | Factory | Schema | Accepts |
//! |---------|--------|---------|
//! | [`any`] | [`Schema`] | everything |
//! | [`string`] | [`StringSchema`] | strings and scalars with a string form |
//! | [`number`] | [`NumberSchema`] | numbers and numeric strings |
//! | [`boolean`] | [`BooleanSchema`] | booleans, `"true"`, `"false"` |
//! | [`date`] | [`DateSchema`] | date strings in a given format |
//! | [`object`] | [`ObjectSchema`] | plain objects |
//! | [`array`] | [`ArraySchema`] | arrays |
//!
//! Every schema treats null as valid unless `required` is called. Most also
//! treat the empty string as absent.

pub mod array;
pub mod boolean;
#[cfg(feature = "date")]
pub mod date;
pub mod number;
pub mod object;
pub mod string;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
#[cfg(feature = "date")]
pub use date::{DEFAULT_FORMAT, DateCast, DateFormat, DateSchema};
pub use number::NumberSchema;
pub use object::{KeyValidation, ObjectSchema};
pub use string::StringSchema;

use crate::foundation::Schema;

/// A schema that accepts any value.
#[must_use]
pub fn any() -> Schema {
    Schema::new()
}

/// A string schema.
#[must_use]
pub fn string() -> StringSchema {
    StringSchema::new()
}

/// A number schema.
#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

/// A boolean schema.
#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

/// A date schema using [`DEFAULT_FORMAT`].
#[cfg(feature = "date")]
#[must_use]
pub fn date() -> DateSchema {
    DateSchema::new()
}

/// An object schema with no declared keys.
#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

/// An array schema with no element schema.
#[must_use]
pub fn array() -> ArraySchema {
    ArraySchema::new()
}
