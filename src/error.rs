//! Error kinds surfaced by descriptor construction and the (de)serialization engine.

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::value::Value;

/// Everything that can go wrong building a [`crate::descriptor::StructDescriptor`] or running
/// the engine over one. Named, not typed, matching the plain enum style used for wire-format
/// errors elsewhere in this niche: no `thiserror`, `Display` written by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Deserialize input shorter than the descriptor's fixed size requires.
    ShortBuffer { needed: usize, available: usize },
    /// An FST descriptor's input had bytes left over past its fixed size.
    TrailingBytes { consumed: usize, available: usize },
    /// A `VariableArray` tail was not an exact multiple of its element size.
    TailAlignment { tail_len: usize, element_size: usize },
    /// A `VariableArray` element count fell outside its declared bounds.
    ArrayLengthOutOfRange {
        len: usize,
        lo: usize,
        hi: Option<usize>,
    },
    /// A `FixedArray` value held more elements than the array declares.
    ArrayOverflow { len: usize, declared: usize },
    /// A parsed integer literal has no matching enum member.
    UnknownEnumLiteral { literal: i128 },
    /// A validator rejected a value. `path` is dot-separated from the root aggregate.
    InvalidValue { path: String, value: Value },
    /// A declared field default failed its own validator at descriptor build time.
    InvalidDefault { field: String },
    /// `with_initial` referenced a name absent from the descriptor.
    UnknownField { name: String },
    /// The descriptor's user `validate` hook returned false.
    ValidationFailed,
    /// The descriptor itself is ill-formed (VST not last, duplicate names, ...).
    IllFormedDescriptor { reason: String },
}

impl Error {
    /// Prepends `name` to an `InvalidValue` path, building a dot-separated path as the error
    /// bubbles up through nested structs. Other variants pass through unchanged.
    pub(crate) fn prefix_path(self, name: &str) -> Error {
        match self {
            Error::InvalidValue { path, value } => Error::InvalidValue {
                path: format!("{name}.{path}"),
                value,
            },
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShortBuffer { needed, available } => write!(
                f,
                "buffer too short: needed at least {needed} bytes, got {available}"
            ),
            Error::TrailingBytes {
                consumed,
                available,
            } => write!(
                f,
                "trailing bytes: consumed {consumed} of {available} for a fixed-size descriptor"
            ),
            Error::TailAlignment {
                tail_len,
                element_size,
            } => write!(
                f,
                "variable array tail of {tail_len} bytes is not a multiple of element size {element_size}"
            ),
            Error::ArrayLengthOutOfRange { len, lo, hi } => match hi {
                Some(hi) => write!(f, "array length {len} out of range [{lo}, {hi}]"),
                None => write!(f, "array length {len} out of range [{lo}, inf)"),
            },
            Error::ArrayOverflow { len, declared } => {
                write!(f, "array of {len} elements overflows fixed length {declared}")
            }
            Error::UnknownEnumLiteral { literal } => {
                write!(f, "literal {literal} has no matching enum member")
            }
            Error::InvalidValue { path, value } => {
                write!(f, "validator rejected value {value:?} at `{path}`")
            }
            Error::InvalidDefault { field } => {
                write!(f, "default value for field `{field}` fails its own validator")
            }
            Error::UnknownField { name } => write!(f, "unknown field `{name}`"),
            Error::ValidationFailed => write!(f, "validate hook returned false"),
            Error::IllFormedDescriptor { reason } => write!(f, "ill-formed descriptor: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_path_only_touches_invalid_value() {
        let err = Error::InvalidValue {
            path: "bar".into(),
            value: Value::U8(1),
        };
        let prefixed = err.prefix_path("foo");
        match prefixed {
            Error::InvalidValue { path, .. } => assert_eq!(path, "foo.bar"),
            _ => panic!("expected InvalidValue"),
        }

        let err = Error::ValidationFailed;
        assert_eq!(err.clone().prefix_path("foo"), err);
    }
}
