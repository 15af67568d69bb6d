//! Per-field validators: pure predicates applied at serialize/deserialize boundaries.
//!
//! Validators never mutate. Rejection is reported to the engine, which signals
//! [`crate::error::Error::InvalidValue`]; they are never consulted on plain field writes.

use alloc::sync::Arc;
use core::fmt;

use crate::value::Value;

/// A boxed predicate for [`Validator::Custom`]. `Send + Sync` so a [`crate::descriptor::StructDescriptor`]
/// built with one stays shareable across threads.
pub type CustomPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate over a decoded value.
#[derive(Clone)]
pub enum Validator {
    /// `lo <= value <= hi`, compared as `f64` so it applies to any numeric variant.
    Range(f64, f64),
    /// `value == k`.
    ExactValue(Value),
    /// For an integer `v`: `0 <= v < 2^bits` when `signed` is false, else
    /// `-2^(bits-1) <= v < 2^(bits-1)`.
    BitSize { bits: u32, signed: bool },
    /// An arbitrary predicate.
    Custom(CustomPredicate),
    AlwaysTrue,
    AlwaysFalse,
}

impl Validator {
    /// Convenience constructor for [`Validator::Custom`] from a plain function or closure —
    /// "a bare predicate function is acceptable anywhere a validator is" (§4.2).
    pub fn custom<F>(f: F) -> Validator
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(f))
    }

    pub fn check(&self, value: &Value) -> bool {
        match self {
            Validator::Range(lo, hi) => match value.as_f64() {
                Some(v) => *lo <= v && v <= *hi,
                None => false,
            },
            Validator::ExactValue(expected) => value == expected,
            Validator::BitSize { bits, signed } => match value.as_i128() {
                Some(v) => {
                    if *signed {
                        let half = 1i128 << (bits - 1);
                        -half <= v && v < half
                    } else {
                        let bound = 1i128 << *bits;
                        0 <= v && v < bound
                    }
                }
                None => false,
            },
            Validator::Custom(f) => f(value),
            Validator::AlwaysTrue => true,
            Validator::AlwaysFalse => false,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Range(lo, hi) => f.debug_tuple("Range").field(lo).field(hi).finish(),
            Validator::ExactValue(v) => f.debug_tuple("ExactValue").field(v).finish(),
            Validator::BitSize { bits, signed } => f
                .debug_struct("BitSize")
                .field("bits", bits)
                .field("signed", signed)
                .finish(),
            Validator::Custom(_) => f.write_str("Custom(..)"),
            Validator::AlwaysTrue => f.write_str("AlwaysTrue"),
            Validator::AlwaysFalse => f.write_str("AlwaysFalse"),
        }
    }
}

impl<F> From<F> for Validator
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Validator::custom(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks_inclusive_bounds() {
        let v = Validator::Range(-15.0, 15.0);
        assert!(v.check(&Value::I8(-15)));
        assert!(v.check(&Value::I8(15)));
        assert!(!v.check(&Value::I8(16)));
    }

    #[test]
    fn bitsize_unsigned() {
        let v = Validator::BitSize {
            bits: 4,
            signed: false,
        };
        assert!(v.check(&Value::U8(15)));
        assert!(!v.check(&Value::U8(16)));
    }

    #[test]
    fn bitsize_signed() {
        let v = Validator::BitSize {
            bits: 4,
            signed: true,
        };
        assert!(v.check(&Value::I8(-8)));
        assert!(v.check(&Value::I8(7)));
        assert!(!v.check(&Value::I8(-9)));
        assert!(!v.check(&Value::I8(8)));
    }

    #[test]
    fn exact_value() {
        let v = Validator::ExactValue(Value::U8(3));
        assert!(v.check(&Value::U8(3)));
        assert!(!v.check(&Value::U8(4)));
    }

    #[test]
    fn custom_from_closure() {
        let v: Validator = (|val: &Value| val.as_i128().map(|i| i % 2 == 0).unwrap_or(false)).into();
        assert!(v.check(&Value::U8(4)));
        assert!(!v.check(&Value::U8(5)));
    }

    #[test]
    fn always_true_false() {
        assert!(Validator::AlwaysTrue.check(&Value::U8(0)));
        assert!(!Validator::AlwaysFalse.check(&Value::U8(0)));
    }
}
