//! The primitive numeric `Serializer`: signed/unsigned integers of width 1/2/4/8, and IEEE-754
//! floats of width 4/8, each with its own resolved endian policy.

use alloc::vec::Vec;

use crate::endian::{Endian, ResolvedEndian};
use crate::error::Error;
use crate::serializer::{Serializer, SizeClass};
use crate::settings::ResolvedSettings;
use crate::value::Value;

/// The ten primitive numeric kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    pub fn width(self) -> usize {
        match self {
            PrimitiveKind::U8 | PrimitiveKind::I8 => 1,
            PrimitiveKind::U16 | PrimitiveKind::I16 => 2,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::U64 | PrimitiveKind::I64 | PrimitiveKind::F64 => 8,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8 | PrimitiveKind::I16 | PrimitiveKind::I32 | PrimitiveKind::I64
        )
    }

    /// The inclusive range of integer literals this kind can hold. Only meaningful for
    /// integer kinds; used by enum descriptor construction to reject out-of-range literals.
    pub fn integer_range(self) -> (i128, i128) {
        match self {
            PrimitiveKind::U8 => (0, u8::MAX as i128),
            PrimitiveKind::U16 => (0, u16::MAX as i128),
            PrimitiveKind::U32 => (0, u32::MAX as i128),
            PrimitiveKind::U64 => (0, u64::MAX as i128),
            PrimitiveKind::I8 => (i8::MIN as i128, i8::MAX as i128),
            PrimitiveKind::I16 => (i16::MIN as i128, i16::MAX as i128),
            PrimitiveKind::I32 => (i32::MIN as i128, i32::MAX as i128),
            PrimitiveKind::I64 => (i64::MIN as i128, i64::MAX as i128),
            PrimitiveKind::F32 | PrimitiveKind::F64 => (0, 0),
        }
    }
}

/// Widens any numeric `Value` (including `Enum`, via its literal) to `i128`.
pub(crate) fn value_to_i128(value: &Value) -> Option<i128> {
    value.as_i128()
}

/// Narrows an `i128` literal down to the `Value` variant matching `kind`. Used to build the
/// underlying-primitive encoding of an enum member's literal.
pub(crate) fn i128_to_value(kind: PrimitiveKind, literal: i128) -> Value {
    match kind {
        PrimitiveKind::U8 => Value::U8(literal as u8),
        PrimitiveKind::U16 => Value::U16(literal as u16),
        PrimitiveKind::U32 => Value::U32(literal as u32),
        PrimitiveKind::U64 => Value::U64(literal as u64),
        PrimitiveKind::I8 => Value::I8(literal as i8),
        PrimitiveKind::I16 => Value::I16(literal as i16),
        PrimitiveKind::I32 => Value::I32(literal as i32),
        PrimitiveKind::I64 => Value::I64(literal as i64),
        PrimitiveKind::F32 | PrimitiveKind::F64 => {
            unreachable!("enum underlying primitive must be an integer kind")
        }
    }
}

/// A primitive numeric field: signedness + width + kind + endian policy, all folded into one
/// `PrimitiveKind` plus an `Endian`.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveSerializer {
    pub kind: PrimitiveKind,
    pub endian: Endian,
}

impl PrimitiveSerializer {
    pub fn new(kind: PrimitiveKind) -> Self {
        PrimitiveSerializer {
            kind,
            endian: Endian::default(),
        }
    }

    pub fn with_endian(kind: PrimitiveKind, endian: Endian) -> Self {
        PrimitiveSerializer { kind, endian }
    }
}

macro_rules! format_int {
    ($out:expr, $resolved:expr, $v:expr, $t:ty) => {{
        let bytes = match $resolved {
            ResolvedEndian::Big => <$t>::to_be_bytes($v),
            ResolvedEndian::Little => <$t>::to_le_bytes($v),
        };
        $out.extend_from_slice(&bytes);
    }};
}

macro_rules! parse_int {
    ($input:expr, $resolved:expr, $t:ty) => {{
        let width = core::mem::size_of::<$t>();
        if $input.len() < width {
            return Err(Error::ShortBuffer {
                needed: width,
                available: $input.len(),
            });
        }
        let mut buf = [0u8; core::mem::size_of::<$t>()];
        buf.copy_from_slice(&$input[..width]);
        let v = match $resolved {
            ResolvedEndian::Big => <$t>::from_be_bytes(buf),
            ResolvedEndian::Little => <$t>::from_le_bytes(buf),
        };
        (v, width)
    }};
}

impl Serializer for PrimitiveSerializer {
    fn size_class(&self) -> SizeClass {
        SizeClass::Fixed(self.kind.width())
    }

    fn default_value(&self) -> Value {
        match self.kind {
            PrimitiveKind::U8 => Value::U8(0),
            PrimitiveKind::U16 => Value::U16(0),
            PrimitiveKind::U32 => Value::U32(0),
            PrimitiveKind::U64 => Value::U64(0),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::I16 => Value::I16(0),
            PrimitiveKind::I32 => Value::I32(0),
            PrimitiveKind::I64 => Value::I64(0),
            PrimitiveKind::F32 => Value::F32(0.0),
            PrimitiveKind::F64 => Value::F64(0.0),
        }
    }

    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error> {
        let resolved = self.endian.resolve(settings);
        match (self.kind, value) {
            (PrimitiveKind::U8, Value::U8(v)) => out.push(*v),
            (PrimitiveKind::U16, Value::U16(v)) => format_int!(out, resolved, *v, u16),
            (PrimitiveKind::U32, Value::U32(v)) => format_int!(out, resolved, *v, u32),
            (PrimitiveKind::U64, Value::U64(v)) => format_int!(out, resolved, *v, u64),
            (PrimitiveKind::I8, Value::I8(v)) => out.push(*v as u8),
            (PrimitiveKind::I16, Value::I16(v)) => format_int!(out, resolved, *v, i16),
            (PrimitiveKind::I32, Value::I32(v)) => format_int!(out, resolved, *v, i32),
            (PrimitiveKind::I64, Value::I64(v)) => format_int!(out, resolved, *v, i64),
            (PrimitiveKind::F32, Value::F32(v)) => format_int!(out, resolved, v.to_bits(), u32),
            (PrimitiveKind::F64, Value::F64(v)) => format_int!(out, resolved, v.to_bits(), u64),
            (_, other) => {
                return Err(Error::InvalidValue {
                    path: alloc::string::String::new(),
                    value: other.clone(),
                })
            }
        }
        Ok(())
    }

    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error> {
        let resolved = self.endian.resolve(settings);
        let (value, consumed) = match self.kind {
            PrimitiveKind::U8 => {
                if input.is_empty() {
                    return Err(Error::ShortBuffer {
                        needed: 1,
                        available: 0,
                    });
                }
                (Value::U8(input[0]), 1)
            }
            PrimitiveKind::I8 => {
                if input.is_empty() {
                    return Err(Error::ShortBuffer {
                        needed: 1,
                        available: 0,
                    });
                }
                (Value::I8(input[0] as i8), 1)
            }
            PrimitiveKind::U16 => {
                let (v, n) = parse_int!(input, resolved, u16);
                (Value::U16(v), n)
            }
            PrimitiveKind::U32 => {
                let (v, n) = parse_int!(input, resolved, u32);
                (Value::U32(v), n)
            }
            PrimitiveKind::U64 => {
                let (v, n) = parse_int!(input, resolved, u64);
                (Value::U64(v), n)
            }
            PrimitiveKind::I16 => {
                let (v, n) = parse_int!(input, resolved, i16);
                (Value::I16(v), n)
            }
            PrimitiveKind::I32 => {
                let (v, n) = parse_int!(input, resolved, i32);
                (Value::I32(v), n)
            }
            PrimitiveKind::I64 => {
                let (v, n) = parse_int!(input, resolved, i64);
                (Value::I64(v), n)
            }
            PrimitiveKind::F32 => {
                let (bits, n) = parse_int!(input, resolved, u32);
                (Value::F32(f32::from_bits(bits)), n)
            }
            PrimitiveKind::F64 => {
                let (bits, n) = parse_int!(input, resolved, u64);
                (Value::F64(f64::from_bits(bits)), n)
            }
        };
        Ok((value, consumed))
    }

    fn is_byte_kind(&self) -> bool {
        matches!(self.kind, PrimitiveKind::U8)
    }
}
