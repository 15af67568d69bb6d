//! The heterogeneous field-value representation shared by every [`crate::serializer::Serializer`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::struct_value::StructValue;

/// A live field value. One variant per primitive kind, plus the composite shapes
/// (enum member, byte string, element list, nested struct) a descriptor can produce.
// `Value::Struct` embeds a `StructValue`, which is bound to an `Arc<dyn Serializer>`-backed
// descriptor — not something `serde` can (de)serialize without the schema itself being data.
// The `serde` feature therefore only covers the plain-data configuration types (`Settings`,
// `Endian`, ...), not `Value`/`StructValue`/`StructDescriptor`; see DESIGN.md.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// A symbolic enum member together with its resolved integer literal.
    Enum { tag: String, literal: i128 },
    /// An opaque byte string — the representation for `u8` element arrays.
    Bytes(Vec<u8>),
    /// A homogeneous list of non-byte elements, for any other fixed-element array.
    List(Vec<Value>),
    /// A nested aggregate value.
    Struct(StructValue),
}

impl Value {
    /// Numeric widening used by [`crate::validator::Validator`] range checks. Returns `None`
    /// for non-numeric variants (`Bytes`, `List`, `Struct`); `Enum` widens through its literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::U8(v) => Some(*v as f64),
            Value::U16(v) => Some(*v as f64),
            Value::U32(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::I8(v) => Some(*v as f64),
            Value::I16(v) => Some(*v as f64),
            Value::I32(v) => Some(*v as f64),
            Value::I64(v) => Some(*v as f64),
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            Value::Enum { literal, .. } => Some(*literal as f64),
            Value::Bytes(_) | Value::List(_) | Value::Struct(_) => None,
        }
    }

    /// Integer widening, used by [`crate::validator::Validator::BitSize`]. `None` for floats
    /// and the composite shapes.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::U8(v) => Some(*v as i128),
            Value::U16(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            Value::I8(v) => Some(*v as i128),
            Value::I16(v) => Some(*v as i128),
            Value::I32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::Enum { literal, .. } => Some(*literal),
            Value::F32(_) | Value::F64(_) | Value::Bytes(_) | Value::List(_) | Value::Struct(_) => {
                None
            }
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l.as_slice()),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Enum { tag, literal } => write!(f, "{tag}({literal})"),
            Value::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            Value::List(l) => write!(f, "list[{}]", l.len()),
            Value::Struct(_) => write!(f, "struct"),
        }
    }
}
