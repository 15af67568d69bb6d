//! Array `Serializer`s: `FixedArray(n, element)` (FST) and `VariableArray(lo, hi, element)`
//! (VST). Both require a fixed-size element; only the outermost array in a descriptor may be
//! variable-length (enforced by descriptor construction, not here).

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::Error;
use crate::serializer::{Serializer, SizeClass};
use crate::settings::ResolvedSettings;
use crate::value::Value;

/// `FixedArray(n, element)`. Serializes exactly `n` elements, padding short values with the
/// element's default and rejecting longer ones as `ArrayOverflow`.
#[derive(Debug, Clone)]
pub struct FixedArraySerializer {
    n: usize,
    element: Arc<dyn Serializer>,
    element_size: usize,
}

impl FixedArraySerializer {
    /// Fails `IllFormedDescriptor` if `element` is not itself fixed-size.
    pub fn new(n: usize, element: Arc<dyn Serializer>) -> Result<Self, Error> {
        let element_size = element.fixed_byte_size().ok_or_else(|| Error::IllFormedDescriptor {
            reason: "FixedArray element must be a fixed-size type".into(),
        })?;
        Ok(FixedArraySerializer {
            n,
            element,
            element_size,
        })
    }
}

impl Serializer for FixedArraySerializer {
    fn size_class(&self) -> SizeClass {
        SizeClass::Fixed(self.n * self.element_size)
    }

    fn default_value(&self) -> Value {
        if self.element.is_byte_kind() {
            Value::Bytes(alloc::vec![0u8; self.n])
        } else {
            Value::List(alloc::vec![self.element.default_value(); self.n])
        }
    }

    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error> {
        if self.element.is_byte_kind() {
            let bytes = value.as_bytes().ok_or_else(|| Error::InvalidValue {
                path: alloc::string::String::new(),
                value: value.clone(),
            })?;
            if bytes.len() > self.n {
                return Err(Error::ArrayOverflow {
                    len: bytes.len(),
                    declared: self.n,
                });
            }
            out.extend_from_slice(bytes);
            out.resize(out.len() + (self.n - bytes.len()), 0u8);
            return Ok(());
        }

        let elements = value.as_list().ok_or_else(|| Error::InvalidValue {
            path: alloc::string::String::new(),
            value: value.clone(),
        })?;
        if elements.len() > self.n {
            return Err(Error::ArrayOverflow {
                len: elements.len(),
                declared: self.n,
            });
        }
        for element in elements {
            self.element.format(element, settings, out)?;
        }
        let default = self.element.default_value();
        for _ in elements.len()..self.n {
            self.element.format(&default, settings, out)?;
        }
        Ok(())
    }

    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error> {
        let total = self.n * self.element_size;
        if input.len() < total {
            return Err(Error::ShortBuffer {
                needed: total,
                available: input.len(),
            });
        }

        if self.element.is_byte_kind() {
            return Ok((Value::Bytes(input[..total].to_vec()), total));
        }

        let mut elements = Vec::with_capacity(self.n);
        let mut cursor = 0;
        for _ in 0..self.n {
            let (value, consumed) = self.element.parse(&input[cursor..], settings)?;
            cursor += consumed;
            elements.push(value);
        }
        Ok((Value::List(elements), cursor))
    }

    fn is_byte_kind(&self) -> bool {
        false
    }
}

/// `VariableArray(lo, hi, element)`, a VST: the element count is not encoded, only recovered
/// at parse time by dividing the remaining tail buffer by the element size.
#[derive(Debug, Clone)]
pub struct VariableArraySerializer {
    lo: usize,
    hi: Option<usize>,
    element: Arc<dyn Serializer>,
    element_size: usize,
}

impl VariableArraySerializer {
    /// Fails `IllFormedDescriptor` if `element` is not itself fixed-size.
    pub fn new(lo: usize, hi: Option<usize>, element: Arc<dyn Serializer>) -> Result<Self, Error> {
        let element_size = element.fixed_byte_size().ok_or_else(|| Error::IllFormedDescriptor {
            reason: "VariableArray element must be a fixed-size type".into(),
        })?;
        Ok(VariableArraySerializer {
            lo,
            hi,
            element,
            element_size,
        })
    }

    fn in_bounds(&self, c: usize) -> bool {
        c >= self.lo && self.hi.map(|hi| c <= hi).unwrap_or(true)
    }
}

impl Serializer for VariableArraySerializer {
    fn size_class(&self) -> SizeClass {
        SizeClass::Variable
    }

    fn default_value(&self) -> Value {
        if self.element.is_byte_kind() {
            Value::Bytes(Vec::new())
        } else {
            Value::List(Vec::new())
        }
    }

    fn encoded_size(&self, value: &Value) -> usize {
        let c = match value {
            Value::Bytes(b) => b.len(),
            Value::List(l) => l.len(),
            _ => 0,
        };
        c * self.element_size
    }

    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error> {
        if self.element.is_byte_kind() {
            let bytes = value.as_bytes().ok_or_else(|| Error::InvalidValue {
                path: alloc::string::String::new(),
                value: value.clone(),
            })?;
            if !self.in_bounds(bytes.len()) {
                return Err(Error::ArrayLengthOutOfRange {
                    len: bytes.len(),
                    lo: self.lo,
                    hi: self.hi,
                });
            }
            out.extend_from_slice(bytes);
            return Ok(());
        }

        let elements = value.as_list().ok_or_else(|| Error::InvalidValue {
            path: alloc::string::String::new(),
            value: value.clone(),
        })?;
        if !self.in_bounds(elements.len()) {
            return Err(Error::ArrayLengthOutOfRange {
                len: elements.len(),
                lo: self.lo,
                hi: self.hi,
            });
        }
        for element in elements {
            self.element.format(element, settings, out)?;
        }
        Ok(())
    }

    /// Only ever invoked by the engine with the full remaining tail buffer (§4.3).
    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error> {
        if input.len() % self.element_size != 0 {
            return Err(Error::TailAlignment {
                tail_len: input.len(),
                element_size: self.element_size,
            });
        }
        let c = input.len() / self.element_size;
        if !self.in_bounds(c) {
            return Err(Error::ArrayLengthOutOfRange {
                len: c,
                lo: self.lo,
                hi: self.hi,
            });
        }

        if self.element.is_byte_kind() {
            return Ok((Value::Bytes(input.to_vec()), input.len()));
        }

        let mut elements = Vec::with_capacity(c);
        let mut cursor = 0;
        for _ in 0..c {
            let (value, consumed) = self.element.parse(&input[cursor..], settings)?;
            cursor += consumed;
            elements.push(value);
        }
        Ok((Value::List(elements), cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{PrimitiveKind, PrimitiveSerializer};

    fn u8_serializer() -> Arc<dyn Serializer> {
        Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8))
    }

    fn u32_serializer() -> Arc<dyn Serializer> {
        Arc::new(PrimitiveSerializer::new(PrimitiveKind::U32))
    }

    #[test]
    fn fixed_array_of_bytes_pads_short_values() {
        let arr = FixedArraySerializer::new(4, u8_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let mut out = Vec::new();
        arr.format(&Value::Bytes(vec![1, 2]), &settings, &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 0, 0]);
    }

    #[test]
    fn fixed_array_overflow() {
        let arr = FixedArraySerializer::new(2, u8_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let mut out = Vec::new();
        let err = arr.format(&Value::Bytes(vec![1, 2, 3]), &settings, &mut out).unwrap_err();
        assert_eq!(err, Error::ArrayOverflow { len: 3, declared: 2 });
    }

    #[test]
    fn fixed_array_of_u32_pads_with_element_default() {
        let arr = FixedArraySerializer::new(2, u32_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let mut out = Vec::new();
        arr.format(&Value::List(vec![Value::U32(7)]), &settings, &mut out).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(&out[0..4], &7u32.to_be_bytes());
        assert_eq!(&out[4..8], &0u32.to_be_bytes());
    }

    #[test]
    fn variable_array_tail_alignment() {
        let arr = VariableArraySerializer::new(0, None, u32_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let err = arr.parse(&[1, 2, 3], &settings).unwrap_err();
        assert_eq!(
            err,
            Error::TailAlignment {
                tail_len: 3,
                element_size: 4
            }
        );
    }

    #[test]
    fn variable_array_bounds() {
        let arr = VariableArraySerializer::new(1, Some(2), u8_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let err = arr.parse(&[], &settings).unwrap_err();
        assert_eq!(err, Error::ArrayLengthOutOfRange { len: 0, lo: 1, hi: Some(2) });
    }

    #[test]
    fn variable_array_round_trip() {
        let arr = VariableArraySerializer::new(0, None, u8_serializer()).unwrap();
        let settings = ResolvedSettings::default();
        let (value, consumed) = arr.parse(&[0x41, 0x42, 0x43], &settings).unwrap();
        assert_eq!(value, Value::Bytes(vec![0x41, 0x42, 0x43]));
        assert_eq!(consumed, 3);
    }
}
