//! The `NestedStruct` `Serializer`: delegates to the referenced descriptor's own field
//! encoding, with no framing or padding at the boundary (§4.3, §6).

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::descriptor::StructDescriptor;
use crate::error::Error;
use crate::serializer::{Serializer, SizeClass};
use crate::settings::ResolvedSettings;
use crate::struct_value::StructValue;
use crate::value::Value;

/// Wraps a built [`StructDescriptor`] so it can be used as a field type inside another
/// descriptor. FST iff the wrapped descriptor is FST.
#[derive(Debug, Clone)]
pub struct StructSerializer {
    descriptor: Arc<StructDescriptor>,
}

impl StructSerializer {
    pub fn new(descriptor: Arc<StructDescriptor>) -> Self {
        StructSerializer { descriptor }
    }
}

impl Serializer for StructSerializer {
    fn size_class(&self) -> SizeClass {
        self.descriptor.size_class()
    }

    fn default_value(&self) -> Value {
        Value::Struct(StructValue::new(self.descriptor.clone()))
    }

    fn encoded_size(&self, value: &Value) -> usize {
        match value {
            Value::Struct(s) => s.size(),
            _ => 0,
        }
    }

    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error> {
        let inner = value.as_struct().ok_or_else(|| Error::InvalidValue {
            path: alloc::string::String::new(),
            value: value.clone(),
        })?;
        self.descriptor.format_fields(inner, settings, out)
    }

    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error> {
        let (value, consumed) = StructDescriptor::parse_fields(&self.descriptor, input, settings)?;
        Ok((Value::Struct(value), consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::{PrimitiveKind, PrimitiveSerializer};

    fn header_descriptor() -> Arc<StructDescriptor> {
        StructDescriptor::build()
            .field("a", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
            .field("b", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U32)), None, None)
            .finish()
            .unwrap()
    }

    #[test]
    fn fst_nested_struct_round_trips() {
        let desc = header_descriptor();
        let s = StructSerializer::new(desc.clone());
        let settings = ResolvedSettings::default();
        let mut value = StructValue::new(desc);
        value.set("a", Value::U8(7)).unwrap();
        value.set("b", Value::U32(99)).unwrap();

        let mut out = Vec::new();
        s.format(&Value::Struct(value.clone()), &settings, &mut out).unwrap();
        assert_eq!(out.len(), 5);

        let (parsed, consumed) = s.parse(&out, &settings).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(parsed, Value::Struct(value));
    }
}
