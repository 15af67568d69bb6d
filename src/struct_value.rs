//! `StructValue`: a live inhabitant of a [`crate::descriptor::StructDescriptor`] — a
//! name-to-current-value map whose keys exactly equal the descriptor's field names.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::descriptor::StructDescriptor;
use crate::error::Error;
use crate::settings::Settings;
use crate::value::Value;

/// A descriptor reference plus one concrete value per field, in descriptor declaration order.
/// A `StructValue` exclusively owns its field values: nested structs and arrays are by-value
/// components, never shared (§3, Ownership).
#[derive(Debug, Clone)]
pub struct StructValue {
    descriptor: Arc<StructDescriptor>,
    values: Vec<Value>,
}

impl StructValue {
    /// Populates every field from the descriptor's defaults.
    pub fn new(descriptor: Arc<StructDescriptor>) -> Self {
        let values = descriptor.fields().iter().map(|f| f.default.clone()).collect();
        StructValue { descriptor, values }
    }

    /// Populates from defaults, then applies `overrides`. Fails `UnknownField` if a key isn't
    /// one of the descriptor's field names.
    pub fn with_initial(
        descriptor: Arc<StructDescriptor>,
        overrides: BTreeMap<String, Value>,
    ) -> Result<Self, Error> {
        let mut value = Self::new(descriptor);
        for (name, v) in overrides {
            match value.descriptor.index_of(&name) {
                Some(i) => value.values[i] = v,
                None => return Err(Error::UnknownField { name }),
            }
        }
        Ok(value)
    }

    /// Assembles a value directly from already-parsed field values, in descriptor order.
    /// Used by the engine's deserialize path; not validated here.
    pub(crate) fn from_parts(descriptor: Arc<StructDescriptor>, values: Vec<Value>) -> Self {
        StructValue { descriptor, values }
    }

    pub fn descriptor(&self) -> &Arc<StructDescriptor> {
        &self.descriptor
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.descriptor.index_of(name).map(|i| &self.values[i])
    }

    /// Writes do not run validators; validation happens only at the serialize/deserialize
    /// boundaries (§4.5).
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Error> {
        match self.descriptor.index_of(name) {
            Some(i) => {
                self.values[i] = value;
                Ok(())
            }
            None => Err(Error::UnknownField { name: name.into() }),
        }
    }

    /// `descriptor.total_fixed_size()` plus, for a VST descriptor, the current tail's encoded
    /// size.
    pub fn size(&self) -> usize {
        self.descriptor
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(f, v)| f.serializer.encoded_size(v))
            .sum()
    }

    /// Runs this value through the engine's serialize entry point (§4.6).
    pub fn serialize(&self, settings: Option<&Settings>) -> Result<Vec<u8>, Error> {
        crate::engine::serialize(self, settings)
    }
}

impl PartialEq for StructValue {
    /// Equal iff both values share a descriptor (by identity) and every field is equal.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor) && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StructDescriptor;
    use crate::serializer::{PrimitiveKind, PrimitiveSerializer};
    use alloc::string::ToString;
    use alloc::sync::Arc as StdArc;

    fn descriptor() -> Arc<StructDescriptor> {
        StructDescriptor::build()
            .field("a", StdArc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
            .field("b", StdArc::new(PrimitiveSerializer::new(PrimitiveKind::U32)), None, None)
            .finish()
            .unwrap()
    }

    #[test]
    fn new_populates_defaults() {
        let v = StructValue::new(descriptor());
        assert_eq!(v.get("a"), Some(&Value::U8(0)));
        assert_eq!(v.get("b"), Some(&Value::U32(0)));
    }

    #[test]
    fn with_initial_overrides_and_rejects_unknown_keys() {
        let mut overrides = BTreeMap::new();
        overrides.insert("a".to_string(), Value::U8(9));
        let v = StructValue::with_initial(descriptor(), overrides).unwrap();
        assert_eq!(v.get("a"), Some(&Value::U8(9)));
        assert_eq!(v.get("b"), Some(&Value::U32(0)));

        let mut bad = BTreeMap::new();
        bad.insert("nope".to_string(), Value::U8(1));
        assert!(matches!(
            StructValue::with_initial(descriptor(), bad),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn equality_requires_same_descriptor_and_values() {
        let d = descriptor();
        let a = StructValue::new(d.clone());
        let b = StructValue::new(d);
        assert_eq!(a, b);

        let other_desc = descriptor();
        let c = StructValue::new(other_desc);
        assert_ne!(a, c);
    }

    #[test]
    fn size_is_sum_of_fixed_fields() {
        let v = StructValue::new(descriptor());
        assert_eq!(v.size(), 5);
    }
}
