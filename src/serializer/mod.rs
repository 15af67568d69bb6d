//! The `Serializer` capability (§4.3): every declared field type — primitive numeric,
//! enumeration, fixed/variable array, nested struct — implements this trait. `Mixin` is
//! deliberately absent: it has no runtime identity and is resolved away at descriptor build
//! time (see [`crate::descriptor`]).

mod array;
mod enumeration;
mod nested;
mod primitive;

pub use array::{FixedArraySerializer, VariableArraySerializer};
pub use enumeration::{EnumBuilder, EnumSerializer};
pub use nested::StructSerializer;
pub use primitive::{PrimitiveKind, PrimitiveSerializer};

use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;
use crate::settings::ResolvedSettings;
use crate::value::Value;

/// Whether a type's encoded length is known at descriptor build time (`Fixed`) or only at
/// parse time, from the remaining buffer (`Variable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Fixed(usize),
    Variable,
}

impl SizeClass {
    pub fn is_fixed(self) -> bool {
        matches!(self, SizeClass::Fixed(_))
    }
}

/// Given a value and settings, emit bytes; given bytes and settings, consume a prefix and
/// return a value plus bytes consumed. Implementations are stored behind `Arc<dyn Serializer>`
/// so a [`crate::descriptor::StructDescriptor`] stays a first-class runtime value — built,
/// shared, and introspected without code generation.
pub trait Serializer: fmt::Debug + Send + Sync {
    /// `FST` iff this serializer's encoded length is a build-time constant.
    fn size_class(&self) -> SizeClass;

    /// `Some(width)` iff `size_class()` is `Fixed`.
    fn fixed_byte_size(&self) -> Option<usize> {
        match self.size_class() {
            SizeClass::Fixed(n) => Some(n),
            SizeClass::Variable => None,
        }
    }

    /// The value a field of this type takes when no explicit default is declared.
    fn default_value(&self) -> Value;

    /// The encoded length of `value` under this serializer. The default implementation
    /// covers every FST serializer; VST serializers (`VariableArraySerializer`, and
    /// `StructSerializer` over a VST descriptor) override it.
    fn encoded_size(&self, value: &Value) -> usize {
        match self.size_class() {
            SizeClass::Fixed(n) => n,
            SizeClass::Variable => {
                let mut scratch = Vec::new();
                let settings = ResolvedSettings::default();
                // Only reached if a VST serializer forgot to override `encoded_size`;
                // correctness over performance here.
                let _ = self.format(value, &settings, &mut scratch);
                scratch.len()
            }
        }
    }

    /// Appends `value`'s encoding to `out`.
    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error>;

    /// Consumes a prefix of `input` (or, for a VST tail, the entirety of it) and returns the
    /// decoded value plus the number of bytes consumed.
    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error>;

    /// True for the unsigned 8-bit primitive only; lets `FixedArray`/`VariableArray` switch
    /// their in-memory representation to an opaque byte string (§4.3).
    fn is_byte_kind(&self) -> bool {
        false
    }
}
