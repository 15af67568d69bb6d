//! `StructDescriptor`: an ordered, named sequence of fields plus the layout calculus (§4.4)
//! that derives its fixed size and FST/VST size class. Built through a runtime builder —
//! this crate's declared declaration surface; a derive macro layered on top is an external
//! collaborator (§1).

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use derivative::Derivative;

use crate::error::Error;
use crate::serializer::{Serializer, SizeClass};
use crate::settings::{ResolvedSettings, Settings};
use crate::struct_value::StructValue;
use crate::validator::Validator;
use crate::value::Value;

/// A hook run before a value is formatted, after defaults/overrides are applied to the
/// working copy. May mutate the value (e.g. recomputing a length field), mirroring the
/// `data_length` pattern called out in the design notes.
pub type BeforeSerializeHook = Arc<dyn Fn(&mut StructValue) + Send + Sync>;
/// A hook run after a value has been formatted. Cannot affect the bytes already emitted.
pub type AfterSerializeHook = Arc<dyn Fn(&mut StructValue) + Send + Sync>;
/// The top-level `validate` hook dispatched by `deserialize` when `settings.validate` is set.
/// The default (no hook installed) runs each field's own validator.
pub type ValidateHook = Arc<dyn Fn(&StructValue) -> bool + Send + Sync>;

/// One declared field: name, serializer, default value, and optional validator.
#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub serializer: Arc<dyn Serializer>,
    pub default: Value,
    pub validator: Option<Validator>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("serializer", &self.serializer)
            .field("default", &self.default)
            .field("validator", &self.validator)
            .finish()
    }
}

/// Immutable aggregate metadata: field ordering, types, defaults, validators, and the derived
/// `fixed_size`/`size_class` from §4.4. Shareable across threads and across many `StructValue`s
/// via `Arc`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct StructDescriptor {
    fields: Vec<Field>,
    fixed_size: usize,
    size_class: SizeClass,
    #[derivative(Debug = "ignore")]
    before_serialize: Option<BeforeSerializeHook>,
    #[derivative(Debug = "ignore")]
    after_serialize: Option<AfterSerializeHook>,
    #[derivative(Debug = "ignore")]
    validate: Option<ValidateHook>,
}

impl StructDescriptor {
    pub fn build() -> StructDescriptorBuilder {
        StructDescriptorBuilder::new()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of the fixed-size fields' widths; excludes the VST tail field, if any.
    pub fn total_fixed_size(&self) -> usize {
        self.fixed_size
    }

    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    pub fn is_fixed(&self) -> bool {
        self.size_class.is_fixed()
    }

    pub fn before_serialize_hook(&self) -> Option<&BeforeSerializeHook> {
        self.before_serialize.as_ref()
    }

    pub fn after_serialize_hook(&self) -> Option<&AfterSerializeHook> {
        self.after_serialize.as_ref()
    }

    pub fn validate_hook(&self) -> Option<&ValidateHook> {
        self.validate.as_ref()
    }

    /// The default `validate` behavior (§4.6): every field's own validator, if any, must
    /// accept the field's current value.
    pub fn run_default_validation(&self, value: &StructValue) -> Result<(), Error> {
        for field in &self.fields {
            if let Some(validator) = &field.validator {
                let current = value.get(&field.name).expect("StructValue keys match descriptor fields");
                if !validator.check(current) {
                    return Err(Error::InvalidValue {
                        path: field.name.clone(),
                        value: current.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Appends `value`'s field encodings to `out` in declaration order. Used both by the
    /// top-level engine and by `StructSerializer` for nested aggregates.
    pub(crate) fn format_fields(
        &self,
        value: &StructValue,
        settings: &ResolvedSettings,
        out: &mut Vec<u8>,
    ) -> Result<(), Error> {
        for field in &self.fields {
            let current = value.get(&field.name).expect("StructValue keys match descriptor fields");
            field
                .serializer
                .format(current, settings, out)
                .map_err(|e| e.prefix_path(&field.name))?;
        }
        Ok(())
    }

    /// Parses `bytes` into a `StructValue` bound to `descriptor`. Does not dispatch hooks or
    /// run validation; the engine (or a `StructSerializer` wrapping a nested aggregate) is
    /// responsible for that.
    pub(crate) fn parse_fields(
        descriptor: &Arc<StructDescriptor>,
        bytes: &[u8],
        settings: &ResolvedSettings,
    ) -> Result<(StructValue, usize), Error> {
        if bytes.len() < descriptor.fixed_size {
            return Err(Error::ShortBuffer {
                needed: descriptor.fixed_size,
                available: bytes.len(),
            });
        }

        let mut values = Vec::with_capacity(descriptor.fields.len());
        let mut cursor = 0usize;

        // Every field parses from the running cursor. A VST tail field receives the entire
        // remaining slice and is expected (by construction) to consume all of it; a fixed
        // field consumes only its own width regardless of how much of the buffer remains.
        for field in &descriptor.fields {
            let (value, consumed) = field
                .serializer
                .parse(&bytes[cursor..], settings)
                .map_err(|e| e.prefix_path(&field.name))?;
            cursor += consumed;
            values.push(value);
        }

        if descriptor.size_class.is_fixed() && cursor != bytes.len() {
            return Err(Error::TrailingBytes {
                consumed: cursor,
                available: bytes.len(),
            });
        }

        Ok((
            StructValue::from_parts(descriptor.clone(), values),
            cursor,
        ))
    }
}

/// One pending builder entry, prior to mixin expansion.
enum Entry {
    Field(Field),
    Mixin {
        fields: Vec<Field>,
    },
}

/// Builds a [`StructDescriptor`] by accumulating fields (and mixins) in declaration order,
/// then running the construction algorithm of §4.4 at [`StructDescriptorBuilder::finish`].
pub struct StructDescriptorBuilder {
    entries: Vec<Entry>,
    before_serialize: Option<BeforeSerializeHook>,
    after_serialize: Option<AfterSerializeHook>,
    validate: Option<ValidateHook>,
}

impl StructDescriptorBuilder {
    fn new() -> Self {
        StructDescriptorBuilder {
            entries: Vec::new(),
            before_serialize: None,
            after_serialize: None,
            validate: None,
        }
    }

    /// Declares a field. `default` of `None` means "use the serializer's own default value";
    /// `Some(v)` is validated against `validator` (if any) at `finish()` time, per §4.4 step 5.
    pub fn field(
        mut self,
        name: impl Into<String>,
        serializer: Arc<dyn Serializer>,
        default: impl Into<Option<Value>>,
        validator: impl Into<Option<Validator>>,
    ) -> Self {
        let default = default.into().unwrap_or_else(|| serializer.default_value());
        self.entries.push(Entry::Field(Field {
            name: name.into(),
            serializer,
            default,
            validator: validator.into(),
        }));
        self
    }

    /// Inlines `target`'s fields into this descriptor, prefixing each name with `prefix` if
    /// given. `target` is already a fully-built descriptor, so its fields are already
    /// concrete — no further mixin recursion is needed here.
    pub fn mixin(mut self, target: &Arc<StructDescriptor>, prefix: Option<&str>) -> Self {
        let fields = target
            .fields()
            .iter()
            .map(|f| {
                let name = match prefix {
                    Some(p) => format!("{p}{}", f.name),
                    None => f.name.clone(),
                };
                Field {
                    name,
                    serializer: f.serializer.clone(),
                    default: f.default.clone(),
                    validator: f.validator.clone(),
                }
            })
            .collect();
        self.entries.push(Entry::Mixin { fields });
        self
    }

    pub fn before_serialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StructValue) + Send + Sync + 'static,
    {
        self.before_serialize = Some(Arc::new(hook));
        self
    }

    pub fn after_serialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StructValue) + Send + Sync + 'static,
    {
        self.after_serialize = Some(Arc::new(hook));
        self
    }

    pub fn validate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StructValue) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(hook));
        self
    }

    /// Runs the construction algorithm of §4.4: expand mixins, verify name uniqueness, place
    /// the (at most one, trailing) VST field, compute `fixed_size`/`size_class`, and validate
    /// explicit defaults.
    pub fn finish(self) -> Result<Arc<StructDescriptor>, Error> {
        let mut fields = Vec::new();
        for entry in self.entries {
            match entry {
                Entry::Field(f) => fields.push(f),
                Entry::Mixin { fields: mut mf } => fields.append(&mut mf),
            }
        }

        {
            use itertools::Itertools;
            if let Some(name) = fields.iter().map(|f| &f.name).duplicates().next() {
                return Err(Error::IllFormedDescriptor {
                    reason: format!("duplicate field name `{name}`"),
                });
            }
        }

        let last_index = fields.len().checked_sub(1);
        for (i, field) in fields.iter().enumerate() {
            let is_last = Some(i) == last_index;
            if !field.serializer.size_class().is_fixed() && !is_last {
                return Err(Error::IllFormedDescriptor {
                    reason: format!(
                        "field `{}` is variable-size but is not the last field",
                        field.name
                    ),
                });
            }
        }

        let is_vst = matches!(fields.last(), Some(last) if !last.serializer.size_class().is_fixed());
        let fixed_size: usize = fields
            .iter()
            .filter_map(|f| f.serializer.fixed_byte_size())
            .sum();
        let size_class = if is_vst {
            SizeClass::Variable
        } else {
            SizeClass::Fixed(fixed_size)
        };

        for field in &fields {
            if let Some(validator) = &field.validator {
                if !validator.check(&field.default) {
                    return Err(Error::InvalidDefault {
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(Arc::new(StructDescriptor {
            fields,
            fixed_size,
            size_class,
            before_serialize: self.before_serialize,
            after_serialize: self.after_serialize,
            validate: self.validate,
        }))
    }
}

impl fmt::Debug for StructDescriptorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDescriptorBuilder")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// `descriptor.new_value()` / `descriptor.deserialize(bytes, settings?)` (§6). Implemented as
/// an extension trait over `Arc<StructDescriptor>` rather than an inherent method taking
/// `self: Arc<Self>`, which would need an unstable feature.
pub trait DescriptorOps {
    fn new_value(&self) -> StructValue;
    fn deserialize(&self, bytes: &[u8], settings: Option<&Settings>) -> Result<StructValue, Error>;
}

impl DescriptorOps for Arc<StructDescriptor> {
    fn new_value(&self) -> StructValue {
        StructValue::new(self.clone())
    }

    fn deserialize(&self, bytes: &[u8], settings: Option<&Settings>) -> Result<StructValue, Error> {
        crate::engine::deserialize(bytes, self, settings)
    }
}
