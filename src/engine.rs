//! The top-level serialize/deserialize driver (§4.6): hook dispatch, validation, VST tail
//! handling via [`crate::descriptor::StructDescriptor::format_fields`] /
//! [`crate::descriptor::StructDescriptor::parse_fields`], and error propagation.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::descriptor::StructDescriptor;
use crate::error::Error;
use crate::settings::Settings;
use crate::struct_value::StructValue;

/// `StructValue --(descriptor+settings)--> Engine --(per-field Serializer)--> byte buffer`.
///
/// Steps, per §4.6:
/// 1. `before_serialize` dispatch (unless `dry_run`), on a working copy — the hook may mutate
///    the value it's about to serialize (e.g. to recompute a length field).
/// 2. If `validate_on_serialize`, run every field's validator.
/// 3. Allocate an output buffer sized to the value's current byte length.
/// 4. Format each field in declaration order.
/// 5. `after_serialize` dispatch (unless `dry_run`).
pub fn serialize(value: &StructValue, settings: Option<&Settings>) -> Result<Vec<u8>, Error> {
    let ambient = Settings::default();
    let resolved = ambient.resolve_with_override(settings);
    let descriptor = value.descriptor().clone();
    let mut working = value.clone();

    if !resolved.dry_run {
        if let Some(hook) = descriptor.before_serialize_hook() {
            log::trace!("dispatching before_serialize hook");
            hook(&mut working);
        }
    }

    if resolved.validate_on_serialize {
        descriptor.run_default_validation(&working).map_err(|e| {
            log::debug!("validate_on_serialize rejected value: {e}");
            e
        })?;
    }

    let mut out = Vec::with_capacity(working.size());
    descriptor.format_fields(&working, &resolved, &mut out)?;

    if !resolved.dry_run {
        if let Some(hook) = descriptor.after_serialize_hook() {
            log::trace!("dispatching after_serialize hook");
            hook(&mut working);
        }
    }

    Ok(out)
}

/// `bytes + StructDescriptor + settings --> Engine --> StructValue (validated)`.
///
/// Steps, per §4.6:
/// 1. Check `len(bytes) >= descriptor.total_fixed_size()`.
/// 2. Parse each fixed-size field from the running cursor.
/// 3. If the descriptor is VST, hand the remaining slice to the tail field; otherwise fail if
///    bytes remain unconsumed.
/// 4. Construct the `StructValue`.
/// 5. If `settings.validate`, run the `validate` hook (default: every field's own validator).
pub fn deserialize(
    bytes: &[u8],
    descriptor: &Arc<StructDescriptor>,
    settings: Option<&Settings>,
) -> Result<StructValue, Error> {
    let ambient = Settings::default();
    let resolved = ambient.resolve_with_override(settings);

    let (value, consumed) = StructDescriptor::parse_fields(descriptor, bytes, &resolved)?;
    log::trace!("parsed {consumed} of {} input bytes", bytes.len());

    if resolved.validate {
        match descriptor.validate_hook() {
            Some(hook) => {
                if !hook(&value) {
                    log::debug!("validate hook rejected deserialized value");
                    return Err(Error::ValidationFailed);
                }
            }
            None => {
                descriptor.run_default_validation(&value).map_err(|e| {
                    log::debug!("default field validation rejected deserialized value: {e}");
                    e
                })?;
            }
        }
    }

    Ok(value)
}
