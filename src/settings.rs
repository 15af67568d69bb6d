//! Ambient configuration. No process-wide mutable statics: a [`Settings`] value is resolved
//! into a [`ResolvedSettings`] snapshot at each call entry, per the concurrency notes in the
//! module-level docs — a single `serialize`/`deserialize` call is then immune to concurrent
//! edits of whatever `Settings` the caller holds.

use crate::endian::{Endian, ResolvedEndian};

/// Caller-facing configuration. Passed by value (or by `&Settings`) into `serialize` /
/// `deserialize`; `None` at those call sites means "use [`Settings::default()`]".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Default byte order for primitive fields that don't pin their own endian policy.
    pub target_endian: Endian,
    /// Gate deserialize-time validation (the `validate` hook, or the default per-field pass).
    pub validate: bool,
    /// Also validate before serializing.
    pub validate_on_serialize: bool,
    /// Suppress `before_serialize` / `after_serialize` hook dispatch.
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            target_endian: Endian::TargetDefault,
            validate: true,
            validate_on_serialize: false,
            dry_run: false,
        }
    }
}

impl Settings {
    /// Convert the settings into a JSON string.
    ///
    /// This is implemented as infallible because serde_json will fail only if the type can't
    /// serialize one of its attributes, and `Settings` is trivially serializable.
    #[cfg(all(feature = "serde", feature = "alloc"))]
    pub fn to_json(&self) -> alloc::string::String {
        serde_json::to_string(self).unwrap_or_else(|e| alloc::format!(r#"{{"error": "{}"}}"#, e))
    }

    /// Attempt to parse settings from a JSON string, returning `None` if it fails.
    #[cfg(all(feature = "serde", feature = "alloc"))]
    pub fn from_json<J>(json: J) -> Option<Self>
    where
        J: AsRef<str>,
    {
        serde_json::from_str(json.as_ref()).ok()
    }

    /// Snapshots this configuration, resolving `target_endian` down to an unambiguous byte
    /// order so the engine never has to re-resolve `Host`/`TargetDefault` mid-call.
    pub fn resolve(self) -> ResolvedSettings {
        let target_endian = match self.target_endian {
            Endian::Big => ResolvedEndian::Big,
            Endian::Little => ResolvedEndian::Little,
            Endian::Host | Endian::TargetDefault => ResolvedEndian::host(),
        };
        ResolvedSettings {
            target_endian,
            validate: self.validate,
            validate_on_serialize: self.validate_on_serialize,
            dry_run: self.dry_run,
        }
    }

    /// Resolves `override_settings` if present, else falls back to `self.resolve()`. This is
    /// the "ambient -> per-call override" flow of §4.7: an explicit per-call `Settings` wins
    /// outright over the ambient default.
    pub fn resolve_with_override(self, override_settings: Option<&Settings>) -> ResolvedSettings {
        match override_settings {
            Some(s) => s.resolve(),
            None => self.resolve(),
        }
    }
}

/// An immutable snapshot of [`Settings`] with `target_endian` already resolved to `Big` or
/// `Little`. The engine and every [`crate::serializer::Serializer`] operate on this, never on
/// `Settings` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedSettings {
    pub target_endian: ResolvedEndian,
    pub validate: bool,
    pub validate_on_serialize: bool,
    pub dry_run: bool,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Settings::default().resolve()
    }
}
