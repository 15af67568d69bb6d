//! Byte-order policy and resolution.

use crate::settings::ResolvedSettings;

/// Byte order a primitive field (or an enum's underlying primitive) is encoded in.
///
/// `TargetDefault` defers to the ambient [`ResolvedSettings::target_endian`]; the other
/// three variants pin the field regardless of ambient settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    Big,
    Little,
    Host,
    TargetDefault,
}

impl Default for Endian {
    fn default() -> Self {
        Endian::TargetDefault
    }
}

/// The only two byte orders a resolved field can end up encoded in. `Endian::Host` and
/// `Endian::TargetDefault` are resolved away into one of these before any bytes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedEndian {
    Big,
    Little,
}

impl Endian {
    /// Resolves this field-level policy against the ambient settings snapshot.
    ///
    /// Priority: an explicit field policy wins outright; `TargetDefault` falls through to
    /// `settings.target_endian`; `Host` resolves to the machine's native order.
    pub fn resolve(self, settings: &ResolvedSettings) -> ResolvedEndian {
        match self {
            Endian::Big => ResolvedEndian::Big,
            Endian::Little => ResolvedEndian::Little,
            Endian::Host => ResolvedEndian::host(),
            Endian::TargetDefault => settings.target_endian,
        }
    }
}

impl ResolvedEndian {
    #[cfg(target_endian = "big")]
    pub const fn host() -> Self {
        ResolvedEndian::Big
    }

    #[cfg(target_endian = "little")]
    pub const fn host() -> Self {
        ResolvedEndian::Little
    }
}
