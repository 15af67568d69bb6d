//! The enumeration `Serializer`: a named integer with an insertion-ordered symbol table over
//! an underlying primitive integer type (default: unsigned 32-bit, per §3).

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::endian::Endian;
use crate::error::Error;
use crate::serializer::primitive::{i128_to_value, value_to_i128, PrimitiveKind, PrimitiveSerializer};
use crate::serializer::{Serializer, SizeClass};
use crate::settings::ResolvedSettings;
use crate::value::Value;

/// A fully-built enumeration type: underlying primitive, resolved endian, and the
/// name-to-literal table in declaration order.
#[derive(Debug, Clone)]
pub struct EnumSerializer {
    underlying: PrimitiveKind,
    endian: Endian,
    members: Vec<(String, i128)>,
    default_index: usize,
}

impl EnumSerializer {
    pub fn builder(underlying: PrimitiveKind) -> EnumBuilder {
        EnumBuilder {
            underlying,
            endian: Endian::default(),
            members: Vec::new(),
            default_member: None,
        }
    }

    /// The default unsigned 32-bit underlying type named in §3.
    pub fn builder_default() -> EnumBuilder {
        Self::builder(PrimitiveKind::U32)
    }

    fn primitive(&self) -> PrimitiveSerializer {
        PrimitiveSerializer::with_endian(self.underlying, self.endian)
    }

    fn literal_for(&self, tag: &str) -> Option<i128> {
        self.members
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, lit)| *lit)
    }

    fn tag_for(&self, literal: i128) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, lit)| *lit == literal)
            .map(|(name, _)| name.as_str())
    }
}

impl Serializer for EnumSerializer {
    fn size_class(&self) -> SizeClass {
        SizeClass::Fixed(self.underlying.width())
    }

    fn default_value(&self) -> Value {
        let (tag, literal) = &self.members[self.default_index];
        Value::Enum {
            tag: tag.clone(),
            literal: *literal,
        }
    }

    fn format(&self, value: &Value, settings: &ResolvedSettings, out: &mut Vec<u8>) -> Result<(), Error> {
        let literal = match value {
            Value::Enum { tag, .. } => self.literal_for(tag).ok_or_else(|| Error::InvalidValue {
                path: String::new(),
                value: value.clone(),
            })?,
            other => {
                return Err(Error::InvalidValue {
                    path: String::new(),
                    value: other.clone(),
                })
            }
        };
        self.primitive()
            .format(&i128_to_value(self.underlying, literal), settings, out)
    }

    fn parse(&self, input: &[u8], settings: &ResolvedSettings) -> Result<(Value, usize), Error> {
        let (raw, consumed) = self.primitive().parse(input, settings)?;
        let literal = value_to_i128(&raw).expect("primitive parse always yields a numeric value");
        let tag = self
            .tag_for(literal)
            .ok_or(Error::UnknownEnumLiteral { literal })?
            .to_string();
        Ok((Value::Enum { tag, literal }, consumed))
    }
}

/// Builds an [`EnumSerializer`], applying the "predecessor + 1, or 0 if first" auto-assignment
/// rule (§3) to members declared without an explicit literal.
pub struct EnumBuilder {
    underlying: PrimitiveKind,
    endian: Endian,
    members: Vec<(String, i128)>,
    default_member: Option<String>,
}

impl EnumBuilder {
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Declares a member, auto-assigning its literal as the predecessor's literal plus one
    /// (or zero if it is the first member).
    pub fn member(mut self, name: impl Into<String>) -> Self {
        let literal = self.members.last().map(|(_, lit)| lit + 1).unwrap_or(0);
        self.members.push((name.into(), literal));
        self
    }

    /// Declares a member with an explicit literal.
    pub fn member_with_value(mut self, name: impl Into<String>, literal: i128) -> Self {
        self.members.push((name.into(), literal));
        self
    }

    /// Designates the default member (used when a field declares no explicit default). Absent
    /// a call to this, the first declared member is the default, per §4.3.
    pub fn default_member(mut self, name: impl Into<String>) -> Self {
        self.default_member = Some(name.into());
        self
    }

    pub fn finish(self) -> Result<EnumSerializer, Error> {
        if !self.underlying.is_integer() {
            return Err(Error::IllFormedDescriptor {
                reason: "enum underlying type must be an integer primitive".into(),
            });
        }
        if self.members.is_empty() {
            return Err(Error::IllFormedDescriptor {
                reason: "enum must declare at least one member".into(),
            });
        }

        {
            use itertools::Itertools;
            if let Some((name, _)) = self.members.iter().duplicates_by(|(name, _)| name).next() {
                return Err(Error::IllFormedDescriptor {
                    reason: alloc::format!("duplicate enum member name `{name}`"),
                });
            }
            if let Some((_, literal)) = self.members.iter().duplicates_by(|(_, lit)| *lit).next() {
                return Err(Error::IllFormedDescriptor {
                    reason: alloc::format!("duplicate enum literal {literal}"),
                });
            }
        }

        let (lo, hi) = self.underlying.integer_range();
        for (_, literal) in &self.members {
            if *literal < lo || *literal > hi {
                return Err(Error::IllFormedDescriptor {
                    reason: alloc::format!(
                        "enum literal {literal} does not fit in underlying type range [{lo}, {hi}]"
                    ),
                });
            }
        }

        let default_index = match &self.default_member {
            Some(name) => self
                .members
                .iter()
                .position(|(n, _)| n == name)
                .ok_or_else(|| Error::IllFormedDescriptor {
                    reason: alloc::format!("default member `{name}` not declared"),
                })?,
            None => 0,
        };

        Ok(EnumSerializer {
            underlying: self.underlying,
            endian: self.endian,
            members: self.members,
            default_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_opcode() -> EnumSerializer {
        EnumSerializer::builder(PrimitiveKind::U8)
            .member_with_value("KeepAlive", 3)
            .member_with_value("Data", 15)
            .finish()
            .unwrap()
    }

    #[test]
    fn auto_assignment_is_predecessor_plus_one() {
        let e = EnumSerializer::builder(PrimitiveKind::U32)
            .member("A")
            .member("B")
            .member_with_value("C", 10)
            .member("D")
            .finish()
            .unwrap();
        assert_eq!(e.literal_for("A"), Some(0));
        assert_eq!(e.literal_for("B"), Some(1));
        assert_eq!(e.literal_for("C"), Some(10));
        assert_eq!(e.literal_for("D"), Some(11));
    }

    #[test]
    fn duplicate_literal_is_ill_formed() {
        let err = EnumSerializer::builder(PrimitiveKind::U32)
            .member_with_value("A", 0)
            .member_with_value("B", 0)
            .finish();
        assert!(matches!(err, Err(Error::IllFormedDescriptor { .. })));
    }

    #[test]
    fn unknown_literal_fails_to_parse() {
        let e = header_opcode();
        let settings = ResolvedSettings::default();
        let err = e.parse(&[0x10], &settings).unwrap_err();
        assert_eq!(err, Error::UnknownEnumLiteral { literal: 0x10 });
    }

    #[test]
    fn format_round_trip() {
        let e = header_opcode();
        let settings = ResolvedSettings::default();
        let mut out = Vec::new();
        e.format(
            &Value::Enum {
                tag: "Data".into(),
                literal: 15,
            },
            &settings,
            &mut out,
        )
        .unwrap();
        assert_eq!(out, vec![0x0F]);
        let (v, n) = e.parse(&out, &settings).unwrap();
        assert_eq!(
            v,
            Value::Enum {
                tag: "Data".into(),
                literal: 15
            }
        );
        assert_eq!(n, 1);
    }
}
