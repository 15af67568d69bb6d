//! Universal properties (§8) exercised as `quickcheck` properties over arbitrary field values.

use std::sync::Arc;

use binstruct::descriptor::DescriptorOps;
use binstruct::serializer::{PrimitiveKind, PrimitiveSerializer, VariableArraySerializer};
use binstruct::{Endian, StructDescriptor, Value};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn fst_descriptor() -> Arc<StructDescriptor> {
    StructDescriptor::build()
        .field("a", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
        .field(
            "b",
            Arc::new(PrimitiveSerializer::with_endian(PrimitiveKind::U32, Endian::Little)),
            None,
            None,
        )
        .finish()
        .unwrap()
}

fn vst_descriptor() -> Arc<StructDescriptor> {
    StructDescriptor::build()
        .field(
            "n",
            Arc::new(PrimitiveSerializer::with_endian(PrimitiveKind::U16, Endian::Little)),
            None,
            None,
        )
        .field(
            "tail",
            Arc::new(
                VariableArraySerializer::new(0, None, Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8))).unwrap(),
            ),
            None,
            None,
        )
        .finish()
        .unwrap()
}

/// Property 1: round-trip for an FST descriptor.
#[quickcheck]
fn roundtrip_fst(a: u8, b: u32) -> bool {
    let desc = fst_descriptor();
    let mut value = desc.new_value();
    value.set("a", Value::U8(a)).unwrap();
    value.set("b", Value::U32(b)).unwrap();

    let bytes = value.serialize(None).unwrap();
    let back = desc.deserialize(&bytes, None).unwrap();
    back == value
}

/// Property 2: round-trip for a VST descriptor, within the declared (unbounded) tail bounds.
#[quickcheck]
fn roundtrip_vst(n: u16, tail: Vec<u8>) -> bool {
    let desc = vst_descriptor();
    let mut value = desc.new_value();
    value.set("n", Value::U16(n)).unwrap();
    value.set("tail", Value::Bytes(tail)).unwrap();

    let bytes = value.serialize(None).unwrap();
    let back = desc.deserialize(&bytes, None).unwrap();
    back == value
}

/// Property 3: `len(v.serialize()) == v.size()`.
#[quickcheck]
fn length_law_fst(a: u8, b: u32) -> bool {
    let desc = fst_descriptor();
    let mut value = desc.new_value();
    value.set("a", Value::U8(a)).unwrap();
    value.set("b", Value::U32(b)).unwrap();
    value.serialize(None).unwrap().len() == value.size()
}

#[quickcheck]
fn length_law_vst(n: u16, tail: Vec<u8>) -> bool {
    let desc = vst_descriptor();
    let mut value = desc.new_value();
    value.set("n", Value::U16(n)).unwrap();
    value.set("tail", Value::Bytes(tail)).unwrap();
    value.serialize(None).unwrap().len() == value.size()
}

/// Property 4: `D.deserialize(bytes).serialize() == bytes` whenever deserialize succeeds.
#[quickcheck]
fn idempotent_deserialize(a: u8, tail: Vec<u8>) -> bool {
    let desc = StructDescriptor::build()
        .field("a", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
        .field(
            "tail",
            Arc::new(
                VariableArraySerializer::new(0, None, Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8))).unwrap(),
            ),
            None,
            None,
        )
        .finish()
        .unwrap();
    let mut bytes = vec![a];
    bytes.extend_from_slice(&tail);

    let value = desc.deserialize(&bytes, None).unwrap();
    value.serialize(None).unwrap() == bytes
}

/// Property 5: short `FixedArray` values are padded with the element's default.
#[quickcheck]
fn fixed_array_padding(elements: Vec<u8>) -> TestResult {
    use binstruct::serializer::FixedArraySerializer;
    if elements.len() > 8 {
        return TestResult::discard();
    }
    let element = Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8));
    let arr = FixedArraySerializer::new(8, element).unwrap();
    let desc = StructDescriptor::build()
        .field("arr", Arc::new(arr), None, None)
        .finish()
        .unwrap();

    let mut value = desc.new_value();
    let k = elements.len();
    value.set("arr", Value::Bytes(elements.clone())).unwrap();

    let bytes = value.serialize(None).unwrap();
    let mut expected = elements;
    expected.resize(8, 0);
    TestResult::from_bool(bytes == expected && k <= 8)
}

/// Property 6: swapping resolved endian on a byte-palindromic `u32` (both bytes of each half
/// equal) yields identical bytes; on `0x01020304` it yields the documented mirror image.
#[quickcheck]
fn endian_duality_on_palindrome(half: u8) -> bool {
    let palindromic = u32::from_be_bytes([half, half, half, half]);
    let big = StructDescriptor::build()
        .field(
            "v",
            Arc::new(PrimitiveSerializer::with_endian(PrimitiveKind::U32, Endian::Big)),
            None,
            None,
        )
        .finish()
        .unwrap();
    let little = StructDescriptor::build()
        .field(
            "v",
            Arc::new(PrimitiveSerializer::with_endian(PrimitiveKind::U32, Endian::Little)),
            None,
            None,
        )
        .finish()
        .unwrap();

    let mut a = big.new_value();
    a.set("v", Value::U32(palindromic)).unwrap();
    let mut b = little.new_value();
    b.set("v", Value::U32(palindromic)).unwrap();

    a.serialize(None).unwrap() == b.serialize(None).unwrap()
}

/// Property 7: a mixin-built descriptor is byte-for-byte identical to the field-for-field
/// inlined equivalent, for arbitrary field values.
#[quickcheck]
fn mixin_equivalence(x: u8, y: u32) -> bool {
    let inner = StructDescriptor::build()
        .field("x", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
        .field("y", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U32)), None, None)
        .finish()
        .unwrap();
    let via_mixin = StructDescriptor::build().mixin(&inner, Some("p_")).finish().unwrap();
    let via_inline = StructDescriptor::build()
        .field("p_x", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U8)), None, None)
        .field("p_y", Arc::new(PrimitiveSerializer::new(PrimitiveKind::U32)), None, None)
        .finish()
        .unwrap();

    let mut a = via_mixin.new_value();
    a.set("p_x", Value::U8(x)).unwrap();
    a.set("p_y", Value::U32(y)).unwrap();
    let mut b = via_inline.new_value();
    b.set("p_x", Value::U8(x)).unwrap();
    b.set("p_y", Value::U32(y)).unwrap();

    a.serialize(None).unwrap() == b.serialize(None).unwrap()
}
