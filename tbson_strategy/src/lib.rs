use bytes::Bytes;
use proptest::prelude::*;
use tbson::{inum::Inum, Bson, Key};

/// Largest 13-bit code.
pub const MAX_CODE: u16 = 0x1fff;

/// arbitrary integer covering every width
pub fn arb_inum() -> impl Strategy<Value = Inum> {
    prop_oneof![
        any::<i8>().prop_map(Inum::from),
        any::<i32>().prop_map(Inum::from),
        any::<i64>().prop_map(Inum::from),
        any::<u64>().prop_map(Inum::from),
        (any::<bool>(), 0u32..64).prop_map(|(neg, shift)| Inum::new(neg, 1u64 << shift)),
    ]
}

/// arbitrary finite float with a decimal hint
pub fn arb_float() -> impl Strategy<Value = Bson> {
    (prop::num::f32::NORMAL | prop::num::f32::ZERO, 0u8..16)
        .prop_map(|(value, decimals)| Bson::Float { value, decimals })
}

/// arbitrary Bytes that fit in one record
pub fn arb_bin() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..300).prop_map(Bytes::from)
}

/// arbitrary object key
pub fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        (0..=MAX_CODE).prop_map(Key::Code),
        ".{0,12}".prop_map(Key::Text),
    ]
}

/// arbitrary scalar
pub fn arb_leaf() -> impl Strategy<Value = Bson> {
    prop_oneof![
        Just(Bson::Null),
        any::<bool>().prop_map(Bson::Bool),
        arb_inum().prop_map(Bson::Int),
        arb_float(),
        ".{0,40}".prop_map(Bson::Str),
        (0..=MAX_CODE).prop_map(Bson::Code),
        arb_bin().prop_map(Bson::Bin),
    ]
}

/// arbitrary tree for use with proptest
pub fn arb_bson() -> impl Strategy<Value = Bson> {
    arb_leaf().prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Bson::Array),
                prop::collection::vec((arb_key(), inner), 0..10).prop_map(Bson::Object),
            ]
        },
    )
}
