use proptest::prelude::*;
use tbson::{encoding::tag::minimal_width, prelude::*};

fn encoded(i: impl Into<Inum>) -> Document {
    let mut enc = Encoder::new();
    enc.add_int(i);
    enc.finish().unwrap()
}

#[test]
fn width_boundaries() {
    for (shift, width) in &[(0u32, 1usize), (7, 1), (8, 2), (55, 7), (56, 8), (63, 8)] {
        let doc = encoded(1u64 << shift);
        assert_eq!(doc.len(), 1 + width, "2^{}", shift);
        let doc = encoded((1u64 << shift) - 1);
        assert_eq!(doc.len() as u8, 1 + minimal_width((1u64 << shift) - 1));
    }
    assert_eq!(encoded((1u64 << 56) - 1).len(), 8);
    assert_eq!(encoded(u64::max_value()).len(), 9);
    assert_eq!(encoded(0).len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode_i64(i in proptest::num::i64::ANY) {
        let enc = encoded(i);
        let mut p = enc.parser();
        prop_assert_eq!(p.read_int64(), Some(i));
        prop_assert_eq!(i64::try_from(p.to_inum()), Ok(i));
        prop_assert_eq!(p.length() as u8, minimal_width(i.unsigned_abs()));
    }

    #[test]
    fn encode_decode_u64(u in proptest::num::u64::ANY) {
        let enc = encoded(u);
        let mut p = enc.parser();
        prop_assert!(p.advance_kind(Kind::Integer));
        prop_assert_eq!(p.to_uint64(), u);
        prop_assert!(!p.is_negative());
    }

    #[test]
    fn narrow_reads_keep_low_bytes(i in proptest::num::i32::ANY) {
        let enc = encoded(i);
        let mut p = enc.parser();
        prop_assert_eq!(p.read_int(), Some(i));
        prop_assert_eq!(p.to_int_as::<i16>(), i as i16);
    }
}
