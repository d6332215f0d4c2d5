use proptest::prelude::*;
use tbson::{prelude::*, stringify::to_json};
use tbson_strategy::*;

fn walk(bytes: &[u8]) -> usize {
    let mut p = Parser::new(bytes);
    let mut n = 0;
    while !p.is_done() && p.advance() {
        n += 1;
        // accessors never read outside the record
        let _ = (p.to_int64(), p.to_float(), p.to_text(), p.to_bin(), p.to_code());
    }
    assert!(p.position() <= bytes.len());
    n
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn prefixes_fail_cleanly(b in arb_bson()) {
        let enc = encode_full(&b);
        let full = walk(&enc);
        for end in 0..enc.len() {
            let prefix = &enc[..end];
            prop_assert!(walk(prefix) <= full);
            prop_assert!(decode_full(prefix).is_err());
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        walk(&bytes);
        let _ = decode_full(&bytes);
        let _ = to_json(&bytes);
    }

    #[test]
    fn truncated_record_latches(s in ".{1,64}", cut in 1usize..64) {
        let mut enc = Encoder::new();
        enc.add_str(s.as_str());
        let doc = enc.finish().unwrap();
        let end = doc.len().saturating_sub(cut).max(1).min(doc.len() - 1);

        let mut p = Parser::new(&doc[..end]);
        prop_assert!(!p.advance());
        prop_assert!(p.is_error());
        prop_assert_eq!(p.position(), end);
        prop_assert!(!p.advance());
        p.reset();
        prop_assert_eq!(p.state(), State::Error);
    }
}
