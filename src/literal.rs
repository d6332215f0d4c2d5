//! Records built at compile time.
//!
//! Every function here is a `const fn`, so fixed documents can be written as `const`
//! tables and appended with [`Document::extend_records`](crate::Document::extend_records).
//!
//! ```
//! use tbson::{encoding::tag::Container, literal, prelude::*};
//!
//! const KEY: [u8; 4] = literal::text(b"id");
//! const STATUS: [Record; 3] = [
//!     literal::container(Container::ObjOpen),
//!     literal::code(7),
//!     literal::boolean(true),
//! ];
//!
//! let mut doc = Document::new();
//! doc.extend_records(&STATUS);
//! doc.extend_from_slice(&KEY);
//! doc.extend_records(&[literal::int(-42), literal::container(Container::ObjClose)]);
//!
//! assert_eq!(doc.to_string(), r##"{"#7":true,"id":-42}"##);
//! ```

use crate::encoding::tag::*;

/// A single record of at most nine bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    bytes: [u8; 9],
    len: u8,
}

impl Record {
    const fn header(header: u8) -> Record {
        let mut bytes = [0u8; 9];
        bytes[0] = header;
        Record { bytes, len: 1 }
    }

    pub fn as_bytes(&self) -> &[u8] { &self.bytes[..self.len as usize] }

    pub const fn len(&self) -> usize { self.len as usize }

    pub const fn is_empty(&self) -> bool { self.len == 0 }
}

pub const fn null() -> Record { Record::header(join_header(Kind::Null, 0)) }

pub const fn boolean(b: bool) -> Record {
    Record::header(join_header(Kind::Boolean, if b { BOOL_TRUE } else { 0 }))
}

pub const fn container(c: Container) -> Record { Record::header(c.header()) }

/// A code record. Codes over 13 bits keep their low 13 bits.
pub const fn code(c: u16) -> Record {
    let (msb5, lsb) = split_u13(c);
    let mut r = Record::header(join_header(Kind::Code, msb5));
    r.bytes[1] = lsb;
    r.len = 2;
    r
}

const fn magnitude(negative: bool, mag: u64) -> Record {
    let width = minimal_width(mag);
    let mut r = Record::header(join_header(Kind::Integer, int_data(negative, width)));
    let digits = mag.to_le_bytes();
    let mut i = 0;
    while i < width as usize {
        r.bytes[1 + i] = digits[i];
        i += 1;
    }
    r.len = 1 + width;
    r
}

/// An integer record with minimal width.
pub const fn int(i: i64) -> Record { magnitude(i < 0, i.unsigned_abs()) }

pub const fn uint(u: u64) -> Record { magnitude(false, u) }

pub const fn float(f: f32, decimals: u8) -> Record {
    let mut r = Record::header(join_header(Kind::Float, decimals & MASK_DECIMALS));
    let bits = f.to_bits().to_le_bytes();
    r.bytes[1] = bits[0];
    r.bytes[2] = bits[1];
    r.bytes[3] = bits[2];
    r.bytes[4] = bits[3];
    r.len = 1 + FLOAT_SIZE as u8;
    r
}

/// A string record for `s`, as a fixed array of `M = N + 2` bytes.
///
/// Mismatched sizes or text over the length limit fail const evaluation.
pub const fn text<const N: usize, const M: usize>(s: &[u8; N]) -> [u8; M] {
    assert!(M == N + 2, "string record must be two bytes longer than its text");
    assert!(N <= MAX_LEN, "string literal is too long");
    let (msb5, lsb) = split_u13(N as u16);
    let mut out = [0u8; M];
    out[0] = join_header(Kind::String, msb5);
    out[1] = lsb;
    let mut i = 0;
    while i < N {
        out[2 + i] = s[i];
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::Encoder, Value};

    fn encoded<'a>(v: impl Into<Value<'a>>) -> Vec<u8> {
        let mut enc = Encoder::with_sink(Vec::new());
        enc.add(v);
        enc.into_inner()
    }

    #[test]
    fn literals_match_encoder() {
        assert_eq!(null().as_bytes(), &encoded(Value::Null)[..]);
        assert_eq!(boolean(true).as_bytes(), &encoded(true)[..]);
        assert_eq!(boolean(false).as_bytes(), &encoded(false)[..]);
        for i in &[0i64, 1, -1, 255, -256, 1 << 40, i64::min_value(), i64::max_value()] {
            assert_eq!(int(*i).as_bytes(), &encoded(*i)[..], "{}", i);
        }
        assert_eq!(uint(u64::max_value()).as_bytes(), &encoded(u64::max_value())[..]);
        assert_eq!(code(300).as_bytes(), &encoded(Value::Code(300))[..]);
        assert_eq!(float(1.5, 2).as_bytes(), &encoded(Value::Float(1.5, 2))[..]);
    }

    #[test]
    fn text_record() {
        const HI: [u8; 4] = text(b"hi");
        assert_eq!(HI, [0x00, 0x02, b'h', b'i']);
        assert_eq!(&HI[..], &encoded("hi")[..]);
    }

    #[test]
    fn sizes() {
        assert_eq!(int(0).len(), 1);
        assert_eq!(uint(u64::max_value()).len(), 9);
        assert_eq!(float(0.0, 4).len(), 5);
    }
}
