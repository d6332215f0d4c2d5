use crate::encoding::tag::{Container, Kind};
use failure::Fail;

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
/// Why a [`Parser`](crate::encoding::de::Parser) stopped.
pub enum ParseError {
    /// Tried to read a header with no bytes left.
    #[fail(display = "no record left to read at offset {}", offset)]
    Exhausted {
        /// Offset of the missing header.
        offset: usize,
    },
    /// A record declared more bytes than remain in the buffer.
    #[fail(
        display = "{:?} record at offset {} needs {} more bytes, only {} remain",
        kind, offset, needed, remaining
    )]
    Truncated {
        /// Kind of the truncated record.
        kind: Kind,
        /// Offset of its header.
        offset: usize,
        /// Bytes needed after the header.
        needed: usize,
        /// Bytes that were left after the header.
        remaining: usize,
    },
    /// An integer header declared a width over eight bytes.
    #[fail(display = "integer record at offset {} declares width {}", offset, width)]
    InvalidWidth {
        /// Offset of the header.
        offset: usize,
        /// The declared width.
        width: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
/// A structural fault found while encoding.
///
/// The bytes are written regardless; these only say the resulting document will not read
/// back as the tree that was written.
pub enum EncodeError {
    #[fail(display = "key written outside of an object")]
    KeyOutsideObject,
    #[fail(display = "value written where an object key was expected")]
    MissingKey,
    #[fail(display = "object closed or key written after a key without its value")]
    DanglingKey,
    #[fail(display = "expected {:?} but {:?} was written", expected, found)]
    MismatchedClose {
        expected: Container,
        found: Container,
    },
    #[fail(display = "{:?} written with no open container", found)]
    UnmatchedClose { found: Container },
    #[fail(display = "{} containers left open", depth)]
    Unclosed { depth: usize },
    /// A binary or string payload over [`MAX_LEN`](crate::encoding::tag::MAX_LEN) was
    /// replaced by a null.
    #[fail(display = "{} byte payload does not fit in a record, null written", len)]
    Oversize { len: usize },
    /// Only the low 13 bits of the code were written.
    #[fail(display = "code {} does not fit in 13 bits", code)]
    CodeRange { code: u16 },
    #[fail(display = "payload {} bytes short of its declared length", missing)]
    ShortPayload { missing: usize },
    #[fail(display = "payload written past its declared length by {} bytes", extra)]
    PayloadOverrun { extra: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
/// An error encountered when decoding a document into a [`Bson`](crate::Bson) tree fails.
pub enum DecodeError {
    #[fail(display = "{}", _0)]
    Parse(#[cause] ParseError),
    #[fail(display = "document is empty")]
    Empty,
    #[fail(display = "{:?} at offset {} closes nothing", found, offset)]
    UnexpectedClose { found: Container, offset: usize },
    #[fail(display = "{:?} record at offset {} cannot be an object key", kind, offset)]
    InvalidKey { kind: Kind, offset: usize },
    #[fail(display = "object closed at offset {} right after a key", offset)]
    MissingValue { offset: usize },
    #[fail(display = "document ended with containers still open")]
    Unclosed,
    #[fail(display = "records left after the top level value at offset {}", offset)]
    TrailingRecords { offset: usize },
}

impl From<ParseError> for DecodeError {
    fn from(e: ParseError) -> Self { DecodeError::Parse(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = ParseError::Truncated {
            kind: Kind::String,
            offset: 3,
            needed: 10,
            remaining: 2,
        };
        assert_eq!(
            e.to_string(),
            "String record at offset 3 needs 10 more bytes, only 2 remain"
        );
        assert_eq!(
            DecodeError::from(ParseError::Exhausted { offset: 0 }).to_string(),
            "no record left to read at offset 0"
        );
    }
}
