//! # Binary encoder and parser
//!
//! [`ser`] appends records, [`de`] reads them back one at a time, and [`tag`] holds the
//! header layout both sides share. The functions here move whole [`Bson`] trees in and
//! out of a [`Document`].
//!
//! # Example
//!
//! ```
//! use tbson::prelude::*;
//!
//! let tree = Bson::Object(vec![
//!     (Key::from("n"), Bson::from(-7)),
//!     (Key::Code(12), Bson::from(vec!["a", "b"])),
//! ]);
//!
//! let doc = encode_full(&tree);
//! assert_eq!(doc.to_string(), r##"{"n":-7,"#12":["a","b"]}"##);
//!
//! // Note: decoding returns a `Result`
//! let back = decode_full(&doc).unwrap();
//! assert_eq!(back, tree);
//! ```

use crate::{
    errors::{DecodeError, ParseError},
    Bson, Key,
};
use bytes::Bytes;
use smallvec::SmallVec;

pub mod de;
pub mod ser;
pub mod tag;

pub use de::{Parser, State, Token};
pub use ser::{encode, encode_full, Encoder, KeyRef, Sink};
use tag::{Container, Kind};

/// A container being rebuilt.
enum Open {
    Array(Vec<Bson>),
    Object(Vec<(Key, Bson)>, Option<Key>),
}

fn scalar(p: &Parser) -> Bson {
    match p.kind() {
        Some(Kind::String) => Bson::Str(p.to_text().to_string_lossy().into_owned()),
        Some(Kind::Boolean) => Bson::Bool(p.to_bool()),
        Some(Kind::Integer) => Bson::Int(p.to_inum()),
        Some(Kind::Float) => Bson::Float {
            value: p.to_float(),
            decimals: p.decimals(),
        },
        Some(Kind::Code) => Bson::Code(p.to_code()),
        Some(Kind::Binary) => Bson::Bin(Bytes::copy_from_slice(p.to_bin())),
        Some(Kind::Null) | Some(Kind::Container) | None => Bson::Null,
    }
}

/// Reads the next complete value from `p`.
///
/// Leaves `p` on the last record of the value, so several top-level values can be read
/// one after the other.
///
/// # Arguments
///
/// * `p` - A parser positioned before the value.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let mut enc = Encoder::new();
/// enc.add(1).add("two");
/// let doc = enc.finish().unwrap();
///
/// let mut p = doc.parser();
/// assert_eq!(decode(&mut p).unwrap(), Bson::from(1));
/// assert_eq!(decode(&mut p).unwrap(), Bson::from("two"));
/// assert!(p.is_done());
/// ```
pub fn decode(p: &mut Parser) -> Result<Bson, DecodeError> {
    let mut stack: SmallVec<[Open; 8]> = SmallVec::new();

    loop {
        if p.is_done() && !stack.is_empty() {
            return Err(DecodeError::Unclosed);
        }
        let offset = p.position();
        if !p.advance() {
            let e = p
                .error()
                .cloned()
                .unwrap_or(ParseError::Exhausted { offset });
            return Err(e.into());
        }

        let awaiting_key = match stack.last() {
            Some(Open::Object(_, pending)) => pending.is_none(),
            _ => false,
        };

        let node = match p.container() {
            Some(c) if c.is_open() => {
                if awaiting_key {
                    return Err(DecodeError::InvalidKey {
                        kind: Kind::Container,
                        offset,
                    });
                }
                stack.push(if c.is_object() {
                    Open::Object(Vec::new(), None)
                } else {
                    Open::Array(Vec::new())
                });
                continue;
            }
            Some(found) => match (stack.pop(), found) {
                (Some(Open::Array(items)), Container::ArrClose) => Bson::Array(items),
                (Some(Open::Object(entries, None)), Container::ObjClose) => Bson::Object(entries),
                (Some(Open::Object(_, Some(_))), Container::ObjClose) => {
                    return Err(DecodeError::MissingValue { offset })
                }
                _ => return Err(DecodeError::UnexpectedClose { found, offset }),
            },
            None if awaiting_key => {
                let key = match p.kind() {
                    Some(Kind::Code) => Key::Code(p.to_code()),
                    Some(Kind::String) => Key::Text(p.to_text().to_string_lossy().into_owned()),
                    _ => {
                        return Err(DecodeError::InvalidKey {
                            kind: p.kind().unwrap_or(Kind::Null),
                            offset,
                        })
                    }
                };
                if let Some(Open::Object(_, pending)) = stack.last_mut() {
                    *pending = Some(key);
                }
                continue;
            }
            None => scalar(p),
        };

        match stack.last_mut() {
            None => return Ok(node),
            Some(Open::Array(items)) => items.push(node),
            Some(Open::Object(entries, pending)) => {
                if let Some(k) = pending.take() {
                    entries.push((k, node));
                }
            }
        }
    }
}

/// Decodes a buffer holding exactly one value into a [`Bson`] tree.
///
/// # Arguments
///
/// * `bytes` - A buffer containing an encoded document.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let doc = encode_full(&Bson::Null);
///
/// let dec: Result<Bson, DecodeError> = decode_full(&doc);
/// assert_eq!(dec.unwrap(), Bson::Null);
///
/// assert!(decode_full(&[]).is_err());
/// ```
pub fn decode_full(bytes: &[u8]) -> Result<Bson, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut p = Parser::new(bytes);
    let b = decode(&mut p)?;
    if !p.is_done() {
        return Err(DecodeError::TrailingRecords {
            offset: p.position(),
        });
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inum::Inum;

    fn sample() -> Bson {
        Bson::Object(vec![
            (Key::from("null"), Bson::Null),
            (Key::from("t"), Bson::Bool(true)),
            (Key::from("big"), Bson::Int(Inum::from(u64::max_value()))),
            (Key::from("neg"), Bson::from(-300)),
            (
                Key::from("pi"),
                Bson::Float {
                    value: 3.25,
                    decimals: 2,
                },
            ),
            (Key::Code(8191), Bson::Code(1)),
            (Key::from("bin"), Bson::Bin(Bytes::from_static(&[0, 1, 2]))),
            (
                Key::from("nested"),
                Bson::Array(vec![Bson::Array(vec![]), Bson::Object(vec![])]),
            ),
        ])
    }

    #[test]
    fn round_trip() {
        let tree = sample();
        let doc = encode_full(&tree);
        assert_eq!(decode_full(&doc).unwrap(), tree);
    }

    #[test]
    fn empty() {
        assert_eq!(decode_full(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn truncated() {
        let doc = encode_full(&sample());
        for end in 1..doc.len() {
            assert!(decode_full(&doc[..end]).is_err(), "prefix of {} decoded", end);
        }
    }

    #[test]
    fn unclosed() {
        assert_eq!(decode_full(&[0xc8, 0x41, 1]), Err(DecodeError::Unclosed));
    }

    #[test]
    fn trailing() {
        assert_eq!(
            decode_full(&[0xe0, 0xe0]),
            Err(DecodeError::TrailingRecords { offset: 1 })
        );
    }

    #[test]
    fn bad_structure() {
        assert_eq!(
            decode_full(&[0xc0]),
            Err(DecodeError::UnexpectedClose {
                found: Container::ArrClose,
                offset: 0
            })
        );
        assert_eq!(
            decode_full(&[0xc8, 0xd0]),
            Err(DecodeError::UnexpectedClose {
                found: Container::ObjClose,
                offset: 1
            })
        );
        assert_eq!(
            decode_full(&[0xd8, 0x41, 1, 0xe0, 0xd0]),
            Err(DecodeError::InvalidKey {
                kind: Kind::Integer,
                offset: 1
            })
        );
        assert_eq!(
            decode_full(&[0xd8, 0xc8, 0xc0, 0xd0]),
            Err(DecodeError::InvalidKey {
                kind: Kind::Container,
                offset: 1
            })
        );
        assert_eq!(
            decode_full(&[0xd8, 0x80, 1, 0xd0]),
            Err(DecodeError::MissingValue { offset: 3 })
        );
    }

    #[test]
    fn deep_nesting() {
        let mut doc = vec![0xc8; 10_000];
        doc.extend(vec![0xc0; 10_000]);
        let mut b = decode_full(&doc).unwrap();
        let mut depth = 0;
        while let Bson::Array(mut items) = b {
            depth += 1;
            b = items.pop().unwrap_or(Bson::Null);
        }
        assert_eq!(depth, 10_000);
    }
}
