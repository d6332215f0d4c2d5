pub use crate::{
    document::Document,
    encoding::{
        de::{Parser, State, Token},
        decode, decode_full, encode, encode_full,
        ser::{Encoder, Sink},
        tag::{Container, Kind, MAX_LEN},
    },
    errors::{DecodeError, EncodeError, ParseError},
    inum::Inum,
    literal::Record,
    text::Text,
    value::Value,
    Bson, Key,
};
pub use bytes::Bytes;
pub use std::convert::TryFrom;
