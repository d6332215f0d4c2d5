//! # TBSON
//!
//! TBSON (Tiny Binary Serialized Object Notation) is a compact, self-describing binary
//! format with a JSON-like data model, sized for embedded and networked use: every value
//! is a one-byte header followed by at most a few bytes of payload.
//!
//! # Usage
//!
//! Documents are written with an [`Encoder`](encoding::ser::Encoder) and read back
//! one record at a time with a [`Parser`](encoding::de::Parser), which never allocates
//! and never reads past the end of its buffer.
//!
//! ```
//! use tbson::prelude::*;
//!
//! let mut enc = Encoder::new();
//! enc.begin_obj()
//!     .entry("temp", 21.5f32)
//!     .entry("ok", true)
//!     .add_key("tags");
//! enc.begin_arr().add("a").add("b").end_arr().end_obj();
//! let doc = enc.finish().unwrap();
//!
//! let mut p = doc.parser();
//! assert!(p.advance_char('{'));
//! assert_eq!(p.read_str(), Some("temp"));
//! assert_eq!(p.read_float(), Some(21.5));
//! ```
//!
//! Whole trees can be moved in and out of documents as [`Bson`] values:
//!
//! ```
//! use tbson::prelude::*;
//!
//! let tree = Bson::from(vec![1, 2, 3]);
//! let doc = encode_full(&tree);
//! assert_eq!(decode_full(&doc).unwrap(), tree);
//! assert_eq!(tree.to_string(), "[1,2,3]");
//! ```
//!
//! Fixed documents can also be laid out at compile time with [`literal`].
//!
//! # Specification
//!
//! This section describes the binary format.
//!
//! ## Headers
//!
//! Every record starts with a header byte. Its top three bits are the *kind*, the
//! remaining five bits are *data*.
//!
//! | Kind  | Bits  | Data                               | Payload                       |
//! | ---   | ---   | ---                                | ---                           |
//! | 0     | `000` | length, high 5 bits                | length low byte, then UTF-8   |
//! | 1     | `001` | `0000v`, `v` is the value          | none                          |
//! | 2     | `010` | sign bit, then width in bytes      | magnitude, little endian      |
//! | 3     | `011` | decimal hint in the low four bits  | `f32`, little endian          |
//! | 4     | `100` | code, high 5 bits                  | code low byte                 |
//! | 5     | `101` | length, high 5 bits                | length low byte, then bytes   |
//! | 6     | `110` | object bit, open bit               | none                          |
//! | 7     | `111` | unused                             | none                          |
//!
//! The kinds are string, boolean, integer, float, code, binary, container and null.
//!
//! ## Integers
//!
//! Integers carry a sign and a magnitude of up to 64 bits, written in as few bytes as
//! possible; zero has no payload at all.
//!
//! | 010  | x        | xxxx            |
//! | ---  | ---      | ---             |
//! | Kind | Negative | Width, 0 to 8   |
//!
//! ## Strings, binaries and codes
//!
//! Lengths and codes are 13-bit numbers: the high five bits sit in the header, the low
//! eight in the next byte. Strings and binaries therefore hold at most 8191 bytes.
//!
//! ## Containers
//!
//! Arrays and objects are bracketed by open and close markers:
//!
//! | Marker | Header |
//! | ---    | ---    |
//! | `[`    | `0xc8` |
//! | `]`    | `0xc0` |
//! | `{`    | `0xd8` |
//! | `}`    | `0xd0` |
//!
//! Inside an object, records alternate between a key (a string or a code) and a value.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::len_without_is_empty)]

pub mod document;
pub mod encoding;
pub mod errors;
pub mod inum;
pub mod literal;
pub mod prelude;
pub mod stringify;
pub mod text;
pub mod util;
pub mod value;

pub use document::Document;
pub use value::Value;

use bytes::Bytes;
use failure::*;
use inum::Inum;
use std::convert::TryFrom;

/// A key inside an object.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
pub enum Key {
    /// A 13-bit numeric key. Encoding a larger one keeps the low 13 bits and faults with
    /// [`EncodeError::CodeRange`](errors::EncodeError::CodeRange).
    Code(u16),
    Text(String),
}

impl From<&str> for Key {
    fn from(s: &str) -> Key { Key::Text(s.to_owned()) }
}

from_fn!(Key, String, Key::Text);
from_fn!(Key, u16, Key::Code);

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Key::Code(c) => write!(f, "#{}", c),
            Key::Text(s) => f.write_str(s),
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
/// An owned document tree.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let b = Bson::Bool(true);
///
/// let val = match b {
///     Bson::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Bson {
    Null,
    Bool(bool),
    Int(Inum),
    /// A single precision float and how many decimals to render it with. Only the low four
    /// bits of `decimals` are encoded, so hints above 15 do not survive a round trip.
    Float { value: f32, decimals: u8 },
    Str(String),
    /// A 13-bit enumerated value. Larger values are masked like [`Key::Code`].
    Code(u16),
    /// Opaque bytes.
    Bin(Bytes),
    Array(Vec<Bson>),
    /// Entries in document order. Duplicate keys are kept.
    Object(Vec<(Key, Bson)>),
}

use Bson::*;

impl Bson {
    pub fn is_null(&self) -> bool { *self == Null }

    /// The elements of an array.
    /// This will return an [`Error`] if the value is not a [`Bson::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use tbson::prelude::*;
    ///
    /// let b = Bson::from(vec![1, 2, 3]);
    /// assert_eq!(b.to_vec().unwrap().len(), 3);
    /// assert!(Bson::Null.to_vec().is_err());
    /// ```
    pub fn to_vec(&self) -> Result<&Vec<Bson>, Error> {
        match self {
            Array(a) => Ok(a),
            _ => bail!("This value is not an `Array`"),
        }
    }

    /// Consumes an array, returning its elements.
    pub fn into_vec(self) -> Result<Vec<Bson>, Error> {
        match self {
            Array(a) => Ok(a),
            _ => bail!("This value is not an `Array`"),
        }
    }

    /// The entries of an object.
    pub fn to_object(&self) -> Result<&Vec<(Key, Bson)>, Error> {
        match self {
            Object(o) => Ok(o),
            _ => bail!("This value is not an `Object`"),
        }
    }

    /// Consumes an object, returning its entries.
    pub fn into_object(self) -> Result<Vec<(Key, Bson)>, Error> {
        match self {
            Object(o) => Ok(o),
            _ => bail!("This value is not an `Object`"),
        }
    }

    /// The first value stored under `key`, if this is an object that has one.
    ///
    /// # Example
    ///
    /// ```
    /// use tbson::prelude::*;
    ///
    /// let b = Bson::Object(vec![(Key::Code(1), Bson::from("one"))]);
    /// assert_eq!(b.get(&Key::Code(1)), Some(&Bson::from("one")));
    /// assert_eq!(b.get(&Key::from("1")), None);
    /// ```
    pub fn get(&self, key: &Key) -> Option<&Bson> {
        match self {
            Object(o) => o.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Bool(b) => Ok(*b),
            _ => bail!("This value is not a `Bool`"),
        }
    }

    pub fn to_inum(&self) -> Result<Inum, Error> {
        match self {
            Int(i) => Ok(*i),
            _ => bail!("This value is not an `Int`"),
        }
    }

    /// The value as an `i64`, failing for non-integers and out of range magnitudes.
    pub fn to_i64(&self) -> Result<i64, Error> {
        let i = self.to_inum()?;
        match i64::try_from(i) {
            Ok(v) => Ok(v),
            Err(_) => bail!("{} does not fit in an `i64`", i),
        }
    }

    pub fn to_f32(&self) -> Result<f32, Error> {
        match self {
            Float { value, .. } => Ok(*value),
            _ => bail!("This value is not a `Float`"),
        }
    }

    pub fn to_str(&self) -> Result<&str, Error> {
        match self {
            Str(s) => Ok(s),
            _ => bail!("This value is not a `Str`"),
        }
    }

    pub fn to_code(&self) -> Result<u16, Error> {
        match self {
            Code(c) => Ok(*c),
            _ => bail!("This value is not a `Code`"),
        }
    }

    pub fn to_bytes(&self) -> Result<&Bytes, Error> {
        match self {
            Bin(b) => Ok(b),
            _ => bail!("This value is not a `Bin`"),
        }
    }
}

/// The tree as compact JSON-like text, or pretty with `{:#}`.
impl std::fmt::Display for Bson {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&encoding::encode_full(self), f)
    }
}

impl From<&str> for Bson {
    fn from(s: &str) -> Bson { Str(s.to_owned()) }
}

impl<T: Into<Bson>> From<Vec<T>> for Bson {
    fn from(v: Vec<T>) -> Bson { Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Bson>> From<Option<T>> for Bson {
    fn from(o: Option<T>) -> Bson { o.map_or(Null, T::into) }
}

from_fn!(Bson, (), |_| Null);
from_fn!(Bson, bool, Bool);
from_fn!(Bson, Inum, Int);
from_fn!(Bson, String, Str);
from_fn!(Bson, Bytes, Bin);
from_fn!(Bson, f32, |value| Float {
    value,
    decimals: encoding::tag::DEFAULT_DECIMALS
});

/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $($from:ty),*) => {
        $(impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        })*
    };
}

compose_from!(Bson, Inum, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
