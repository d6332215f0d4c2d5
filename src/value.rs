//! The single input type of [`Encoder::add`](crate::encoding::ser::Encoder::add).

use crate::{
    encoding::tag::DEFAULT_DECIMALS, from_fn, inum::Inum, text::Text, Bson, Document, Key,
};

/// Anything that can be written as one value.
///
/// Every primitive converts into a `Value`, so `add` takes the place of an overload per
/// type:
///
/// ```
/// use tbson::prelude::*;
///
/// let mut enc = Encoder::new();
/// enc.begin_arr()
///     .add(1u8)
///     .add(-2i64)
///     .add("three")
///     .add(4.0f32)
///     .add(Value::Code(5))
///     .add(())
///     .end_arr();
/// assert_eq!(enc.finish().unwrap().to_string(), r##"[1,-2,"three",4.0000,"#5",null]"##);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(Inum),
    /// A float with its decimal hint.
    Float(f32, u8),
    Text(Text<'a>),
    /// Opaque bytes.
    Bytes(&'a [u8]),
    Code(u16),
    /// An already encoded document, appended as is.
    Document(&'a [u8]),
}

from_fn!(Value<'_>, (), |_| Value::Null);
from_fn!(Value<'_>, bool, Value::Bool);
from_fn!(Value<'_>, Inum, Value::Int);
from_fn!(Value<'_>, f32, |f| Value::Float(f, DEFAULT_DECIMALS));
from_fn!(Value<'_>, f64, |f: f64| Value::Float(f as f32, DEFAULT_DECIMALS));

macro_rules! from_ints {
    ($($t:ty),*) => {
        $(from_fn!(Value<'_>, $t, |i: $t| Value::Int(Inum::from(i)));)*
    };
}

from_ints!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a> From<Text<'a>> for Value<'a> {
    fn from(t: Text<'a>) -> Self { Value::Text(t) }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self { Value::Text(Text::from(s)) }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self { Value::Text(Text::from(s)) }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self { Value::Bytes(b) }
}

impl<'a> From<&'a Document> for Value<'a> {
    fn from(d: &'a Document) -> Self { Value::Document(d.as_slice()) }
}

impl<'a> From<&'a Key> for Value<'a> {
    fn from(k: &'a Key) -> Self {
        match k {
            Key::Code(c) => Value::Code(*c),
            Key::Text(s) => Value::from(s),
        }
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(o: Option<T>) -> Self { o.map_or(Value::Null, Into::into) }
}

impl<'a> Value<'a> {
    /// The value of a scalar [`Bson`] node. Arrays and objects have none.
    pub fn from_scalar(b: &'a Bson) -> Option<Self> {
        Some(match b {
            Bson::Null => Value::Null,
            Bson::Bool(v) => Value::Bool(*v),
            Bson::Int(i) => Value::Int(*i),
            Bson::Float { value, decimals } => Value::Float(*value, *decimals),
            Bson::Str(s) => Value::from(s),
            Bson::Code(c) => Value::Code(*c),
            Bson::Bin(b) => Value::Bytes(&b[..]),
            Bson::Array(_) | Bson::Object(_) => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(-3i8), Value::Int(Inum::from(-3i64)));
        assert_eq!(Value::from(3usize), Value::Int(Inum::from(3u64)));
        assert_eq!(Value::from(()), Value::Null);
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
        assert_eq!(Value::from(0.5f64), Value::Float(0.5, DEFAULT_DECIMALS));
        assert_eq!(Value::from(&Key::Code(9)), Value::Code(9));
    }

    #[test]
    fn scalars_only() {
        assert_eq!(Value::from_scalar(&Bson::Array(vec![])), None);
        assert_eq!(Value::from_scalar(&Bson::Code(1)), Some(Value::Code(1)));
    }
}
