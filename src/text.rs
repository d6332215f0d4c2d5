//! Borrowed text handed to the encoder or read back by the parser.

use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
};

/// A borrowed run of text bytes.
///
/// `is_const` marks text that lives in program-constant storage. It does not change how the
/// bytes are encoded, and two texts with the same bytes are equal.
#[derive(Copy, Clone, Debug, Default)]
pub struct Text<'a> {
    bytes: &'a [u8],
    is_const: bool,
}

impl<'a> Text<'a> {
    /// Text from arbitrary bytes. They are not required to be UTF-8.
    pub fn new(bytes: &'a [u8]) -> Self {
        Text {
            bytes,
            is_const: false,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] { self.bytes }

    pub fn len(&self) -> usize { self.bytes.len() }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    pub fn is_const(&self) -> bool { self.is_const }

    /// The text as `str`, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&'a str> { std::str::from_utf8(self.bytes).ok() }

    /// The text as `str`, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'a, str> { String::from_utf8_lossy(self.bytes) }
}

impl Text<'static> {
    /// Text backed by constant storage.
    pub const fn from_static(s: &'static str) -> Self {
        Text {
            bytes: s.as_bytes(),
            is_const: true,
        }
    }
}

impl<'a> Deref for Text<'a> {
    type Target = [u8];

    fn deref(&self) -> &[u8] { self.bytes }
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(s: &'a str) -> Self { Text::new(s.as_bytes()) }
}

impl<'a> From<&'a String> for Text<'a> {
    fn from(s: &'a String) -> Self { Text::new(s.as_bytes()) }
}

impl<'a> From<&'a [u8]> for Text<'a> {
    fn from(s: &'a [u8]) -> Self { Text::new(s) }
}

impl<'a> From<&'a Cow<'a, str>> for Text<'a> {
    fn from(s: &'a Cow<'a, str>) -> Self { Text::new(s.as_bytes()) }
}

impl<'a, 'b> PartialEq<Text<'b>> for Text<'a> {
    fn eq(&self, other: &Text<'b>) -> bool { self.bytes == other.bytes }
}

impl<'a> Eq for Text<'a> {}

impl<'a> Hash for Text<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.bytes.hash(state) }
}

impl<'a> PartialEq<str> for Text<'a> {
    fn eq(&self, other: &str) -> bool { self.bytes == other.as_bytes() }
}

impl<'a, 'b> PartialEq<&'b str> for Text<'a> {
    fn eq(&self, other: &&'b str) -> bool { self.bytes == other.as_bytes() }
}

impl<'a> fmt::Display for Text<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.to_string_lossy()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        const GREETING: Text<'static> = Text::from_static("hello");
        assert!(GREETING.is_const());
        assert!(!Text::from("hello").is_const());
        assert_eq!(GREETING, Text::new(b"hello"));
        assert_eq!(Text::from("hello"), "hello");
    }

    #[test]
    fn invalid_utf8() {
        let t = Text::new(&[0xff, b'a']);
        assert_eq!(t.to_str(), None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.to_string_lossy(), "\u{fffd}a");
    }
}
