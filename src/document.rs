//! The growable buffer documents are encoded into.

use bytes::{BufMut, Bytes, BytesMut};
use std::{fmt, ops::Deref};

use crate::{encoding::de::Parser, literal::Record, stringify};

/// An append-only encoded document.
///
/// Parsers borrow the document, so nothing can be appended while one is reading it.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let mut enc = Encoder::new();
/// enc.begin_obj().entry("ok", true).end_obj();
/// let doc = enc.finish().unwrap();
///
/// let mut parser = doc.parser();
/// assert!(parser.advance_char('{'));
/// assert_eq!(parser.read_str(), Some("ok"));
/// assert_eq!(parser.read_bool(), Some(true));
/// assert!(parser.advance_char('}'));
/// assert!(parser.is_done());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Document(BytesMut);

impl Document {
    pub fn new() -> Self { Document(BytesMut::new()) }

    pub fn with_capacity(cap: usize) -> Self { Document(BytesMut::with_capacity(cap)) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn as_slice(&self) -> &[u8] { &self.0 }

    pub fn reserve(&mut self, additional: usize) { self.0.reserve(additional) }

    pub fn clear(&mut self) { self.0.clear() }

    pub fn push(&mut self, byte: u8) { self.0.put_u8(byte) }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) { self.0.extend_from_slice(bytes) }

    /// Appends the bytes of another document.
    pub fn append(&mut self, other: &Document) { self.0.extend_from_slice(&other.0) }

    /// Appends a table of literal records.
    pub fn extend_records(&mut self, records: &[Record]) {
        for r in records {
            self.0.extend_from_slice(r.as_bytes());
        }
    }

    /// A parser over the whole document.
    pub fn parser(&self) -> Parser<'_> { Parser::new(&self.0) }

    /// Freezes the document for hand-off.
    pub fn freeze(self) -> Bytes { self.0.freeze() }

    pub fn into_inner(self) -> BytesMut { self.0 }
}

impl Deref for Document {
    type Target = [u8];

    fn deref(&self) -> &[u8] { &self.0 }
}

impl AsRef<[u8]> for Document {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl From<Vec<u8>> for Document {
    fn from(v: Vec<u8>) -> Self { Document(BytesMut::from(&v[..])) }
}

impl From<&[u8]> for Document {
    fn from(v: &[u8]) -> Self { Document(BytesMut::from(v)) }
}

impl From<BytesMut> for Document {
    fn from(b: BytesMut) -> Self { Document(b) }
}

impl From<Document> for Bytes {
    fn from(d: Document) -> Bytes { d.freeze() }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Document").field(&self.as_slice()).finish()
    }
}

/// JSON-like text, pretty with `{:#}`. A malformed tail renders as `<malformed: ..>`.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = if f.alternate() {
            stringify::Style::pretty()
        } else {
            stringify::Style::Compact
        };
        if let Err(e) = stringify::stringify(self, f, style) {
            write!(f, "<malformed: {}>", e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal;

    #[test]
    fn append_and_freeze() {
        let mut a = Document::new();
        a.push(0xe0);
        let mut b = Document::with_capacity(4);
        b.extend_from_slice(&[0x21, 0x05]);
        a.append(&b);
        assert_eq!(a.as_slice(), &[0xe0, 0x21, 0x05]);
        assert_eq!(a.len(), 3);

        let frozen = a.clone().freeze();
        assert_eq!(&frozen[..], &a[..]);

        a.clear();
        assert!(a.is_empty());
    }

    #[test]
    fn records_table() {
        const TABLE: [Record; 3] = [
            literal::container(crate::encoding::tag::Container::ArrOpen),
            literal::int(5),
            literal::container(crate::encoding::tag::Container::ArrClose),
        ];
        let mut doc = Document::new();
        doc.extend_records(&TABLE);
        assert_eq!(doc.as_slice(), &[0xc8, 0x41, 0x05, 0xc0]);
        assert_eq!(doc.to_string(), "[5]");
        assert_eq!(format!("{:#}", doc), "[\n  5\n]");
    }

    #[test]
    fn malformed_display() {
        let doc = Document::from(&[0xc8, 0x41][..]);
        assert!(doc.to_string().starts_with("[<malformed: "));
    }
}
