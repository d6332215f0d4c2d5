use super::tag::*;
use crate::{
    errors::EncodeError, inum::Inum, text::Text, util::*, value::Value, Bson, Document, Key,
};
use bytes::{BufMut, BytesMut};
use num_traits::AsPrimitive;
use smallvec::SmallVec;

/// Something bytes can be appended to.
pub trait Sink {
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Bytes written so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Sink for Vec<u8> {
    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn len(&self) -> usize { Vec::len(self) }
}

impl Sink for BytesMut {
    fn put_u8(&mut self, u: u8) { BufMut::put_u8(self, u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn len(&self) -> usize { BytesMut::len(self) }
}

impl Sink for Document {
    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn len(&self) -> usize { Document::len(self) }
}

/// An open container, as seen by the encoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Frame {
    Array,
    /// `true` while the next record is a key.
    Object(bool),
}

/// Appends records to a [`Sink`].
///
/// Writing never fails and never touches bytes that were already written. Alongside the
/// bytes, the encoder tracks open containers and key/value alternation; the first
/// structural fault is kept and reported by [`Encoder::finish`].
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let mut enc = Encoder::new();
/// enc.begin_obj()
///     .entry("x", -5)
///     .entry("ok", true)
///     .end_obj();
///
/// let doc = enc.finish().unwrap();
/// assert_eq!(doc.to_string(), r#"{"x":-5,"ok":true}"#);
/// ```
#[derive(Debug)]
pub struct Encoder<S: Sink = Document> {
    out: S,
    frames: SmallVec<[Frame; 8]>,
    fault: Option<EncodeError>,
    /// Payload bytes still owed after `begin_bin`/`begin_str`.
    pending: usize,
}

impl Encoder<Document> {
    pub fn new() -> Self { Self::with_sink(Document::new()) }

    pub fn with_capacity(cap: usize) -> Self { Self::with_sink(Document::with_capacity(cap)) }
}

impl Default for Encoder<Document> {
    fn default() -> Self { Self::new() }
}

impl<S: Sink> Encoder<S> {
    /// An encoder appending to `out`. Bytes already in `out` are left alone and are not
    /// part of the structural tracking.
    pub fn with_sink(out: S) -> Self {
        Encoder {
            out,
            frames: SmallVec::new(),
            fault: None,
            pending: 0,
        }
    }

    /// The bytes written so far.
    pub fn get_ref(&self) -> &S { &self.out }

    /// Returns the sink without checking structure.
    pub fn into_inner(self) -> S { self.out }

    /// Returns the sink if every container was closed and keys and values alternated.
    ///
    /// # Errors
    ///
    /// Returns the first structural fault, or [`EncodeError::Unclosed`] if containers are
    /// still open.
    pub fn finish(mut self) -> Result<S, EncodeError> {
        self.settle_payload();
        if let Some(e) = self.fault {
            return Err(e);
        }
        if !self.frames.is_empty() {
            return Err(EncodeError::Unclosed {
                depth: self.frames.len(),
            });
        }
        Ok(self.out)
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize { self.frames.len() }

    /// Whether every container is closed and no fault was seen.
    pub fn is_balanced(&self) -> bool {
        self.frames.is_empty() && self.fault.is_none() && self.pending == 0
    }

    /// The first structural fault, if any.
    pub fn fault(&self) -> Option<&EncodeError> { self.fault.as_ref() }

    fn latch(&mut self, e: EncodeError) {
        if self.fault.is_none() {
            log::warn!("malformed document at byte {}: {}", self.out.len(), e);
            self.fault = Some(e);
        }
    }

    fn settle_payload(&mut self) {
        if self.pending > 0 {
            let missing = std::mem::replace(&mut self.pending, 0);
            self.latch(EncodeError::ShortPayload { missing });
        }
    }

    fn check_code(&mut self, code: u16) {
        if code as usize > MAX_LEN {
            self.latch(EncodeError::CodeRange { code });
        }
    }

    fn on_key(&mut self) {
        self.settle_payload();
        let fault = match self.frames.last_mut() {
            Some(Frame::Object(expect_key)) if *expect_key => {
                *expect_key = false;
                None
            }
            Some(Frame::Object(_)) => Some(EncodeError::DanglingKey),
            _ => Some(EncodeError::KeyOutsideObject),
        };
        if let Some(e) = fault {
            self.latch(e);
        }
    }

    fn on_value(&mut self) {
        self.settle_payload();
        let missing = match self.frames.last_mut() {
            Some(Frame::Object(expect_key)) => !std::mem::replace(expect_key, true),
            _ => false,
        };
        if missing {
            self.latch(EncodeError::MissingKey);
        }
    }

    fn put_u13(&mut self, kind: Kind, v: u16) {
        let (msb5, lsb) = split_u13(v);
        self.out.put_u8(join_header(kind, msb5));
        self.out.put_u8(lsb);
    }

    fn put_text(&mut self, text: &[u8]) {
        let len = if text.len() > MAX_LEN {
            log::warn!("truncating {} byte string to {} bytes", text.len(), MAX_LEN);
            MAX_LEN
        } else {
            text.len()
        };
        self.put_u13(Kind::String, len as u16);
        self.out.put_slice(&text[..len]);
    }

    fn put_int(&mut self, i: Inum) {
        let digs = u64_to_digits(i.magnitude());
        let header = join_header(Kind::Integer, int_data(i.is_negative(), digs.len() as u8));
        self.out.put_u8(header);
        self.out.put_slice(&digs);
    }

    /// Writes a key.
    pub fn add_key<'k>(&mut self, key: impl Into<KeyRef<'k>>) -> &mut Self {
        match key.into() {
            KeyRef::Code(c) => self.add_code_key(c),
            KeyRef::Text(t) => self.add_text_key(t),
        }
    }

    /// Writes a numeric key. Only the low 13 bits are kept; a larger code is a fault.
    pub fn add_code_key(&mut self, code: u16) -> &mut Self {
        self.on_key();
        self.check_code(code);
        self.put_u13(Kind::Code, code);
        self
    }

    /// Writes a text key, truncated like [`Encoder::add_str`].
    pub fn add_text_key<'t>(&mut self, key: impl Into<Text<'t>>) -> &mut Self {
        self.on_key();
        self.put_text(clamp_text(key.into()));
        self
    }

    /// Writes a key and then its value.
    pub fn entry<'k, 'v>(
        &mut self,
        key: impl Into<KeyRef<'k>>,
        value: impl Into<Value<'v>>,
    ) -> &mut Self {
        self.add_key(key).add(value)
    }

    pub fn add_bool(&mut self, b: bool) -> &mut Self {
        self.on_value();
        let data = if b { BOOL_TRUE } else { 0 };
        self.out.put_u8(join_header(Kind::Boolean, data));
        self
    }

    /// Writes an integer with the smallest width that holds its magnitude.
    pub fn add_int(&mut self, i: impl Into<Inum>) -> &mut Self {
        self.on_value();
        self.put_int(i.into());
        self
    }

    /// Writes a float as single precision. `decimals` only guides rendering and keeps its
    /// low four bits.
    pub fn add_float<F: AsPrimitive<f32>>(&mut self, f: F, decimals: u8) -> &mut Self {
        self.on_value();
        self.out.put_u8(join_header(Kind::Float, decimals & MASK_DECIMALS));
        self.out.put_slice(&f.as_().to_le_bytes());
        self
    }

    /// Writes a string. Text longer than [`MAX_LEN`] bytes is truncated.
    pub fn add_str<'t>(&mut self, s: impl Into<Text<'t>>) -> &mut Self {
        self.on_value();
        self.put_text(clamp_text(s.into()));
        self
    }

    /// Writes opaque bytes.
    ///
    /// Returns `false` and writes a null instead if `bin` is longer than [`MAX_LEN`]. The
    /// encoder then holds [`EncodeError::Oversize`].
    pub fn add_bin(&mut self, bin: &[u8]) -> bool {
        if !self.begin_bin(bin.len()) {
            return false;
        }
        self.write_payload(bin);
        true
    }

    /// Writes the header of a `len` byte binary. The payload follows through
    /// [`Encoder::write_payload`].
    ///
    /// Over [`MAX_LEN`] a null is written instead, [`EncodeError::Oversize`] is latched and
    /// `false` is returned.
    pub fn begin_bin(&mut self, len: usize) -> bool { self.begin_payload(Kind::Binary, len) }

    /// Writes the header of a `len` byte string, to be followed by
    /// [`Encoder::write_payload`]. Unlike [`Encoder::add_str`] the text cannot be
    /// truncated, so an oversize length is handled like [`Encoder::begin_bin`].
    pub fn begin_str(&mut self, len: usize) -> bool { self.begin_payload(Kind::String, len) }

    fn begin_payload(&mut self, kind: Kind, len: usize) -> bool {
        self.on_value();
        if len > MAX_LEN {
            log::warn!("{} byte {:?} is too long, writing null", len, kind);
            self.latch(EncodeError::Oversize { len });
            self.out.put_u8(join_header(Kind::Null, 0));
            return false;
        }
        self.put_u13(kind, len as u16);
        self.pending = len;
        true
    }

    /// Appends raw payload bytes for the record opened by [`Encoder::begin_bin`] or
    /// [`Encoder::begin_str`]. Any split into calls is fine as long as the total matches
    /// the declared length.
    pub fn write_payload(&mut self, bytes: &[u8]) -> &mut Self {
        if bytes.len() > self.pending {
            let extra = bytes.len() - std::mem::replace(&mut self.pending, 0);
            self.latch(EncodeError::PayloadOverrun { extra });
        } else {
            self.pending -= bytes.len();
        }
        self.out.put_slice(bytes);
        self
    }

    /// Writes a code value. Only the low 13 bits are kept; a larger code is a fault.
    pub fn add_code(&mut self, code: u16) -> &mut Self {
        self.on_value();
        self.check_code(code);
        self.put_u13(Kind::Code, code);
        self
    }

    pub fn add_null(&mut self) -> &mut Self {
        self.on_value();
        self.out.put_u8(join_header(Kind::Null, 0));
        self
    }

    /// Writes a container marker.
    pub fn container(&mut self, c: Container) -> &mut Self {
        match c {
            Container::ArrOpen => {
                self.on_value();
                self.frames.push(Frame::Array);
            }
            Container::ObjOpen => {
                self.on_value();
                self.frames.push(Frame::Object(true));
            }
            Container::ArrClose | Container::ObjClose => self.close(c),
        }
        self.out.put_u8(c.header());
        self
    }

    fn close(&mut self, found: Container) {
        self.settle_payload();
        match self.frames.pop() {
            None => self.latch(EncodeError::UnmatchedClose { found }),
            Some(Frame::Array) if found == Container::ArrClose => {}
            Some(Frame::Object(true)) if found == Container::ObjClose => {}
            Some(Frame::Object(false)) if found == Container::ObjClose => {
                self.latch(EncodeError::DanglingKey)
            }
            Some(frame) => {
                let expected = match frame {
                    Frame::Array => Container::ArrClose,
                    Frame::Object(_) => Container::ObjClose,
                };
                self.latch(EncodeError::MismatchedClose { expected, found })
            }
        }
    }

    pub fn begin_obj(&mut self) -> &mut Self { self.container(Container::ObjOpen) }

    pub fn end_obj(&mut self) -> &mut Self { self.container(Container::ObjClose) }

    pub fn begin_arr(&mut self) -> &mut Self { self.container(Container::ArrOpen) }

    pub fn end_arr(&mut self) -> &mut Self { self.container(Container::ArrClose) }

    /// Appends an encoded document byte for byte. It counts as one value.
    pub fn add_document(&mut self, doc: &[u8]) -> &mut Self {
        self.on_value();
        self.out.put_slice(doc);
        self
    }

    /// Writes any [`Value`].
    pub fn add<'v>(&mut self, v: impl Into<Value<'v>>) -> &mut Self {
        match v.into() {
            Value::Null => self.add_null(),
            Value::Bool(b) => self.add_bool(b),
            Value::Int(i) => self.add_int(i),
            Value::Float(f, d) => self.add_float(f, d),
            Value::Text(t) => self.add_str(t),
            Value::Bytes(b) => {
                self.add_bin(b);
                self
            }
            Value::Code(c) => self.add_code(c),
            Value::Document(d) => self.add_document(d),
        }
    }
}

/// Text cut to the nearest char boundary under the length limit, if it is UTF-8.
fn clamp_text<'a>(t: Text<'a>) -> &'a [u8] {
    let bytes = t.as_bytes();
    match t.to_str() {
        Some(s) if bytes.len() > MAX_LEN => &bytes[..floor_char_boundary(s, MAX_LEN)],
        _ => bytes,
    }
}

/// A borrowed key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyRef<'a> {
    Code(u16),
    Text(Text<'a>),
}

impl From<u16> for KeyRef<'_> {
    fn from(c: u16) -> Self { KeyRef::Code(c) }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(s: &'a str) -> Self { KeyRef::Text(Text::from(s)) }
}

impl<'a> From<&'a String> for KeyRef<'a> {
    fn from(s: &'a String) -> Self { KeyRef::Text(Text::from(s)) }
}

impl<'a> From<Text<'a>> for KeyRef<'a> {
    fn from(t: Text<'a>) -> Self { KeyRef::Text(t) }
}

impl<'a> From<&'a Key> for KeyRef<'a> {
    fn from(k: &'a Key) -> Self {
        match k {
            Key::Code(c) => KeyRef::Code(*c),
            Key::Text(s) => KeyRef::from(s),
        }
    }
}

/// Writes a [`Bson`] tree.
pub fn encode<S: Sink>(b: &Bson, enc: &mut Encoder<S>) {
    match b {
        Bson::Array(items) => {
            enc.begin_arr();
            for item in items {
                encode(item, enc);
            }
            enc.end_arr();
        }
        Bson::Object(entries) => {
            enc.begin_obj();
            for (k, v) in entries {
                enc.add_key(k);
                encode(v, enc);
            }
            enc.end_obj();
        }
        scalar => {
            if let Some(v) = Value::from_scalar(scalar) {
                enc.add(v);
            }
        }
    }
}

/// Encodes a [`Bson`] tree into a new [`Document`].
pub fn encode_full(b: &Bson) -> Document {
    let mut enc = Encoder::new();
    encode(b, &mut enc);
    enc.into_inner()
}
