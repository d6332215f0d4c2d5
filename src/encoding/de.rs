use super::tag::*;
use crate::{errors::ParseError, inum::Inum, text::Text, util::digits_to_u64, value::Value};
use num_traits::{AsPrimitive, PrimInt, WrappingNeg};
use std::mem::size_of;

/// Where a [`Parser`] is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing decoded since the start or the last reset.
    Ready,
    /// A record of this kind was decoded and more bytes follow.
    Decoded(Kind),
    /// A record of this kind was decoded and ended exactly at the end of the buffer.
    Done(Kind),
    /// A read would have crossed the end of the buffer. Permanent.
    Error,
}

/// One decoded record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Token<'a> {
    Value(Value<'a>),
    Container(Container),
}

/// A linear, non-allocating reader over an encoded buffer.
///
/// Each [`advance`](Parser::advance) decodes one record; the accessors then read the
/// current record. Accessors for another kind return zero or empty values.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let mut enc = Encoder::new();
/// enc.begin_arr().add(-300).add("hi").end_arr();
/// let doc = enc.finish().unwrap();
///
/// let mut p = doc.parser();
/// assert!(p.advance_char('['));
/// assert!(p.advance_kind(Kind::Integer));
/// assert_eq!(p.to_int(), -300);
/// assert_eq!(p.to_str(), "");
/// assert!(p.advance_kind(Kind::String));
/// assert_eq!(p.to_str(), "hi");
/// assert!(p.advance_char(']'));
/// assert!(p.is_done());
/// ```
#[derive(Clone, Debug)]
pub struct Parser<'a> {
    buf: &'a [u8],
    cur: usize,
    state: State,
    /// Data5 of the current header.
    data: u8,
    /// Decoded 13-bit length or code.
    aux: u16,
    /// Payload of the current record.
    payload: (usize, usize),
    error: Option<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Parser {
            buf,
            cur: 0,
            state: State::Ready,
            data: 0,
            aux: 0,
            payload: (0, 0),
            error: None,
        }
    }

    /// Rewinds to the start of the buffer. Has no effect once an error was hit.
    pub fn reset(&mut self) {
        if self.state != State::Error {
            self.cur = 0;
            self.state = State::Ready;
        }
    }

    pub fn state(&self) -> State { self.state }

    /// Kind of the current record.
    pub fn kind(&self) -> Option<Kind> {
        match self.state {
            State::Decoded(k) | State::Done(k) => Some(k),
            State::Ready | State::Error => None,
        }
    }

    /// Whether the last record ended exactly at the end of the buffer.
    pub fn is_done(&self) -> bool { matches!(self.state, State::Done(_)) }

    pub fn is_error(&self) -> bool { self.state == State::Error }

    /// Why the parser stopped, if it did.
    pub fn error(&self) -> Option<&ParseError> { self.error.as_ref() }

    /// Offset of the next header.
    pub fn position(&self) -> usize { self.cur }

    pub fn remaining(&self) -> usize { self.buf.len() - self.cur }

    /// The bytes being parsed.
    pub fn buffer(&self) -> &'a [u8] { self.buf }

    #[cold]
    fn abort(&mut self, e: ParseError) -> bool {
        log::debug!("parsing stopped: {}", e);
        self.state = State::Error;
        self.cur = self.buf.len();
        self.error = Some(e);
        false
    }

    /// Decodes the next record.
    ///
    /// Returns `false` if the record does not fit in the buffer, or if there is no record
    /// left; the parser is then in [`State::Error`] and stays there.
    pub fn advance(&mut self) -> bool {
        if self.state == State::Error {
            return false;
        }
        let buf = self.buf;
        let offset = self.cur;
        if offset >= buf.len() {
            return self.abort(ParseError::Exhausted { offset });
        }

        let (kind, data) = split_header(buf[offset]);
        let rest = &buf[offset + 1..];

        // bytes before the payload, then the payload
        let (head, len, aux) = if kind.has_u13() {
            let lsb = match rest.first() {
                Some(b) => *b,
                None => {
                    return self.abort(ParseError::Truncated {
                        kind,
                        offset,
                        needed: 1,
                        remaining: 0,
                    })
                }
            };
            let v = join_u13(data, lsb);
            if kind == Kind::Code {
                (1, 0, v)
            } else {
                (1, v as usize, v)
            }
        } else {
            match kind {
                Kind::Integer => {
                    let width = data & MASK_INT_WIDTH;
                    if width > MAX_INT_WIDTH {
                        return self.abort(ParseError::InvalidWidth { offset, width });
                    }
                    (0, width as usize, 0)
                }
                Kind::Float => (0, FLOAT_SIZE, 0),
                _ => (0, 0, 0),
            }
        };

        if rest.len() < head + len {
            return self.abort(ParseError::Truncated {
                kind,
                offset,
                needed: head + len,
                remaining: rest.len(),
            });
        }

        let start = offset + 1 + head;
        self.payload = (start, start + len);
        self.cur = start + len;
        self.data = data;
        self.aux = aux;
        self.state = if self.cur == buf.len() {
            State::Done(kind)
        } else {
            State::Decoded(kind)
        };
        true
    }

    /// Decodes the next record and checks its kind.
    pub fn advance_kind(&mut self, kind: Kind) -> bool { self.advance() && self.kind() == Some(kind) }

    /// Decodes the next record and checks it is the container marker `c`.
    pub fn advance_container(&mut self, c: Container) -> bool {
        self.advance_kind(Kind::Container) && self.container() == Some(c)
    }

    /// Like [`Parser::advance_container`], with the marker given as `[`, `]`, `{` or `}`.
    /// Any other character decodes the next record and returns `false`.
    pub fn advance_char(&mut self, c: char) -> bool {
        match Container::from_char(c) {
            Some(c) => self.advance_container(c),
            None => {
                self.advance();
                false
            }
        }
    }

    fn is(&self, kind: Kind) -> bool { self.kind() == Some(kind) }

    fn payload(&self) -> &'a [u8] { &self.buf[self.payload.0..self.payload.1] }

    /// The container marker of the current record.
    pub fn container(&self) -> Option<Container> {
        if self.is(Kind::Container) {
            Some(Container::from_data(self.data))
        } else {
            None
        }
    }

    pub fn is_object(&self) -> bool { self.container().map_or(false, Container::is_object) }

    pub fn is_array(&self) -> bool { self.container().map_or(false, |c| !c.is_object()) }

    pub fn is_open(&self) -> bool { self.container().map_or(false, Container::is_open) }

    pub fn is_close(&self) -> bool { self.container().map_or(false, |c| !c.is_open()) }

    /// Byte length of a string or binary, width of an integer, zero otherwise.
    pub fn length(&self) -> u16 {
        match self.kind() {
            Some(Kind::String) | Some(Kind::Binary) => self.aux,
            Some(Kind::Integer) => u16::from(self.data & MASK_INT_WIDTH),
            _ => 0,
        }
    }

    pub fn is_negative(&self) -> bool { self.is(Kind::Integer) && self.data & INT_NEGATIVE != 0 }

    /// Decimal hint of a float.
    pub fn decimals(&self) -> u8 {
        if self.is(Kind::Float) {
            self.data & MASK_DECIMALS
        } else {
            0
        }
    }

    /// The current integer as `T`.
    ///
    /// At most `size_of::<T>()` bytes of the magnitude are read, the rest is dropped; the
    /// result is negated (wrapping) if the record is negative.
    pub fn to_int_as<T>(&self) -> T
    where
        T: PrimInt + WrappingNeg + 'static,
        u64: AsPrimitive<T>,
    {
        if !self.is(Kind::Integer) {
            return T::zero();
        }
        let mag: T = digits_to_u64(self.payload(), size_of::<T>()).as_();
        if self.is_negative() {
            mag.wrapping_neg()
        } else {
            mag
        }
    }

    pub fn to_int(&self) -> i32 { self.to_int_as() }

    pub fn to_uint(&self) -> u32 { self.to_int_as() }

    pub fn to_int64(&self) -> i64 { self.to_int_as() }

    pub fn to_uint64(&self) -> u64 { self.to_int_as() }

    /// The current integer with its full magnitude.
    pub fn to_inum(&self) -> Inum {
        if self.is(Kind::Integer) {
            Inum::new(self.is_negative(), digits_to_u64(self.payload(), 8))
        } else {
            Inum::default()
        }
    }

    pub fn to_float(&self) -> f32 {
        if !self.is(Kind::Float) {
            return 0.0;
        }
        let mut bits = [0u8; FLOAT_SIZE];
        bits.copy_from_slice(self.payload());
        f32::from_le_bytes(bits)
    }

    pub fn to_bool(&self) -> bool { self.is(Kind::Boolean) && self.data & BOOL_TRUE != 0 }

    /// Raw bytes of the current string.
    pub fn to_bytes_str(&self) -> &'a [u8] {
        if self.is(Kind::String) {
            self.payload()
        } else {
            &[]
        }
    }

    /// The current string, or `""` if it is not a string or not UTF-8.
    pub fn to_str(&self) -> &'a str { std::str::from_utf8(self.to_bytes_str()).unwrap_or("") }

    pub fn to_text(&self) -> Text<'a> { Text::new(self.to_bytes_str()) }

    /// Bytes of the current binary.
    pub fn to_bin(&self) -> &'a [u8] {
        if self.is(Kind::Binary) {
            self.payload()
        } else {
            &[]
        }
    }

    /// The current binary as an array, zeroed unless its length is exactly `N`.
    pub fn to_bin_array<const N: usize>(&self) -> [u8; N] {
        let mut out = [0u8; N];
        let bin = self.to_bin();
        if self.is(Kind::Binary) && bin.len() == N {
            out.copy_from_slice(bin);
        }
        out
    }

    pub fn to_code(&self) -> u16 {
        if self.is(Kind::Code) {
            self.aux
        } else {
            0
        }
    }

    pub fn to_code_as<T: From<u16>>(&self) -> T { T::from(self.to_code()) }

    /// The current record as a [`Token`].
    pub fn token(&self) -> Option<Token<'a>> {
        let v = match self.kind()? {
            Kind::Container => return self.container().map(Token::Container),
            Kind::String => Value::Text(self.to_text()),
            Kind::Boolean => Value::Bool(self.to_bool()),
            Kind::Integer => Value::Int(self.to_inum()),
            Kind::Float => Value::Float(self.to_float(), self.decimals()),
            Kind::Code => Value::Code(self.to_code()),
            Kind::Binary => Value::Bytes(self.to_bin()),
            Kind::Null => Value::Null,
        };
        Some(Token::Value(v))
    }

    /// Reads a string. `None` if the next record is not a UTF-8 string.
    pub fn read_str(&mut self) -> Option<&'a str> {
        if self.advance_kind(Kind::String) {
            std::str::from_utf8(self.payload()).ok()
        } else {
            None
        }
    }

    pub fn read_text(&mut self) -> Option<Text<'a>> {
        if self.advance_kind(Kind::String) {
            Some(self.to_text())
        } else {
            None
        }
    }

    pub fn read_bool(&mut self) -> Option<bool> {
        if self.advance_kind(Kind::Boolean) {
            Some(self.to_bool())
        } else {
            None
        }
    }

    pub fn read_int(&mut self) -> Option<i32> {
        if self.advance_kind(Kind::Integer) {
            Some(self.to_int())
        } else {
            None
        }
    }

    pub fn read_int64(&mut self) -> Option<i64> {
        if self.advance_kind(Kind::Integer) {
            Some(self.to_int64())
        } else {
            None
        }
    }

    pub fn read_inum(&mut self) -> Option<Inum> {
        if self.advance_kind(Kind::Integer) {
            Some(self.to_inum())
        } else {
            None
        }
    }

    pub fn read_float(&mut self) -> Option<f32> {
        if self.advance_kind(Kind::Float) {
            Some(self.to_float())
        } else {
            None
        }
    }

    pub fn read_code(&mut self) -> Option<u16> {
        if self.advance_kind(Kind::Code) {
            Some(self.to_code())
        } else {
            None
        }
    }

    pub fn read_bin(&mut self) -> Option<&'a [u8]> {
        if self.advance_kind(Kind::Binary) {
            Some(self.to_bin())
        } else {
            None
        }
    }

    /// Reads a binary of exactly `N` bytes.
    pub fn read_bin_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.advance_kind(Kind::Binary) && self.to_bin().len() == N {
            Some(self.to_bin_array())
        } else {
            None
        }
    }

    /// Iterates over the remaining records, stopping at the end or at an error.
    pub fn records(&mut self) -> Records<'_, 'a> { Records { parser: self } }
}

/// Iterator returned by [`Parser::records`].
#[derive(Debug)]
pub struct Records<'p, 'a> {
    parser: &'p mut Parser<'a>,
}

impl<'p, 'a> Iterator for Records<'p, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.parser.is_done() || self.parser.is_error() || !self.parser.advance() {
            return None;
        }
        self.parser.token()
    }
}
