//! JSON-like rendering of encoded documents, for debugging and logs.
//!
//! Codes render as `"#n"`, binaries as `"<bin:len>"`, and floats with as many decimals as
//! their hint asks for.

use crate::{
    encoding::{de::Parser, tag::Kind},
    errors::{DecodeError, ParseError},
};
use failure::Error;
use smallvec::SmallVec;
use std::fmt::{self, Write};

/// Layout of the rendered text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    /// Everything on one line, no spaces.
    Compact,
    /// One element per line, nested `indent` spaces deeper per level.
    Pretty { indent: usize },
}

impl Style {
    pub fn pretty() -> Self { Style::Pretty { indent: 2 } }
}

impl Default for Style {
    fn default() -> Self { Style::Compact }
}

fn newline<W: Write + ?Sized>(out: &mut W, style: Style, depth: usize) -> fmt::Result {
    if let Style::Pretty { indent } = style {
        write!(out, "\n{:width$}", "", width = indent * depth)?;
    }
    Ok(())
}

fn write_escaped<W: Write + ?Sized>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_scalar<W: Write + ?Sized>(out: &mut W, p: &Parser) -> fmt::Result {
    match p.kind() {
        Some(Kind::String) => write_escaped(out, &p.to_text().to_string_lossy()),
        Some(Kind::Boolean) => out.write_str(if p.to_bool() { "true" } else { "false" }),
        Some(Kind::Integer) => write!(out, "{}", p.to_inum()),
        Some(Kind::Float) => {
            let f = p.to_float();
            if f.is_finite() {
                write!(out, "{:.*}", p.decimals() as usize, f)
            } else {
                out.write_str("null")
            }
        }
        Some(Kind::Code) => write!(out, "\"#{}\"", p.to_code()),
        Some(Kind::Binary) => write!(out, "\"<bin:{}>\"", p.to_bin().len()),
        Some(Kind::Null) | Some(Kind::Container) | None => out.write_str("null"),
    }
}

/// Renders every record of `bytes` into `out`.
///
/// Several top-level values are separated by commas. An empty buffer renders as nothing.
///
/// # Errors
///
/// Fails if the buffer is truncated, if containers do not nest, if an object key is not a
/// string or a code, or if `out` fails. Whatever was rendered before the fault stays in
/// `out`.
///
/// # Example
///
/// ```
/// use tbson::{prelude::*, stringify::{stringify, Style}};
///
/// let mut enc = Encoder::new();
/// enc.begin_obj().entry("a", 1).entry("b", vec![0u8; 3].as_slice()).end_obj();
/// let doc = enc.finish().unwrap();
///
/// let mut s = String::new();
/// stringify(&doc, &mut s, Style::Compact).unwrap();
/// assert_eq!(s, r#"{"a":1,"b":"<bin:3>"}"#);
/// ```
pub fn stringify<W: Write + ?Sized>(bytes: &[u8], out: &mut W, style: Style) -> Result<(), Error> {
    if bytes.is_empty() {
        return Ok(());
    }
    let mut p = Parser::new(bytes);
    // `true` for objects
    let mut stack: SmallVec<[bool; 16]> = SmallVec::new();
    let mut expect_key = true;
    let mut first = true;

    while !p.is_done() {
        let offset = p.position();
        if !p.advance() {
            let e = p
                .error()
                .cloned()
                .unwrap_or(ParseError::Exhausted { offset });
            return Err(e.into());
        }
        let in_obj = stack.last() == Some(&true);

        if let Some(c) = p.container().filter(|c| !c.is_open()) {
            match stack.pop() {
                Some(obj) if obj == c.is_object() => {}
                _ => return Err(DecodeError::UnexpectedClose { found: c, offset }.into()),
            }
            if in_obj && !expect_key {
                return Err(DecodeError::MissingValue { offset }.into());
            }
            if !first {
                newline(out, style, stack.len())?;
            }
            out.write_char(c.to_char())?;
            first = false;
            expect_key = true;
            continue;
        }

        if in_obj && !expect_key {
            out.write_char(':')?;
            if let Style::Pretty { .. } = style {
                out.write_char(' ')?;
            }
        } else {
            if !first {
                out.write_char(',')?;
            }
            if !first || !stack.is_empty() {
                newline(out, style, stack.len())?;
            }
        }

        if in_obj && expect_key {
            match p.kind() {
                Some(Kind::String) | Some(Kind::Code) => {}
                Some(kind) => return Err(DecodeError::InvalidKey { kind, offset }.into()),
                None => {}
            }
        }

        match p.container() {
            Some(c) => {
                out.write_char(c.to_char())?;
                stack.push(c.is_object());
                first = true;
                expect_key = true;
            }
            None => {
                write_scalar(out, &p)?;
                if in_obj {
                    expect_key = !expect_key;
                }
                first = false;
            }
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::Unclosed.into());
    }
    Ok(())
}

/// Renders `bytes` on one line.
pub fn to_json(bytes: &[u8]) -> Result<String, Error> {
    let mut s = String::with_capacity(bytes.len() * 2);
    stringify(bytes, &mut s, Style::Compact)?;
    Ok(s)
}

/// Renders `bytes` with [`Style::pretty`].
pub fn to_json_pretty(bytes: &[u8]) -> Result<String, Error> {
    let mut s = String::with_capacity(bytes.len() * 3);
    stringify(bytes, &mut s, Style::pretty())?;
    Ok(s)
}
