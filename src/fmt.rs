//! Output sinks and value formatting.
//!
//! Rendering writes to a [`Formatter`] which is a [`std::fmt::Write`] façade
//! over either a [`String`] or an arbitrary [`std::io::Write`] buffer.

use std::fmt;
use std::fmt::Write;
use std::io;

use crate::Value;

/// An escape function or closure.
pub(crate) type EscapeFn = dyn Fn(&str) -> String + Send + Sync + 'static;

/// A [`std::fmt::Write`] façade.
pub(crate) struct Formatter<'a> {
    buf: &'a mut (dyn fmt::Write + 'a),
}

pub(crate) struct Writer<W> {
    writer: W,
    err: Option<io::Error>,
}

impl<'a> Formatter<'a> {
    pub fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }

    pub fn with_writer<W>(buf: &'a mut Writer<W>) -> Self
    where
        W: io::Write,
    {
        Self { buf }
    }
}

impl fmt::Write for Formatter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.write_str(s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.buf.write_char(c)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer, err: None }
    }

    pub fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

impl<W> fmt::Write for Writer<W>
where
    W: io::Write,
{
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

/// Formats a value for interpolation.
///
/// Values are formatted as follows:
/// - [`Value::None`]: empty string
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`]: the integer formatted using [`Display`][std::fmt::Display]
/// - [`Value::Float`]: the float formatted using [`Display`][std::fmt::Display]
/// - [`Value::String`]: the string
///
/// Returns `None` for values that have no textual representation.
pub(crate) fn to_text(value: &Value) -> Option<String> {
    let mut s = String::new();
    match value {
        Value::None => {}
        Value::Bool(b) => write!(s, "{b}").ok()?,
        Value::Integer(n) => write!(s, "{n}").ok()?,
        Value::Float(n) => write!(s, "{n}").ok()?,
        Value::String(v) => s.push_str(v),
        Value::List(_) | Value::Map(_) | Value::Lambda(_) | Value::Object(_) => return None,
    }
    Some(s)
}

/// Escapes a string for safe inclusion in HTML.
///
/// This is the default escape function for `{{ name }}` tags. The characters
/// `&`, `<`, `>`, `"` and `'` are replaced with entities.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Prefixes every line in `text` with `indent`.
///
/// Used for standalone partial tags, a trailing newline does not start a new
/// line.
pub(crate) fn indent_lines(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        out.push_str(indent);
        out.push_str(line);
    }
    out
}
