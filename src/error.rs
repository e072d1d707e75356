use std::cmp::max;
use std::fmt;
use std::io;

use crate::types::span::Span;

/// The kind of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A tag was opened but never closed before the end of the template.
    UnterminatedTag,
    /// The template is malformed, e.g. a mismatched close tag or extended
    /// grammar used without enabling its pragma.
    Syntax,
    /// A partial or parent template could not be found.
    PartialNotFound,
    /// A filter referenced in the template is not registered.
    FilterNotFound,
    /// A callable was used in a tag that it cannot be invoked from.
    InvalidCallableInvocation,
    /// A value could not be rendered or a callable returned an error.
    Render,
    /// Partials were nested deeper than the configured maximum.
    MaxPartialDepth,
    /// The render data could not be converted to a [`Value`][crate::Value].
    Serialize,
    /// Writing the rendered output failed.
    Io,
}

/// An error that can occur during template compilation or rendering.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    /// The name of the template the error occurred in, if it has one.
    name: Option<String>,
    /// The template source and the region the error points to.
    pretty: Option<(String, Span)>,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            name: None,
            pretty: None,
        }
    }

    fn spanned(kind: ErrorKind, msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            pretty: Some((source.to_owned(), span.into())),
            ..Self::new(kind, msg)
        }
    }

    pub(crate) fn unterminated(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::spanned(ErrorKind::UnterminatedTag, msg, source, span)
    }

    pub(crate) fn syntax(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::spanned(ErrorKind::Syntax, msg, source, span)
    }

    pub(crate) fn partial_not_found(name: &str, source: &str, span: Span) -> Self {
        Self::spanned(
            ErrorKind::PartialNotFound,
            format!("unknown partial `{name}`"),
            source,
            span,
        )
    }

    pub(crate) fn filter_not_found(name: &str, source: &str, span: Span) -> Self {
        Self::spanned(
            ErrorKind::FilterNotFound,
            format!("unknown filter `{name}`"),
            source,
            span,
        )
    }

    pub(crate) fn invalid_call(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCallableInvocation, msg)
    }

    pub(crate) fn render(msg: impl Into<String>, source: &str, span: Span) -> Self {
        Self::spanned(ErrorKind::Render, msg, source, span)
    }

    pub(crate) fn max_partial_depth(max: usize) -> Self {
        Self::new(
            ErrorKind::MaxPartialDepth,
            format!("reached maximum partial depth ({max})"),
        )
    }

    #[cfg(feature = "serde")]
    pub(crate) fn serialize(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Serialize, msg.to_string())
    }

    /// Attaches the template source and span to this error if it does not
    /// already point somewhere.
    pub(crate) fn enrich(mut self, source: &str, span: Span) -> Self {
        if self.pretty.is_none() {
            self.pretty = Some((source.to_owned(), span));
        }
        self
    }

    /// Attaches the template name to this error if it does not already have
    /// one.
    pub(crate) fn with_template_name(mut self, name: &str) -> Self {
        if self.name.is_none() {
            self.name = Some(name.to_owned());
        }
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the name of the template this error occurred in, if any.
    pub fn template_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the one-based line and column the error points to, if any.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        self.pretty.as_ref().map(|(source, span)| {
            let lines: Vec<_> = source.split_terminator('\n').collect();
            let (line, col) = to_line_col(&lines, span.m);
            (line + 1, col + 1)
        })
    }
}

impl From<String> for Error {
    /// Constructs a render error with a custom message, useful for returning
    /// errors from lambdas, objects and filters.
    fn from(msg: String) -> Self {
        Self::new(ErrorKind::Render, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::new(ErrorKind::Render, msg)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::new(ErrorKind::Io, "format error")
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("io error: {err}"))
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) => fmt_pretty(&self.msg, self.name.as_deref(), source, *span, f),
            None => f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("msg", &self.msg)
                .field("name", &self.name)
                .finish(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) if f.alternate() => {
                fmt_pretty(&self.msg, self.name.as_deref(), source, *span, f)
            }
            Some((_, span)) => {
                write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)?;
                if let Some(name) = &self.name {
                    write!(f, " in template `{name}`")?;
                }
                Ok(())
            }
            None => {
                write!(f, "{}", self.msg)?;
                if let Some(name) = &self.name {
                    write!(f, " in template `{name}`")?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_pretty(
    msg: &str,
    name: Option<&str>,
    source: &str,
    span: Span,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, str_width(&source[span]));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default();

    let num = (line + 1).to_string();
    let pad = str_width(&num);
    let pipe = "|";
    let underline = "^".repeat(width);

    if let Some(name) = name {
        write!(f, "\n {0:pad$}--> {name}:{num}:{col}", "", pad = pad, col = col + 1)?;
    }

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, str_width(&line[..offset - n]));
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| str_width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn str_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn str_width(s: &str) -> usize {
    s.chars().count()
}
