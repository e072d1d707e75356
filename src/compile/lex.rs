use crate::types::span::Span;
use crate::types::syntax::Delimiters;
use crate::{Error, Result};

/// A lexer that tokenizes the template source into text and tags so that the
/// parser doesn't have to operate on raw text.
///
/// The lexer is implemented as a fallible iterator. Call
/// [`.next()?`][Lexer::next] to return the next token until [`None`] is
/// returned.
///
/// Text tokens never span more than a single line, they are split after every
/// `\n`. The standalone pass relies on this to look at a template line by
/// line.
pub struct Lexer<'source> {
    /// The original template source.
    pub source: &'source str,

    /// A cursor over the template source.
    cursor: usize,

    /// The currently active delimiters, updated by `{{=<% %>=}}` tags.
    delims: Delimiters,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Raw template text.
    Text,
    /// Leading whitespace of a standalone partial tag. Only emitted by the
    /// standalone pass, always directly followed by the partial tag.
    Indent,
    /// A tag and the span of its body, e.g. ` name ` in `{{# name }}`.
    Tag(Tag, Span),
}

/// The kind of a tag, decided by the sigil following the open delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `{{ name }}`
    Escaped,
    /// `{{& name }}` or `{{{ name }}}`
    Unescaped,
    /// `{{# name }}`
    Section,
    /// `{{^ name }}`
    Inverted,
    /// `{{/ name }}`
    Close,
    /// `{{! comment }}`
    Comment,
    /// `{{> name }}`
    Partial,
    /// `{{< name }}`
    Parent,
    /// `{{$ name }}`
    Block,
    /// `{{=<% %>=}}`
    Delimiters,
    /// `{{% NAME }}`
    Pragma,
}

impl<'source> Lexer<'source> {
    /// Construct a new lexer.
    pub fn new(source: &'source str, delims: Delimiters) -> Self {
        Self {
            source,
            cursor: 0,
            delims,
        }
    }

    /// Returns the next token and span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;

        if self.source[i..].is_empty() {
            return Ok(None);
        }

        match self.source[i..].find(self.delims.open.as_str()) {
            Some(0) => self.lex_tag(i).map(Some),
            found => {
                // We are within raw template, emit text up to the next open
                // delimiter or the end of the line, whichever comes first.
                //
                // xxxxxxx\nxxxx{{
                // ^        ^   ^
                // i        j   k
                let k = found.map_or(self.source.len(), |d| i + d);
                let j = self.source[i..k].find('\n').map_or(k, |d| i + d + 1);
                self.cursor = j;
                Ok(Some((Token::Text, Span::from(i..j))))
            }
        }
    }

    fn lex_tag(&mut self, i: usize) -> Result<(Token, Span)> {
        // The cursor is exactly at an open delimiter. The sigil decides the
        // tag kind and, for the triple mustache and delimiter change tags,
        // the close delimiter. The following diagram helps describe the
        // variable naming.
        //
        // {{#xxxxxx}}
        // ^ ^^     ^ ^
        // i j k    e n

        let j = i + self.delims.open.len();
        let (tag, suffix) = match self.source[j..].chars().next() {
            Some('#') => (Tag::Section, None),
            Some('^') => (Tag::Inverted, None),
            Some('/') => (Tag::Close, None),
            Some('!') => (Tag::Comment, None),
            Some('>') => (Tag::Partial, None),
            Some('<') => (Tag::Parent, None),
            Some('$') => (Tag::Block, None),
            Some('&') => (Tag::Unescaped, None),
            Some('%') => (Tag::Pragma, None),
            Some('{') => (Tag::Unescaped, Some('}')),
            Some('=') => (Tag::Delimiters, Some('=')),
            _ => (Tag::Escaped, None),
        };
        let k = match tag {
            Tag::Escaped => j,
            // All sigils are a single byte.
            _ => j + 1,
        };

        let close = match suffix {
            Some(c) => format!("{c}{}", self.delims.close),
            None => self.delims.close.clone(),
        };

        let e = match self.source[k..].find(&close) {
            Some(d) => k + d,
            None => {
                return Err(Error::unterminated(
                    format!("unclosed tag, expected `{close}`"),
                    self.source,
                    i..k,
                ));
            }
        };
        let n = e + close.len();
        let body = Span::from(k..e);

        if tag == Tag::Delimiters {
            self.delims = parse_delimiters(&self.source[body]).ok_or_else(|| {
                Error::syntax(
                    "invalid delimiters, expected two delimiters separated by whitespace",
                    self.source,
                    i..n,
                )
            })?;
        }

        self.cursor = n;
        Ok((Token::Tag(tag, body), Span::from(i..n)))
    }
}

/// Parses the body of a delimiter change tag, e.g. `<% %>`.
pub(crate) fn parse_delimiters(body: &str) -> Option<Delimiters> {
    let mut iter = body.split_whitespace();
    let open = iter.next()?;
    let close = iter.next()?;
    if iter.next().is_some() || !Delimiters::is_valid(open) || !Delimiters::is_valid(close) {
        return None;
    }
    Some(Delimiters::new(open, close))
}

impl Tag {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Escaped | Self::Unescaped => "variable",
            Self::Section => "section",
            Self::Inverted => "inverted section",
            Self::Close => "close",
            Self::Comment => "comment",
            Self::Partial => "partial",
            Self::Parent => "parent",
            Self::Block => "block",
            Self::Delimiters => "delimiter",
            Self::Pragma => "pragma",
        }
    }

    /// Whether the tag is removed together with its line when it is the only
    /// thing on that line.
    pub fn is_standalone(&self) -> bool {
        !matches!(self, Self::Escaped | Self::Unescaped)
    }
}

/// A lexer for the body of a single tag.
///
/// Tokenizes the name, attributes and filters of a tag, e.g.
///
/// ```text
/// user.name title="Hello \"World\"" | upper
/// ```
pub struct BodyLexer<'source> {
    /// The original template source.
    source: &'source str,

    /// A cursor over the template source.
    cursor: usize,

    /// The end of the tag body.
    end: usize,
}

/// The unit yielded by the body lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyToken {
    /// A name, a path or an attribute key, e.g. `user.name`
    Name,
    /// `=`
    Eq,
    /// A string literal, e.g. `"Hello World!\n"`
    String,
    /// `|`
    Pipe,
    /// Sequence of spaces, tabs and newlines
    Whitespace,
}

impl<'source> BodyLexer<'source> {
    /// Construct a new lexer over the given tag body.
    pub fn new(source: &'source str, body: Span) -> Self {
        Self {
            source,
            cursor: body.m,
            end: body.n,
        }
    }

    /// Returns the next non-whitespace token and its span.
    pub fn next(&mut self) -> Result<Option<(BodyToken, Span)>> {
        loop {
            match self.lex()? {
                Some((tk, sp)) if tk != BodyToken::Whitespace => return Ok(Some((tk, sp))),
                None => return Ok(None),
                _ => continue,
            }
        }
    }

    /// Returns the next token and span.
    fn lex(&mut self) -> Result<Option<(BodyToken, Span)>> {
        let i = self.cursor;

        // The map call here fixes the index to be relative to the actual
        // template source.
        let mut iter = self.source[i..self.end]
            .char_indices()
            .map(|(d, c)| (i + d, c));

        let (tk, j) = match iter.next() {
            None => return Ok(None),
            Some((_, '=')) => (BodyToken::Eq, i + 1),
            Some((_, '|')) => (BodyToken::Pipe, i + 1),
            Some((_, '"')) => self.lex_string(iter, i)?,
            Some((_, c)) if is_whitespace(c) => {
                (BodyToken::Whitespace, self.lex_while(iter, is_whitespace))
            }
            Some(_) => (BodyToken::Name, self.lex_while(iter, is_name)),
        };

        self.cursor = j;
        Ok(Some((tk, Span::from(i..j))))
    }

    fn lex_string<I>(&self, mut iter: I, i: usize) -> Result<(BodyToken, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        let mut curr = '"';
        loop {
            match iter.next() {
                None => {
                    return Err(self.err_undelimited_string(i..self.end));
                }
                Some((j, '\r' | '\n')) => {
                    return Err(self.err_undelimited_string(i..j));
                }
                Some((j, '"')) if curr != '\\' => {
                    return Ok((BodyToken::String, j + 1));
                }
                // An escaped backslash must not escape the closing quote.
                Some((_, '\\')) if curr == '\\' => {
                    curr = ' ';
                }
                Some((_, c)) => {
                    curr = c;
                }
            }
        }
    }

    fn lex_while<I, P>(&self, iter: I, pred: P) -> usize
    where
        I: Iterator<Item = (usize, char)>,
        P: Fn(char) -> bool,
    {
        for (j, c) in iter {
            if !pred(c) {
                return j;
            }
        }
        self.end
    }

    fn err_undelimited_string(&self, span: impl Into<Span>) -> Error {
        Error::syntax("undelimited string", self.source, span)
    }
}

impl BodyToken {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Eq => "`=`",
            Self::String => "string",
            Self::Pipe => "pipe",
            Self::Whitespace => "whitespace",
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_name(c: char) -> bool {
    !is_whitespace(c) && !matches!(c, '=' | '|' | '"')
}
