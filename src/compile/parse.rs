use std::collections::BTreeMap;
use std::mem;

use tracing::trace;

use crate::compile::lex::{self, BodyLexer, BodyToken, Lexer, Tag, Token};
use crate::compile::standalone::Standalone;
use crate::types::ast;
use crate::types::pragma::{Pragma, Pragmas};
use crate::types::span::Span;
use crate::types::syntax::Delimiters;
use crate::{Error, Result};

/// A parser that constructs a node tree from a token stream.
///
/// The parser is implemented as a simple hand written parser with no
/// recursion. Nested sections, blocks and parents are tracked using an
/// explicit stack.
pub struct Parser<'source> {
    /// The token stream with standalone lines removed.
    tokens: Standalone<'source>,

    /// The delimiters active at the current token.
    delims: Delimiters,

    /// The pragmas enabled at the current token.
    pragmas: Pragmas,
}

/// Stores the state of an open tag during parsing.
enum State {
    /// A partial `{{# name }}` or `{{^ name }}` section.
    Section {
        /// The name as written in the open tag.
        name: Span,
        path: ast::Path,
        inverted: bool,
        attrs: ast::AttrMap,
        filters: Vec<ast::Ident>,
        /// The span of the open tag.
        span: Span,
        delims: Delimiters,
        pragmas: Pragmas,
    },

    /// A partial `{{$ name }}` block.
    Block {
        name: ast::Ident,
        attrs: ast::AttrMap,
        /// The span of the open tag.
        span: Span,
    },

    /// A partial `{{< name }}` parent.
    Parent {
        name: ast::Ident,
        attrs: ast::AttrMap,
        /// The span of the open tag.
        span: Span,
        overrides: BTreeMap<String, ast::Block>,
    },
}

/// The parsed body of a tag, e.g. `user.name title="x" | upper`.
struct TagBody {
    name: Span,
    attrs: ast::AttrMap,
    filters: Vec<ast::Ident>,
}

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str, delims: Delimiters, pragmas: Pragmas) -> Self {
        let lexer = Lexer::new(source, delims.clone());
        Self {
            tokens: Standalone::new(lexer),
            delims,
            pragmas,
        }
    }

    /// Parses a template.
    ///
    /// Open tags push their state, together with the nodes collected so far,
    /// onto a stack. A close tag pops the state and turns the nodes collected
    /// since the open tag into the body of the new node.
    pub fn parse_template(mut self) -> Result<Vec<ast::Node>> {
        let mut blocks: Vec<(State, Vec<ast::Node>)> = Vec::new();
        let mut nodes = Vec::new();
        let mut indent = None;

        while let Some((tk, span)) = self.tokens.next()? {
            let (tag, body) = match tk {
                // Simply raw template, emit a single node for it.
                Token::Text => {
                    nodes.push(ast::Node::Text(span));
                    continue;
                }

                // The standalone pass emits this directly before a partial
                // tag.
                Token::Indent => {
                    indent = Some(span);
                    continue;
                }

                Token::Tag(tag, body) => (tag, body),
            };

            let node = match tag {
                Tag::Comment => continue,

                // The lexer has already switched to the new delimiters, we
                // only need to remember them for section lambdas.
                Tag::Delimiters => {
                    self.delims = lex::parse_delimiters(&self.source()[body])
                        .ok_or_else(|| Error::syntax("invalid delimiters", self.source(), span))?;
                    continue;
                }

                Tag::Pragma => {
                    self.parse_pragma(body, span)?;
                    continue;
                }

                // A variable, e.g. `{{ user.name }}`
                Tag::Escaped | Tag::Unescaped => {
                    let TagBody {
                        name,
                        attrs,
                        filters,
                    } = self.parse_tag_body(tag, body, span)?;
                    ast::Node::Variable(ast::Variable {
                        path: self.parse_path(name)?,
                        escaped: tag == Tag::Escaped,
                        attrs,
                        filters,
                    })
                }

                // The start of a section, e.g. `{{# items }}`
                Tag::Section | Tag::Inverted => {
                    let TagBody {
                        name,
                        attrs,
                        filters,
                    } = self.parse_tag_body(tag, body, span)?;
                    let state = State::Section {
                        name,
                        path: self.parse_path(name)?,
                        inverted: tag == Tag::Inverted,
                        attrs,
                        filters,
                        span,
                        delims: self.delims.clone(),
                        pragmas: self.pragmas,
                    };
                    blocks.push((state, mem::take(&mut nodes)));
                    continue;
                }

                // The start of a block, e.g. `{{$ title }}`
                Tag::Block => {
                    self.require(Pragma::Blocks, "block tags", span)?;
                    let TagBody { name, attrs, .. } = self.parse_tag_body(tag, body, span)?;
                    let state = State::Block {
                        name: self.parse_name(name),
                        attrs,
                        span,
                    };
                    blocks.push((state, mem::take(&mut nodes)));
                    continue;
                }

                // The start of a parent, e.g. `{{< layout }}`
                Tag::Parent => {
                    self.require(Pragma::Blocks, "parent tags", span)?;
                    let TagBody { name, attrs, .. } = self.parse_tag_body(tag, body, span)?;
                    let state = State::Parent {
                        name: self.parse_name(name),
                        attrs,
                        span,
                        overrides: BTreeMap::new(),
                    };
                    blocks.push((state, mem::take(&mut nodes)));
                    continue;
                }

                // A partial, e.g. `{{> user }}`
                Tag::Partial => {
                    let TagBody { name, attrs, .. } = self.parse_tag_body(tag, body, span)?;
                    ast::Node::Partial(ast::Partial {
                        name: self.parse_name(name),
                        attrs,
                        indent: indent.take(),
                    })
                }

                // The end of a section, block or parent, e.g. `{{/ items }}`
                //
                // The name must match the innermost open tag exactly.
                Tag::Close => {
                    let name = self.parse_close(body, span)?;
                    let (state, outer) = blocks.pop().ok_or_else(|| {
                        Error::syntax("unexpected close tag", self.source(), span)
                    })?;
                    let open = state.name_span();
                    if self.source()[open] != self.source()[name] {
                        return Err(Error::syntax(
                            format!(
                                "mismatched close tag, expected `{}`",
                                &self.source()[open]
                            ),
                            self.source(),
                            name,
                        ));
                    }
                    let body = mem::replace(&mut nodes, outer);

                    match state {
                        State::Section {
                            path,
                            inverted,
                            attrs,
                            filters,
                            span: open,
                            delims,
                            pragmas,
                            ..
                        } => ast::Node::Section(ast::Section {
                            path,
                            inverted,
                            attrs,
                            filters,
                            body,
                            inner: Span::from(open.n..span.m),
                            delims,
                            pragmas,
                        }),

                        State::Block { name, attrs, .. } => {
                            let block = ast::Block { name, attrs, body };
                            // Blocks directly inside a parent are overrides,
                            // a repeated name replaces the earlier one.
                            if let Some((State::Parent { overrides, .. }, _)) = blocks.last_mut() {
                                trace!(name = %block.name.name, "parsed block override");
                                overrides.insert(block.name.name.clone(), block);
                                continue;
                            }
                            ast::Node::Block(block)
                        }

                        // Anything inside a parent other than block overrides
                        // is discarded.
                        State::Parent {
                            name,
                            attrs,
                            overrides,
                            ..
                        } => ast::Node::Parent(ast::Parent {
                            name,
                            attrs,
                            overrides,
                        }),
                    }
                }
            };

            nodes.push(node);
        }

        if let Some((state, _)) = blocks.last() {
            let (msg, span) = match state {
                State::Section { span, .. } => ("unclosed section", span),
                State::Block { span, .. } => ("unclosed block", span),
                State::Parent { span, .. } => ("unclosed parent", span),
            };
            return Err(Error::syntax(msg, self.source(), *span));
        }

        Ok(nodes)
    }

    /// Parses a pragma tag and enables the pragma for the rest of the
    /// template.
    ///
    ///   FILTERS
    ///
    ///   BLOCKS some=option
    ///
    fn parse_pragma(&mut self, body: Span, span: Span) -> Result<()> {
        let mut tokens = BodyLexer::new(self.source(), body);
        let name = match tokens.next()? {
            Some((BodyToken::Name, name)) => &self.source()[name],
            Some((tk, sp)) => return Err(self.err_unexpected_token("pragma name", tk, sp)),
            None => return Err(Error::syntax("expected pragma name", self.source(), span)),
        };
        // Anything after the name are pragma options which none of the
        // supported pragmas take.
        match Pragma::from_name(name) {
            Some(pragma) => self.pragmas.enable(pragma),
            None => trace!(name, "ignoring unknown pragma"),
        }
        Ok(())
    }

    /// Parses the body of a close tag, which is only a name.
    fn parse_close(&self, body: Span, span: Span) -> Result<Span> {
        let mut tokens = BodyLexer::new(self.source(), body);
        let name = match tokens.next()? {
            Some((BodyToken::Name, name)) => name,
            Some((tk, sp)) => return Err(self.err_unexpected_token("name", tk, sp)),
            None => return Err(Error::syntax("expected name", self.source(), span)),
        };
        if let Some((tk, sp)) = tokens.next()? {
            return Err(self.err_unexpected_token("end of tag", tk, sp));
        }
        Ok(name)
    }

    /// Parses the body of a tag. This is a name followed by attributes and
    /// filters, for example
    ///
    ///   user.name
    ///
    ///   link href="/home" title=page.title
    ///
    ///   user.name | trim | upper
    ///
    fn parse_tag_body(&self, tag: Tag, body: Span, span: Span) -> Result<TagBody> {
        let mut tokens = BodyLexer::new(self.source(), body);

        let name = match tokens.next()? {
            Some((BodyToken::Name, name)) => name,
            Some((tk, sp)) => return Err(self.err_unexpected_token("name", tk, sp)),
            None => return Err(Error::syntax("expected name", self.source(), span)),
        };

        let mut attrs = ast::AttrMap::default();
        let mut filters = Vec::new();

        while let Some((tk, sp)) = tokens.next()? {
            match tk {
                // An attribute, e.g. `title="x"`
                BodyToken::Name if filters.is_empty() => {
                    self.require(Pragma::Attributes, "attributes", sp)?;
                    let key = self.parse_ident(sp)?;
                    match tokens.next()? {
                        Some((BodyToken::Eq, _)) => {}
                        Some((tk, sp)) => return Err(self.err_unexpected_token("`=`", tk, sp)),
                        None => {
                            return Err(Error::syntax("expected `=`", self.source(), sp));
                        }
                    }
                    let value = match tokens.next()? {
                        Some((BodyToken::String, sp)) => {
                            ast::AttrValue::Literal(self.parse_string(sp)?)
                        }
                        Some((BodyToken::Name, sp)) => ast::AttrValue::Var(self.parse_path(sp)?),
                        Some((tk, sp)) => {
                            return Err(self.err_unexpected_token("attribute value", tk, sp));
                        }
                        None => {
                            return Err(Error::syntax(
                                "expected attribute value",
                                self.source(),
                                key.span,
                            ));
                        }
                    };
                    attrs.insert(key, value);
                }

                // A filter, e.g. `| upper`
                BodyToken::Pipe => {
                    if !matches!(tag, Tag::Escaped | Tag::Unescaped | Tag::Section | Tag::Inverted) {
                        return Err(Error::syntax(
                            format!("filters are not allowed on {} tags", tag.human()),
                            self.source(),
                            sp,
                        ));
                    }
                    self.require(Pragma::Filters, "filters", sp)?;
                    match tokens.next()? {
                        Some((BodyToken::Name, sp)) => filters.push(self.parse_ident(sp)?),
                        Some((tk, sp)) => {
                            return Err(self.err_unexpected_token("filter name", tk, sp));
                        }
                        None => {
                            return Err(Error::syntax("expected filter name", self.source(), sp));
                        }
                    }
                }

                tk => return Err(self.err_unexpected_token("end of tag", tk, sp)),
            }
        }

        Ok(TagBody {
            name,
            attrs,
            filters,
        })
    }

    /// Parses a variable path.
    ///
    ///   .
    ///
    ///   user.names.0
    ///
    ///   .name
    ///
    fn parse_path(&self, span: Span) -> Result<ast::Path> {
        let raw = &self.source()[span];
        if raw == "." {
            return Ok(ast::Path {
                anchored: false,
                segments: Vec::new(),
                span,
            });
        }
        let (anchored, rest) = match raw.strip_prefix('.') {
            Some(rest) if self.pragmas.contains(Pragma::AnchoredDot) => (true, rest),
            _ => (false, raw),
        };
        let segments: Vec<_> = rest.split('.').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::syntax(
                format!("invalid name `{raw}`"),
                self.source(),
                span,
            ));
        }
        Ok(ast::Path {
            anchored,
            segments,
            span,
        })
    }

    /// Parses the name of a partial, parent or block. Template names are not
    /// restricted, e.g. `layouts/base` is valid.
    fn parse_name(&self, span: Span) -> ast::Ident {
        ast::Ident {
            name: self.source()[span].to_owned(),
            span,
        }
    }

    /// Parses an identifier, e.g. an attribute key or a filter name.
    fn parse_ident(&self, span: Span) -> Result<ast::Ident> {
        let raw = &self.source()[span];
        let mut chars = raw.chars();
        let valid = chars.next().map_or(false, is_ident_start) && chars.all(is_ident);
        if !valid {
            return Err(Error::syntax(
                format!("invalid identifier `{raw}`"),
                self.source(),
                span,
            ));
        }
        Ok(ast::Ident {
            name: raw.to_owned(),
            span,
        })
    }

    /// Parses a string and handles escape characters.
    fn parse_string(&self, span: Span) -> Result<String> {
        let raw = &self.source()[span];
        let inner = &raw[1..raw.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }
        let mut iter = inner.char_indices().map(|(i, c)| (span.m + 1 + i, c));
        let mut string = String::with_capacity(inner.len());
        while let Some((i, c)) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            let c = match iter.next() {
                Some((_, 'n')) => '\n',
                Some((_, 'r')) => '\r',
                Some((_, 't')) => '\t',
                Some((_, '\\')) => '\\',
                Some((_, '"')) => '"',
                Some((j, c)) => {
                    return Err(Error::syntax(
                        "unknown escape character",
                        self.source(),
                        i..j + c.len_utf8(),
                    ));
                }
                None => {
                    return Err(Error::syntax(
                        "unknown escape character",
                        self.source(),
                        i..i + 1,
                    ));
                }
            };
            string.push(c);
        }
        Ok(string)
    }

    /// Returns an error if the pragma is not enabled.
    fn require(&self, pragma: Pragma, what: &str, span: Span) -> Result<()> {
        if self.pragmas.contains(pragma) {
            return Ok(());
        }
        Err(Error::syntax(
            format!("{what} require the {pragma} pragma"),
            self.source(),
            span,
        ))
    }

    fn source(&self) -> &'source str {
        self.tokens.source()
    }

    fn err_unexpected_token(&self, expected: &str, tk: BodyToken, span: Span) -> Error {
        Error::syntax(
            format!("expected {expected}, found {}", tk.human()),
            self.source(),
            span,
        )
    }
}

impl State {
    /// The span of the name in the open tag.
    fn name_span(&self) -> Span {
        match self {
            Self::Section { name, .. } => *name,
            Self::Block { name, .. } | Self::Parent { name, .. } => name.span,
        }
    }
}

#[cfg(feature = "unicode")]
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
fn is_ident(c: char) -> bool {
    c == '-' || unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_')
}

#[cfg(not(feature = "unicode"))]
fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_' | '-')
}
