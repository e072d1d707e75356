//! Removes standalone tag lines from the token stream.
//!
//! A line that contains nothing but whitespace and a single section, inverted,
//! close, comment, partial, parent, block, pragma or delimiter tag does not
//! produce any output. The whitespace around the tag, including the line
//! ending, is dropped. The leading whitespace of a standalone partial tag is
//! kept as an [`Indent`][Token::Indent] token so that the rendered partial can
//! be indented to match.

use std::collections::VecDeque;

use crate::compile::lex::{Lexer, Tag, Token};
use crate::types::span::Span;
use crate::Result;

pub struct Standalone<'source> {
    /// The underlying lexer.
    lexer: Lexer<'source>,

    /// The remaining tokens of the current line.
    line: VecDeque<(Token, Span)>,
}

impl<'source> Standalone<'source> {
    pub fn new(lexer: Lexer<'source>) -> Self {
        Self {
            lexer,
            line: VecDeque::new(),
        }
    }

    /// Returns the original template source.
    pub fn source(&self) -> &'source str {
        self.lexer.source
    }

    /// Returns the next token and span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        if self.line.is_empty() {
            self.fill()?;
        }
        Ok(self.line.pop_front())
    }

    /// Buffers the tokens up to and including the next line ending.
    fn fill(&mut self) -> Result<()> {
        let source = self.lexer.source;
        while let Some((tk, span)) = self.lexer.next()? {
            self.line.push_back((tk, span));
            if tk == Token::Text && source[span].ends_with('\n') {
                break;
            }
        }
        if self.is_standalone() {
            self.strip();
        }
        Ok(())
    }

    fn is_standalone(&self) -> bool {
        let source = self.lexer.source;
        let mut tags = 0;
        for (tk, span) in &self.line {
            match tk {
                Token::Tag(tag, _) if tag.is_standalone() => tags += 1,
                Token::Text if is_blank(&source[*span]) => {}
                _ => return false,
            }
        }
        tags == 1
    }

    fn strip(&mut self) {
        let source = self.lexer.source;
        let indent = match self.line.front() {
            Some((Token::Text, span)) if !source[*span].ends_with('\n') => Some(*span),
            _ => None,
        };
        self.line.retain(|(tk, _)| *tk != Token::Text);
        if let (Some(span), Some((Token::Tag(Tag::Partial, _), _))) = (indent, self.line.front()) {
            self.line.push_front((Token::Indent, span));
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}
