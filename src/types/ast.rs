//! The node tree representing a compiled template.
//!
//! Trees are immutable once parsed and may be rendered any number of times
//! with different data.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::types::pragma::Pragmas;
use crate::types::span::Span;
use crate::types::syntax::Delimiters;

#[derive(Debug)]
pub struct Template<'source> {
    pub source: Cow<'source, str>,
    pub nodes: Vec<Node>,
}

#[derive(Debug)]
pub enum Node {
    /// Raw template text, emitted verbatim.
    Text(Span),
    Variable(Variable),
    Section(Section),
    Partial(Partial),
    Block(Block),
    Parent(Parent),
}

/// `{{ name }}`, `{{{ name }}}` or `{{& name }}`
#[derive(Debug)]
pub struct Variable {
    pub path: Path,
    pub escaped: bool,
    pub attrs: AttrMap,
    pub filters: Vec<Ident>,
}

/// `{{# name }} ... {{/ name }}` or `{{^ name }} ... {{/ name }}`
#[derive(Debug)]
pub struct Section {
    pub path: Path,
    pub inverted: bool,
    pub attrs: AttrMap,
    pub filters: Vec<Ident>,
    pub body: Vec<Node>,
    /// The verbatim source between the open and close tags.
    pub inner: Span,
    /// The delimiters active at the open tag.
    pub delims: Delimiters,
    /// The pragmas enabled at the open tag.
    pub pragmas: Pragmas,
}

/// `{{> name }}`
#[derive(Debug)]
pub struct Partial {
    pub name: Ident,
    pub attrs: AttrMap,
    /// Leading whitespace of a standalone partial tag.
    pub indent: Option<Span>,
}

/// `{{$ name }} ... {{/ name }}`
///
/// Either a block definition with default content inside an inheritable
/// template or an override inside a `{{< parent }}` tag.
#[derive(Debug)]
pub struct Block {
    pub name: Ident,
    pub attrs: AttrMap,
    pub body: Vec<Node>,
}

/// `{{< name }} ... {{/ name }}`
#[derive(Debug)]
pub struct Parent {
    pub name: Ident,
    pub attrs: AttrMap,
    pub overrides: BTreeMap<String, Block>,
}

/// A variable path, e.g. `user.name` or the implicit iterator `.`.
#[derive(Debug, Clone)]
pub struct Path {
    /// Whether the path is anchored to the top frame, e.g. `.name`.
    pub anchored: bool,
    /// The dot separated segments, empty for the implicit iterator.
    pub segments: Vec<String>,
    pub span: Span,
}

/// A name in a tag, e.g. a partial name or a filter name.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// The attributes attached to a tag, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    pub entries: Vec<(Ident, AttrValue)>,
}

#[derive(Debug, Clone)]
pub enum AttrValue {
    /// `key="literal"`
    Literal(String),
    /// `key=path`
    Var(Path),
}

impl Path {
    pub fn is_implicit_iterator(&self) -> bool {
        self.segments.is_empty()
    }
}

impl AttrMap {
    /// Inserts an attribute, a repeated key replaces the previous entry and
    /// moves to the end.
    pub fn insert(&mut self, key: Ident, value: AttrValue) {
        self.entries.retain(|(k, _)| k.name != key.name);
        self.entries.push((key, value));
    }
}
