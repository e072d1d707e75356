//! The context stack that names are resolved against.
//!
//! The stack is a linked list living on the Rust call stack. Pushing a frame
//! borrows the current stack and returns a new one, so frames are released as
//! soon as the scope that pushed them ends, including when an error is
//! propagated.

use crate::types::ast;
use crate::value::{Attrs, ValueCow};
use crate::Value;

#[derive(Debug, Clone, Copy)]
pub struct Stack<'a> {
    frame: Frame<'a>,
    parent: Option<&'a Stack<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// A value, e.g. the render data, a list item or a section value.
    Value(&'a Value),

    /// The resolved attributes of a tag.
    Attrs(&'a Attrs),
}

impl<'a> Stack<'a> {
    /// Construct a new stack with the given root frame.
    pub fn new(root: &'a Value) -> Self {
        Self {
            frame: Frame::Value(root),
            parent: None,
        }
    }

    /// Returns a new stack with the given frame on top of this one.
    pub fn push<'b>(&'b self, frame: Frame<'b>) -> Stack<'b> {
        Stack {
            frame,
            parent: Some(self),
        }
    }

    /// Returns a new stack with the given attributes on top of this one, or
    /// this stack unchanged if there are no attributes.
    pub fn push_attrs<'b>(&'b self, attrs: &'b Attrs) -> Stack<'b> {
        if attrs.is_empty() {
            *self
        } else {
            self.push(Frame::Attrs(attrs))
        }
    }

    /// Resolves a path against the stack.
    ///
    /// The first segment is searched for from the top frame down, the
    /// remaining segments are looked up in the value found for the first
    /// one. Returns `None` if any segment is not found.
    pub fn resolve(&self, path: &ast::Path) -> Option<ValueCow<'a>> {
        if path.is_implicit_iterator() {
            return Some(ValueCow::Borrowed(self.top_value()));
        }
        let (first, rest) = path.segments.split_first()?;

        let mut value = if path.anchored {
            self.top_value().get(first)?
        } else {
            self.frames().find_map(|frame| frame.get(first))?
        };

        for segment in rest {
            value = match value {
                ValueCow::Borrowed(v) => v.get(segment)?,
                ValueCow::Owned(v) => ValueCow::Owned(v.get(segment)?.into_owned()),
            };
        }

        Some(value)
    }

    /// Returns the value in the topmost value frame, attribute frames are
    /// skipped.
    pub fn top_value(&self) -> &'a Value {
        const NONE: &Value = &Value::None;
        let mut stack = self;
        loop {
            match (stack.frame, stack.parent) {
                (Frame::Value(value), _) => return value,
                (Frame::Attrs(_), Some(parent)) => stack = parent,
                // The root frame is always a value.
                (Frame::Attrs(_), None) => return NONE,
            }
        }
    }

    /// Iterates over the frames from the top of the stack down.
    fn frames(&self) -> impl Iterator<Item = Frame<'a>> + '_ {
        let mut next = Some(self);
        std::iter::from_fn(move || {
            let stack = next?;
            next = stack.parent;
            Some(stack.frame)
        })
    }
}

impl<'a> Frame<'a> {
    fn get(self, key: &str) -> Option<ValueCow<'a>> {
        match self {
            Self::Value(value) => value.get(key),
            Self::Attrs(attrs) => attrs.get(key).map(ValueCow::Borrowed),
        }
    }
}
