//! Defines the [`Value`] enum, representing any valid renderable data.

mod attrs;
mod cow;
mod from;
mod lambda;
#[cfg(feature = "serde")]
mod ser;

pub use std::collections::BTreeMap as Map;
use std::mem;
use std::sync::Arc;
pub use std::vec::Vec as List;

pub use crate::value::attrs::Attrs;
pub(crate) use crate::value::cow::ValueCow;
pub use crate::value::lambda::{Lambda, Object};
#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

/// Data to be rendered represented as a recursive enum.
///
/// Besides plain data a value can also be a [`Lambda`], which is invoked when
/// a tag resolves to it, or an [`Object`], a host type that exposes properties
/// and methods by name.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
    Lambda(Lambda),
    Object(Arc<dyn Object>),
}

impl Value {
    /// Constructs a lambda that can be used in variable tags.
    ///
    /// The function receives the attributes of the tag and its return value is
    /// rendered in place of the tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker::{Attrs, Value};
    ///
    /// let greet = Value::lambda(|attrs: &Attrs| {
    ///     format!("Hello {}!", attrs.get_str("name").unwrap_or("World"))
    /// });
    /// ```
    pub fn lambda<F, R>(f: F) -> Self
    where
        F: Fn(&Attrs) -> R + Send + Sync + 'static,
        R: crate::filters::FilterReturn,
    {
        Self::Lambda(Lambda::variable(f))
    }

    /// Constructs a lambda that can be used in section tags.
    ///
    /// See [`Lambda::section`] for more information.
    pub fn section_lambda<F>(f: F) -> Self
    where
        F: Fn(&str, &crate::Helper<'_>, &Attrs) -> crate::Result<String> + Send + Sync + 'static,
    {
        Self::Lambda(Lambda::section(f))
    }

    /// Wraps a host object so that its properties and methods can be resolved
    /// from templates.
    pub fn object<O>(object: O) -> Self
    where
        O: Object + 'static,
    {
        Self::Object(Arc::new(object))
    }

    pub(crate) fn human(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Lambda(_) => "lambda",
            Self::Object(_) => "object",
        }
    }

    /// Whether a section over this value renders its body.
    ///
    /// `None`, `false`, the empty string, and empty lists and maps are falsy,
    /// everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::List(list) => !list.is_empty(),
            Self::Map(map) => !map.is_empty(),
            Self::Integer(_) | Self::Float(_) | Self::Lambda(_) | Self::Object(_) => true,
        }
    }

    /// Looks up a single path segment in this value.
    ///
    /// Maps are indexed by key, lists by a base 10 index and objects by
    /// property or method name.
    pub(crate) fn get(&self, key: &str) -> Option<ValueCow<'_>> {
        match self {
            Self::Map(map) => map.get(key).map(ValueCow::Borrowed),
            Self::List(list) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| list.get(i))
                .map(ValueCow::Borrowed),
            Self::Object(object) => lambda::lookup(object, key).map(ValueCow::Owned),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            (Self::Lambda(s), Self::Lambda(o)) => s == o,
            (Self::Object(s), Self::Object(o)) => Arc::ptr_eq(s, o),
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_truthiness() {
        let falsy = [
            Value::None,
            Value::Bool(false),
            Value::from(""),
            Value::List(List::new()),
            Value::Map(Map::new()),
        ];
        for v in falsy {
            assert!(!v.is_truthy(), "{v:?} should be falsy");
        }
        let truthy = [
            Value::Bool(true),
            Value::Integer(0),
            Value::Float(0.0),
            Value::from("0"),
            Value::from(["x"]),
            Value::from([("k", "v")]),
            Value::lambda(|_: &Attrs| "x"),
        ];
        for v in truthy {
            assert!(v.is_truthy(), "{v:?} should be truthy");
        }
    }

    #[test]
    fn value_get_segments() {
        let v = Value::from([("list", Value::from(["a", "b"]))]);
        assert_eq!(v.get("list").unwrap().get("1").as_deref(), Some(&Value::from("b")));
        assert!(v.get("missing").is_none());
        assert!(v.get("list").unwrap().get("x").is_none());
        assert!(Value::from("scalar").get("len").is_none());
    }
}
