use std::ops::Index;
use std::vec;

use crate::Value;

/// The resolved attributes of a tag.
///
/// With the `ATTRIBUTES` pragma enabled, tags can carry attributes:
///
/// ```text
/// {{% ATTRIBUTES }}
/// {{ link href="/home" title=page.title }}
/// ```
///
/// Literal attributes are passed through as strings and variable attributes
/// are looked up in the context just before the tag is rendered. Lambdas and
/// object methods receive the attributes as their argument, sections and
/// partials make them visible to name lookups inside their body.
///
/// Attributes keep the order in which they were declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(String, Value)>,
}

impl Attrs {
    /// Construct an empty set of attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of the attribute with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Returns the value of the attribute with the given name if it is a
    /// string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Inserts an attribute, replacing any previous attribute with the same
    /// name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.entries.retain(|(k, _)| *k != name);
        self.entries.push((name, value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Index<&str> for Attrs {
    type Output = Value;

    /// Returns the attribute value or [`Value::None`] if there is no such
    /// attribute.
    fn index(&self, name: &str) -> &Self::Output {
        const NONE: &Value = &Value::None;
        self.get(name).unwrap_or(NONE)
    }
}

impl IntoIterator for Attrs {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Attrs
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
