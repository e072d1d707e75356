use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::value::{Attrs, Lambda};
use crate::Value;

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $expr:expr;)+) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $expr
                }
            }
        )+
    };
}

impl_from! {
    () => |_v| Value::None;
    bool => |v| Value::Bool(v);
    u8 => |v| Value::Integer(i64::from(v));
    u16 => |v| Value::Integer(i64::from(v));
    u32 => |v| Value::Integer(i64::from(v));
    i8 => |v| Value::Integer(i64::from(v));
    i16 => |v| Value::Integer(i64::from(v));
    i32 => |v| Value::Integer(i64::from(v));
    i64 => |v| Value::Integer(v);
    f32 => |v| Value::Float(f64::from(v));
    f64 => |v| Value::Float(v);
    char => |v| Value::String(String::from(v));
    String => |v| Value::String(v);
    &str => |v| Value::String(String::from(v));
    Cow<'_, str> => |v| Value::String(v.into_owned());
    Lambda => |v| Value::Lambda(v);
    Attrs => |v| Value::Map(v.into_iter().collect());
}

impl<V> From<Vec<V>> for Value
where
    V: Into<Value>,
{
    fn from(list: Vec<V>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<V, const N: usize> From<[V; N]> for Value
where
    V: Into<Value>,
{
    fn from(list: [V; N]) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> From<HashMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: HashMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: [(K, V); N]) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl<V> FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
