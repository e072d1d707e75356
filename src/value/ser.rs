use serde::Serialize;
use serde_json::Value as Json;

use crate::{Error, Result, Value};

/// Convert a `T` to a `Value`.
///
/// The data is serialized through [`serde_json`], so anything that can be
/// represented as JSON can be rendered. Integers that do not fit in an `i64`
/// are converted to floats.
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub fn to_value<T>(value: T) -> Result<Value>
where
    T: Serialize,
{
    serde_json::to_value(value)
        .map(Value::from)
        .map_err(Error::serialize)
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::None, Value::Float),
            },
            Json::String(s) => Value::String(s),
            Json::Array(list) => Value::List(list.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct User {
        name: &'static str,
        age: u64,
        tags: Vec<&'static str>,
        manager: Option<Box<User>>,
    }

    #[test]
    fn to_value_struct() {
        let user = User {
            name: "John",
            age: 42,
            tags: vec!["a", "b"],
            manager: None,
        };
        let value = to_value(&user).unwrap();
        assert_eq!(
            value,
            Value::from([
                ("name", Value::from("John")),
                ("age", Value::from(42)),
                ("tags", Value::from(["a", "b"])),
                ("manager", Value::None),
            ])
        );
    }

    #[test]
    fn to_value_large_integer() {
        assert_eq!(to_value(u64::MAX).unwrap(), Value::Float(u64::MAX as f64));
    }
}
