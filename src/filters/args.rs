use std::collections::BTreeMap;

use crate::filters::FilterArg;
use crate::Value;

impl FilterArg for Value {
    fn from_value(v: Value) -> Option<Self> {
        Some(v)
    }

    fn human() -> &'static str {
        "any"
    }
}

macro_rules! impl_filter_arg {
    ($($ty:ty => $human:literal, $variant:ident;)+) => {
        $(
            impl FilterArg for $ty {
                fn from_value(v: Value) -> Option<Self> {
                    match v {
                        Value::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn human() -> &'static str {
                    $human
                }
            }
        )+
    };
}

impl_filter_arg! {
    bool => "bool", Bool;
    i64 => "integer", Integer;
    f64 => "float", Float;
    String => "string", String;
    Vec<Value> => "list", List;
    BTreeMap<String, Value> => "map", Map;
}

#[cfg(test)]
mod tests {
    use crate::filters;
    use crate::Value;

    #[test]
    fn filter_arg_type_mismatch() {
        let f = filters::new(|s: String| s.to_uppercase());
        assert_eq!(f(Value::from("abc")).unwrap(), Value::from("ABC"));
        let err = f(Value::from(1)).unwrap_err();
        assert_eq!(err.to_string(), "filter expected string value, found integer");
    }

    #[test]
    fn filter_arg_any_value() {
        let f = filters::new(|v: Value| v.is_truthy());
        assert_eq!(f(Value::from("")).unwrap(), Value::Bool(false));
    }
}
