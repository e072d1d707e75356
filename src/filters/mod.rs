//! Filters transform an interpolated value before it is escaped and emitted.
//!
//! Filters are only available in templates that enable the `FILTERS` pragma.
//! They are chained using a pipe and applied from left to right.
//!
//! ```text
//! {{% FILTERS }}
//! {{ user.name | trim | upper }}
//! ```
//!
//! A filter is any function or closure taking a single argument that
//! implements [`FilterArg`] and returning a type implementing
//! [`FilterReturn`].

mod args;

use crate::{Error, Result, Value};

pub(crate) type FilterFn = dyn Fn(Value) -> Result<Value> + Send + Sync + 'static;

/// Boxes a filter function, converting its argument and return value.
pub(crate) fn new<F, V, R>(f: F) -> Box<FilterFn>
where
    F: Fn(V) -> R + Send + Sync + 'static,
    V: FilterArg,
    R: FilterReturn,
{
    Box::new(move |value: Value| -> Result<Value> {
        let human = value.human();
        let arg = V::from_value(value).ok_or_else(|| {
            Error::from(format!(
                "filter expected {} value, found {}",
                V::human(),
                human
            ))
        })?;
        f(arg).to_value()
    })
}

/// A type that can be the argument of a filter function.
///
/// Implemented for the following types:
/// - [`bool`]
/// - [`i64`]
/// - [`f64`]
/// - [`String`]
/// - [`Vec<Value>`]
/// - [`BTreeMap<String, Value>`][std::collections::BTreeMap]
/// - [`Value`], which accepts anything
pub trait FilterArg: Sized {
    #[doc(hidden)]
    fn from_value(v: Value) -> Option<Self>;

    #[doc(hidden)]
    fn human() -> &'static str;
}

/// A type that can be returned from a filter function or a lambda.
///
/// Implemented for the following types:
/// - `R` where `R` implements `Into<Value>`
/// - `Option<R>` where `R` implements `Into<Value>`, `None` becomes
///   [`Value::None`]
/// - `Result<R>` where `R` implements `Into<Value>`
pub trait FilterReturn {
    #[doc(hidden)]
    fn to_value(self) -> Result<Value>;
}

impl<T> FilterReturn for T
where
    T: Into<Value>,
{
    fn to_value(self) -> Result<Value> {
        Ok(self.into())
    }
}

impl<T> FilterReturn for Result<T>
where
    T: Into<Value>,
{
    fn to_value(self) -> Result<Value> {
        self.map(Into::into)
    }
}
