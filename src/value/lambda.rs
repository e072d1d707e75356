//! Callables that can be placed in the render data.
//!
//! There are two call shapes, one for each kind of tag that can resolve to a
//! callable:
//!
//! - Variable tags, `{{ name attr="x" }}`, invoke the callable with the tag's
//!   attributes and render whatever it returns.
//! - Section tags, `{{# name attr="x" }}...{{/ name }}`, invoke the callable
//!   with the verbatim section source, a [`Helper`] and the tag's attributes
//!   and splice the returned string into the output as is.
//!
//! Methods of an [`Object`] use the variable shape.

use std::fmt;
use std::sync::Arc;

use crate::filters::FilterReturn;
use crate::render::Helper;
use crate::value::Attrs;
use crate::{Error, Result, Value};

type VariableFn = dyn Fn(&Attrs) -> Result<Value> + Send + Sync + 'static;

type SectionFn = dyn Fn(&str, &Helper<'_>, &Attrs) -> Result<String> + Send + Sync + 'static;

/// A callable value.
///
/// Lambdas are constructed using [`Lambda::variable`] and [`Lambda::section`]
/// or the shorthand [`Value::lambda`] and [`Value::section_lambda`].
#[derive(Clone)]
pub struct Lambda {
    imp: Imp,
}

#[derive(Clone)]
enum Imp {
    Variable(Arc<VariableFn>),
    Section(Arc<SectionFn>),
    Method { object: Arc<dyn Object>, name: String },
}

/// A host object that exposes properties and methods to templates.
///
/// When a name is looked up on an object, [`get`][Object::get] is consulted
/// first, then [`has_method`][Object::has_method]. A method is bound to the
/// object and is invoked like a variable lambda, receiving the tag's
/// attributes.
///
/// # Examples
///
/// ```
/// use whisker::{Attrs, Engine, Object, Pragma, Result, Value};
///
/// #[derive(Debug)]
/// struct Greeter;
///
/// impl Object for Greeter {
///     fn has_method(&self, name: &str) -> bool {
///         name == "greet"
///     }
///
///     fn call(&self, _name: &str, attrs: &Attrs) -> Result<Value> {
///         Ok(format!("Hello {}!", attrs.get_str("who").unwrap_or("World")).into())
///     }
/// }
///
/// let mut engine = Engine::new();
/// engine.enable_pragma(Pragma::Attributes);
/// let result = engine
///     .compile(r#"{{ greet who="John" }}"#)?
///     .render_from(&Value::object(Greeter))
///     .to_string()?;
/// assert_eq!(result, "Hello John!");
/// # Ok::<(), whisker::Error>(())
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// Returns the value of a property.
    fn get(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Returns whether the object has a method with the given name.
    fn has_method(&self, name: &str) -> bool {
        let _ = name;
        false
    }

    /// Invokes a method with the attributes of the tag it was resolved from.
    fn call(&self, name: &str, attrs: &Attrs) -> Result<Value> {
        let _ = attrs;
        Err(Error::invalid_call(format!("object has no method `{name}`")))
    }
}

impl Lambda {
    /// Constructs a lambda that can be used in variable tags.
    ///
    /// The return type can be anything that converts into a [`Value`], an
    /// `Option` of it or a `Result` of it.
    pub fn variable<F, R>(f: F) -> Self
    where
        F: Fn(&Attrs) -> R + Send + Sync + 'static,
        R: FilterReturn,
    {
        let f = move |attrs: &Attrs| f(attrs).to_value();
        Self {
            imp: Imp::Variable(Arc::new(f)),
        }
    }

    /// Constructs a lambda that can be used in section tags.
    ///
    /// The function receives the unrendered source between the section tags,
    /// a [`Helper`] that can render template text against the current
    /// context, and the attributes of the section tag. The returned string is
    /// emitted verbatim, use [`Helper::render_with`] to get templated output.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker::{Engine, Value};
    ///
    /// let bold = Value::section_lambda(|text, helper, _attrs| {
    ///     Ok(format!("<b>{}</b>", helper.render(text)?))
    /// });
    ///
    /// let result = Engine::new()
    ///     .compile("{{# bold }}Hi {{ name }}.{{/ bold }}")?
    ///     .render_from(&Value::from([("bold", bold), ("name", Value::from("Tater"))]))
    ///     .to_string()?;
    /// assert_eq!(result, "<b>Hi Tater.</b>");
    /// # Ok::<(), whisker::Error>(())
    /// ```
    pub fn section<F>(f: F) -> Self
    where
        F: Fn(&str, &Helper<'_>, &Attrs) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            imp: Imp::Section(Arc::new(f)),
        }
    }

    /// Invokes the lambda from a variable tag.
    pub(crate) fn call_variable(&self, attrs: &Attrs) -> Result<Value> {
        match &self.imp {
            Imp::Variable(f) => f(attrs),
            Imp::Method { object, name } => object.call(name, attrs),
            Imp::Section(_) => Err(Error::invalid_call(
                "section lambda cannot be invoked from a variable tag",
            )),
        }
    }

    /// Invokes the lambda from a section tag.
    pub(crate) fn call_section(
        &self,
        text: &str,
        helper: &Helper<'_>,
        attrs: &Attrs,
    ) -> Result<String> {
        match &self.imp {
            Imp::Section(f) => f(text, helper, attrs),
            Imp::Variable(_) => Err(Error::invalid_call(
                "variable lambda cannot be invoked from a section tag",
            )),
            Imp::Method { name, .. } => Err(Error::invalid_call(format!(
                "method `{name}` cannot be invoked from a section tag"
            ))),
        }
    }
}

/// Looks up a property or method on an object.
pub(crate) fn lookup(object: &Arc<dyn Object>, name: &str) -> Option<Value> {
    object.get(name).or_else(|| {
        object.has_method(name).then(|| {
            Value::Lambda(Lambda {
                imp: Imp::Method {
                    object: Arc::clone(object),
                    name: name.to_owned(),
                },
            })
        })
    })
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        match (&self.imp, &other.imp) {
            (Imp::Variable(s), Imp::Variable(o)) => Arc::ptr_eq(s, o),
            (Imp::Section(s), Imp::Section(o)) => Arc::ptr_eq(s, o),
            (
                Imp::Method { object, name },
                Imp::Method {
                    object: o_object,
                    name: o_name,
                },
            ) => Arc::ptr_eq(object, o_object) && name == o_name,
            _ => false,
        }
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.imp {
            Imp::Variable(_) => f.write_str("Lambda::Variable(..)"),
            Imp::Section(_) => f.write_str("Lambda::Section(..)"),
            Imp::Method { object, name } => f
                .debug_struct("Lambda::Method")
                .field("object", object)
                .field("name", name)
                .finish(),
        }
    }
}
