#![allow(clippy::wrong_self_convention)]

mod blocks;
mod core;
mod helper;
mod stack;

use std::io;

use tracing::debug;

use crate::fmt::{Formatter, Writer};
use crate::render::core::{RendererImpl, Scope};
pub use crate::render::helper::Helper;
use crate::render::stack::Stack;
use crate::types::ast;
use crate::value::ValueCow;
use crate::{Engine, Error, Result, Value};

/// A function that returns the source of a partial by name.
pub(crate) type PartialFn<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// A renderer that interprets a compiled [`Template`][crate::Template].
///
/// This struct is created by one of the following functions:
/// - [`Template{,Ref}::render`][crate::Template::render]
/// - [`Template{,Ref}::render_from`][crate::Template::render_from]
#[must_use = "must call `.to_string()` or `.to_writer(..)` on the renderer"]
pub struct Renderer<'render> {
    engine: &'render Engine<'render>,
    template: &'render ast::Template<'render>,
    template_name: Option<&'render str>,
    globals: Globals<'render>,
    partial_fn: Option<Box<PartialFn<'render>>>,
    max_partial_depth: Option<usize>,
}

enum Globals<'render> {
    Owned(Result<Value>),
    Borrowed(&'render Value),
}

impl<'render> Renderer<'render> {
    fn new(
        engine: &'render Engine<'render>,
        template: &'render ast::Template<'render>,
        template_name: Option<&'render str>,
        globals: Globals<'render>,
    ) -> Self {
        Self {
            engine,
            template,
            template_name,
            globals,
            partial_fn: None,
            max_partial_depth: None,
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn with_serde<S>(
        engine: &'render Engine<'render>,
        template: &'render ast::Template<'render>,
        template_name: Option<&'render str>,
        globals: S,
    ) -> Self
    where
        S: ::serde::Serialize,
    {
        let globals = Globals::Owned(crate::to_value(globals));
        Self::new(engine, template, template_name, globals)
    }

    pub(crate) fn with_value(
        engine: &'render Engine<'render>,
        template: &'render ast::Template<'render>,
        template_name: Option<&'render str>,
        globals: &'render Value,
    ) -> Self {
        Self::new(engine, template, template_name, Globals::Borrowed(globals))
    }

    /// Set a function that is called to fetch partial templates.
    ///
    /// The function receives the partial name and returns the partial source.
    /// The returned source is compiled with the engine's syntax and pragmas.
    /// If the function returns `None` the partial is looked up in the
    /// engine.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker::{Engine, Value};
    ///
    /// let engine = Engine::new();
    /// let data = Value::from([("name", "John")]);
    /// let result = engine
    ///     .compile("{{> greeting }}")?
    ///     .render_from(&data)
    ///     .with_partial_fn(|name| (name == "greeting").then(|| "Hello {{ name }}!".to_owned()))
    ///     .to_string()?;
    /// assert_eq!(result, "Hello John!");
    /// # Ok::<(), whisker::Error>(())
    /// ```
    pub fn with_partial_fn<F>(mut self, partial_fn: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'render,
    {
        self.partial_fn = Some(Box::new(partial_fn));
        self
    }

    /// Set the maximum number of nested partials.
    ///
    /// This is the maximum number of nested `{{> partial }}` and
    /// `{{< parent }}` tags that are allowed during rendering, as counted from
    /// the root template.
    ///
    /// Defaults to the engine setting.
    pub fn with_max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = Some(depth);
        self
    }

    /// Render the template to a string.
    pub fn to_string(self) -> Result<String> {
        let mut s = String::with_capacity(self.template.source.len());
        let mut f = Formatter::with_string(&mut s);
        self.render(&mut f)?;
        Ok(s)
    }

    /// Render the template to the given writer.
    pub fn to_writer<W>(self, w: W) -> Result<()>
    where
        W: io::Write,
    {
        let mut w = Writer::new(w);
        let mut f = Formatter::with_writer(&mut w);
        self.render(&mut f)
            .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
    }

    fn render(self, f: &mut Formatter<'_>) -> Result<()> {
        let globals = match self.globals {
            Globals::Owned(result) => ValueCow::Owned(result?),
            Globals::Borrowed(value) => ValueCow::Borrowed(value),
        };
        debug!(
            name = self.template_name,
            len = self.template.source.len(),
            "rendering template"
        );
        let renderer = RendererImpl {
            engine: self.engine,
            partial_fn: self.partial_fn.as_deref(),
            max_partial_depth: self
                .max_partial_depth
                .unwrap_or(self.engine.max_partial_depth),
        };
        let scope = Scope {
            template: self.template,
            name: self.template_name,
            depth: 0,
            blocks: None,
        };
        renderer.render(f, scope, &Stack::new(&globals))
    }
}
