//! A logic-less Mustache template engine with template inheritance, tag
//! attributes and filters.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Variables: `{{ user.name }}`, `{{{ raw }}}` and `{{& raw }}`
//! - Sections: `{{# users }} ... {{/ users }}`
//! - Inverted sections: `{{^ users }} ... {{/ users }}`
//! - Partials: `{{> user }}`
//! - Comments: `{{! comment }}`
//! - Delimiter changes: `{{=<% %>=}}`
//!
//! Extended syntax is opt-in per template using a pragma tag, or for every
//! template using [`Engine::enable_pragma`].
//!
//! - `{{% BLOCKS }}`: template inheritance using `{{< parent }}` and
//!   `{{$ block }}` tags
//! - `{{% ATTRIBUTES }}`: attributes on tags, `{{> card title="Hi" }}`
//! - `{{% FILTERS }}`: filters, `{{ user.name | upper }}`
//! - `{{% ANCHORED-DOT }}`: names anchored to the current context,
//!   `{{ .name }}`
//!
//! ### Engine
//!
//! - Lambdas receiving tag attributes, and section lambdas receiving a
//!   [`Helper`] that can render template text
//! - Host objects exposing properties and methods, see [`Object`]
//! - Render to a [`String`] or any [`std::io::Write`] implementor
//! - Render using any [`serde`] serializable values
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. The engine stores the syntax
//! config, filter functions, the escape function, and compiled partials.
//! Generally, you only need to construct one engine during the lifetime of a
//! program.
//!
//! ```
//! let engine = whisker::Engine::new();
//! ```
//!
//! Next, [`.add_template`][Engine::add_template] is used to compile and store a
//! template in the engine. Stored templates can be used as partials.
//!
//! ```
//! # let mut engine = whisker::Engine::new();
//! engine.add_template("hello", "Hello {{ user.name }}!")?;
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! Finally, the template is rendered by fetching it using
//! [`.get_template`][Engine::get_template] and calling
//! [`.render`][TemplateRef::render].
//!
//! ```
//! # let mut engine = whisker::Engine::new();
//! # engine.add_template("hello", "Hello {{ user.name }}!")?;
//! let template = engine.get_template("hello").unwrap();
//! let result = template
//!     .render(serde_json::json!({ "user": { "name": "John Smith" } }))
//!     .to_string()?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! If the lifetime of the template source is shorter than the engine lifetime
//! or you don't need to store the compiled template then you can also use the
//! [`.compile`][Engine::compile] function to return the template directly.
//!
//! ```
//! # let engine = whisker::Engine::new();
//! let template = engine.compile("Hello {{ user.name }}!")?;
//! let result = template
//!     .render(serde_json::json!({ "user": { "name": "John Smith" } }))
//!     .to_string()?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Render using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { user: User }
//!
//! #[derive(serde::Serialize)]
//! struct User { name: String }
//!
//! let ctx = Context { user: User { name: "John Smith".into() } };
//!
//! let result = whisker::Engine::new()
//!     .compile("Hello {{ user.name }}")?
//!     .render(&ctx)
//!     .to_string()?;
//!
//! assert_eq!(result, "Hello John Smith");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Transform data using filters
//!
//! ```
//! let mut engine = whisker::Engine::new();
//! engine.add_filter("lower", |s: String| s.to_lowercase());
//!
//! let result = engine
//!     .compile("{{% FILTERS }}Hello {{ value | lower }}")?
//!     .render(serde_json::json!({ "value": "WORLD!" }))
//!     .to_string()?;
//!
//! assert_eq!(result, "Hello world!");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Template inheritance
//!
//! ```
//! let mut engine = whisker::Engine::new();
//! engine.enable_pragma(whisker::Pragma::Blocks);
//! engine.add_template("layout", "<h1>{{$ title }}Default{{/ title }}</h1>")?;
//!
//! let result = engine
//!     .compile("{{< layout }}{{$ title }}Hello {{ name }}{{/ title }}{{/ layout }}")?
//!     .render(serde_json::json!({ "name": "John" }))
//!     .to_string()?;
//!
//! assert_eq!(result, "<h1>Hello John</h1>");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Render a template using custom delimiters
//!
//! ```
//! let syntax = whisker::Syntax::builder().tags("<%", "%>").build();
//!
//! let result = whisker::Engine::with_syntax(syntax)
//!     .compile("Hello <% user.name %>")?
//!     .render(serde_json::json!({ "user": { "name": "John Smith" } }))
//!     .to_string()?;
//!
//! assert_eq!(result, "Hello John Smith");
//! # Ok::<(), whisker::Error>(())
//! ```
//!
//! ### Render a template to an `impl io::Write`
//!
//! ```
//! use std::io;
//!
//! let stdout = io::BufWriter::new(io::stdout());
//!
//! whisker::Engine::new()
//!     .compile("Hello {{ user.name }}")?
//!     .render(serde_json::json!({ "user": { "name": "John Smith" } }))
//!     .to_writer(stdout)?;
//! # Ok::<(), whisker::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod compile;
mod error;
mod filters;
mod fmt;
mod render;
mod types;
mod value;

use std::borrow::Cow;
use std::collections::BTreeMap;

pub use crate::error::{Error, ErrorKind};
pub use crate::filters::{FilterArg, FilterReturn};
pub use crate::fmt::escape_html;
pub use crate::render::{Helper, Renderer};
pub use crate::types::pragma::Pragma;
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{Attrs, Lambda, Object, Value};

use crate::filters::FilterFn;
use crate::fmt::EscapeFn;
use crate::types::ast;
use crate::types::pragma::Pragmas;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The compilation and rendering engine.
pub struct Engine<'engine> {
    syntax: Syntax,
    pragmas: Pragmas,
    escape: Box<EscapeFn>,
    filters: BTreeMap<Cow<'engine, str>, Box<FilterFn>>,
    templates: BTreeMap<Cow<'engine, str>, ast::Template<'engine>>,
    max_partial_depth: usize,
}

/// A compiled template.
pub struct Template<'engine, 'source> {
    engine: &'engine Engine<'engine>,
    template: ast::Template<'source>,
}

/// A reference to a compiled template in an [`Engine`].
#[derive(Clone, Copy)]
pub struct TemplateRef<'engine> {
    engine: &'engine Engine<'engine>,
    name: &'engine str,
    template: &'engine ast::Template<'engine>,
}

impl<'engine> Default for Engine<'engine> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'engine> Engine<'engine> {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().tags("<%", "%>").build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    #[inline]
    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            pragmas: Pragmas::new(),
            escape: Box::new(escape_html),
            filters: BTreeMap::new(),
            templates: BTreeMap::new(),
            max_partial_depth: 64,
        }
    }

    /// Enable a pragma for every template compiled by this engine.
    ///
    /// This is equivalent to every template starting with a `{{% NAME }}` tag.
    /// Only affects templates compiled after this call.
    #[inline]
    pub fn enable_pragma(&mut self, pragma: Pragma) {
        self.pragmas.enable(pragma);
    }

    /// Set the function used to escape `{{ name }}` tags.
    ///
    /// Defaults to [`escape_html`].
    ///
    /// # Examples
    ///
    /// ```
    /// let mut engine = whisker::Engine::new();
    /// engine.set_escape(|s| s.replace('"', "\\\""));
    ///
    /// let result = engine
    ///     .compile(r#"msg = "{{ msg }}""#)?
    ///     .render(serde_json::json!({ "msg": r#"<say "hi">"# }))
    ///     .to_string()?;
    /// assert_eq!(result, r#"msg = "<say \"hi\">""#);
    /// # Ok::<(), whisker::Error>(())
    /// ```
    #[inline]
    pub fn set_escape<F>(&mut self, escape: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.escape = Box::new(escape);
    }

    /// Set the maximum number of nested partials.
    ///
    /// Defaults to 64. Can be overridden per render using
    /// [`Renderer::with_max_partial_depth`].
    #[inline]
    pub fn set_max_partial_depth(&mut self, depth: usize) {
        self.max_partial_depth = depth;
    }

    /// Add a new filter to the engine.
    ///
    /// Filters are applied using `{{ name | filter }}` in templates that
    /// enable the `FILTERS` pragma. See [`FilterArg`] and [`FilterReturn`] for
    /// the supported argument and return types.
    #[inline]
    pub fn add_filter<N, F, V, R>(&mut self, name: N, f: F)
    where
        N: Into<Cow<'engine, str>>,
        F: Fn(V) -> R + Send + Sync + 'static,
        V: FilterArg,
        R: FilterReturn,
    {
        self.filters.insert(name.into(), filters::new(f));
    }

    /// Add a template to the engine.
    ///
    /// The template will be compiled and stored under the given name. Stored
    /// templates are available as partials and parents to every template
    /// rendered by this engine.
    ///
    /// When using this function over [`.compile(..)`][Engine::compile] the
    /// template source lifetime needs to be as least as long as the engine
    /// lifetime.
    #[inline]
    pub fn add_template<N, S>(&mut self, name: N, source: S) -> Result<()>
    where
        N: Into<Cow<'engine, str>>,
        S: Into<Cow<'engine, str>>,
    {
        let name = name.into();
        let template = compile::template(source, self.syntax.delims.clone(), self.pragmas)
            .map_err(|err| err.with_template_name(&name))?;
        self.templates.insert(name, template);
        Ok(())
    }

    /// Lookup a template by name.
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<TemplateRef<'_>> {
        self.templates
            .get_key_value(name)
            .map(|(name, template)| TemplateRef {
                engine: self,
                name,
                template,
            })
    }

    /// Compile a template.
    ///
    /// The template will not be stored in the engine. The advantage over
    /// [`.add_template(..)`][Engine::add_template] here is that the lifetime of
    /// the template source does not need to outlive the engine.
    #[inline]
    pub fn compile<'source, S>(&self, source: S) -> Result<Template<'_, 'source>>
    where
        S: Into<Cow<'source, str>>,
    {
        let template = compile::template(source, self.syntax.delims.clone(), self.pragmas)?;
        Ok(Template {
            engine: self,
            template,
        })
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("syntax", &self.syntax)
            .field("pragmas", &self.pragmas)
            .field("filters", &self.filters.keys())
            .field("templates", &self.templates.keys())
            .field("max_partial_depth", &self.max_partial_depth)
            .finish_non_exhaustive()
    }
}

impl<'engine, 'source> Template<'engine, 'source> {
    /// Render the template using the provided serializable value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render<S>(&self, ctx: S) -> Renderer<'_>
    where
        S: ::serde::Serialize,
    {
        Renderer::with_serde(self.engine, &self.template, None, ctx)
    }

    /// Render the template using the provided value.
    #[inline]
    pub fn render_from<'render>(&'render self, ctx: &'render Value) -> Renderer<'render> {
        Renderer::with_value(self.engine, &self.template, None, ctx)
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.template.source
    }
}

impl std::fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<'engine> TemplateRef<'engine> {
    /// Render the template using the provided serializable value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render<S>(&self, ctx: S) -> Renderer<'engine>
    where
        S: ::serde::Serialize,
    {
        Renderer::with_serde(self.engine, self.template, Some(self.name), ctx)
    }

    /// Render the template using the provided value.
    #[inline]
    pub fn render_from<'render>(&self, ctx: &'render Value) -> Renderer<'render>
    where
        'engine: 'render,
    {
        Renderer::with_value(self.engine, self.template, Some(self.name), ctx)
    }

    /// Returns the name of the template.
    #[inline]
    pub fn name(&self) -> &'engine str {
        self.name
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &'engine str {
        &self.template.source
    }
}

impl std::fmt::Debug for TemplateRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
