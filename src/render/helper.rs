use crate::compile;
use crate::fmt::Formatter;
use crate::render::core::{RendererImpl, Scope};
use crate::render::stack::{Frame, Stack};
use crate::types::pragma::Pragmas;
use crate::types::syntax::Delimiters;
use crate::{Result, Value};

/// Renders template text from inside a section lambda.
///
/// A helper is passed to every section lambda. Text rendered using the helper
/// is compiled with the delimiters and pragmas that were active at the section
/// tag and rendered against the context the section was rendered in.
///
/// # Examples
///
/// ```
/// use whisker::{Engine, Pragma, Value};
///
/// let mut engine = Engine::new();
/// engine.enable_pragma(Pragma::Attributes);
///
/// let wrap = Value::section_lambda(|text, helper, attrs| {
///     helper.render_with(text, attrs.clone())
/// });
///
/// let result = engine
///     .compile(r#"{{# wrap tag="p" }}<{{ tag }}>{{ name }}</{{ tag }}>{{/ wrap }}"#)?
///     .render_from(&Value::from([("wrap", wrap), ("name", Value::from("Tater"))]))
///     .to_string()?;
/// assert_eq!(result, "<p>Tater</p>");
/// # Ok::<(), whisker::Error>(())
/// ```
pub struct Helper<'a> {
    renderer: &'a RendererImpl<'a>,
    scope: Scope<'a>,
    stack: &'a Stack<'a>,
    delims: &'a Delimiters,
    pragmas: Pragmas,
}

impl<'a> Helper<'a> {
    pub(crate) fn new(
        renderer: &'a RendererImpl<'a>,
        scope: Scope<'a>,
        stack: &'a Stack<'a>,
        delims: &'a Delimiters,
        pragmas: Pragmas,
    ) -> Self {
        Self {
            renderer,
            scope,
            stack,
            delims,
            pragmas,
        }
    }

    /// Renders the given template text against the current context.
    pub fn render(&self, text: &str) -> Result<String> {
        self.render_impl(text, self.stack)
    }

    /// Renders the given template text with `extra` pushed on top of the
    /// current context.
    pub fn render_with<V>(&self, text: &str, extra: V) -> Result<String>
    where
        V: Into<Value>,
    {
        let extra = extra.into();
        let stack = self.stack.push(Frame::Value(&extra));
        self.render_impl(text, &stack)
    }

    fn render_impl(&self, text: &str, stack: &Stack<'_>) -> Result<String> {
        let template = compile::template(text, self.delims.clone(), self.pragmas)?;
        let scope = Scope {
            template: &template,
            name: self.scope.name,
            depth: self.scope.depth,
            blocks: self.scope.blocks,
        };
        let mut s = String::with_capacity(text.len());
        self.renderer
            .render(&mut Formatter::with_string(&mut s), scope, stack)?;
        Ok(s)
    }
}
