use std::fmt::Write;

use tracing::trace;

use crate::compile;
use crate::filters::FilterFn;
use crate::fmt::{self, Formatter};
use crate::render::blocks::Blocks;
use crate::render::stack::{Frame, Stack};
use crate::render::{Helper, PartialFn};
use crate::types::ast;
use crate::value::{Attrs, ValueCow};
use crate::{Engine, Error, Result, Value};

/// Walks a node tree and writes the output to a formatter.
pub(crate) struct RendererImpl<'render> {
    pub(crate) engine: &'render Engine<'render>,
    pub(crate) partial_fn: Option<&'render PartialFn<'render>>,
    pub(crate) max_partial_depth: usize,
}

/// The template currently being rendered.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub(crate) template: &'a ast::Template<'a>,
    /// The name of the template, attached to errors.
    pub(crate) name: Option<&'a str>,
    /// The number of partials entered to get to this template.
    pub(crate) depth: usize,
    /// The block overrides in effect.
    pub(crate) blocks: Option<&'a Blocks<'a>>,
}

/// A partial template, either stored in the engine or loaded on demand.
enum Partial<'a> {
    Borrowed(&'a ast::Template<'a>),
    Owned(ast::Template<'static>),
}

impl<'render> RendererImpl<'render> {
    /// Renders a whole template.
    pub(crate) fn render(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
    ) -> Result<()> {
        self.render_nodes(f, scope, stack, &scope.template.nodes)
            .map_err(|err| match scope.name {
                Some(name) => err.with_template_name(name),
                None => err,
            })
    }

    fn render_nodes(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        nodes: &[ast::Node],
    ) -> Result<()> {
        let source = &scope.template.source;
        for node in nodes {
            match node {
                ast::Node::Text(span) => {
                    // We don't need to enrich this error because it can only
                    // fail because of an IO error.
                    f.write_str(&source[*span])?;
                }
                ast::Node::Variable(var) => self.render_variable(f, scope, stack, var)?,
                ast::Node::Section(section) => self.render_section(f, scope, stack, section)?,
                ast::Node::Partial(partial) => self.render_partial(f, scope, stack, partial)?,
                ast::Node::Block(block) => self.render_block(f, scope, stack, block)?,
                ast::Node::Parent(parent) => self.render_parent(f, scope, stack, parent)?,
            }
        }
        Ok(())
    }

    /// Renders `{{ name }}`.
    ///
    /// A name that is not found renders nothing. A lambda is invoked with the
    /// tag's attributes and its return value is rendered in its place.
    fn render_variable(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        var: &ast::Variable,
    ) -> Result<()> {
        let source = &scope.template.source;
        let filters = self.get_filters(source, &var.filters)?;

        let mut value = match stack.resolve(&var.path) {
            Some(value) => value,
            None => return Ok(()),
        };

        if let Value::Lambda(lambda) = &*value {
            let attrs = resolve_attrs(stack, &var.attrs);
            let result = lambda
                .call_variable(&attrs)
                .map_err(|err| err.enrich(source, var.path.span))?;
            value = ValueCow::Owned(result);
        }

        let value = self.apply_filters(source, value, &filters)?;

        let text = fmt::to_text(&value).ok_or_else(|| {
            Error::render(
                format!("unrenderable {} value", value.human()),
                source,
                var.path.span,
            )
        })?;

        if var.escaped {
            f.write_str(&(self.engine.escape)(&text))?;
        } else {
            f.write_str(&text)?;
        }
        Ok(())
    }

    /// Renders `{{# name }} ... {{/ name }}` and `{{^ name }} ... {{/ name }}`.
    fn render_section(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        section: &ast::Section,
    ) -> Result<()> {
        let source = &scope.template.source;
        let filters = self.get_filters(source, &section.filters)?;

        let value = match stack.resolve(&section.path) {
            Some(value) => Some(self.apply_filters(source, value, &filters)?),
            None => None,
        };

        // Attributes are resolved before any frame for the section is pushed.
        let attrs = resolve_attrs(stack, &section.attrs);

        if section.inverted {
            if !value.as_deref().map_or(false, Value::is_truthy) {
                let stack = stack.push_attrs(&attrs);
                self.render_nodes(f, scope, &stack, &section.body)?;
            }
            return Ok(());
        }

        let value = match value {
            Some(value) if value.is_truthy() => value,
            _ => return Ok(()),
        };

        match &*value {
            Value::Lambda(lambda) => {
                let text = &source[section.inner];
                let helper = Helper::new(self, scope, stack, &section.delims, section.pragmas);
                let result = lambda
                    .call_section(text, &helper, &attrs)
                    .map_err(|err| err.enrich(source, section.path.span))?;
                f.write_str(&result)?;
            }
            Value::Bool(_) => {
                let stack = stack.push_attrs(&attrs);
                self.render_nodes(f, scope, &stack, &section.body)?;
            }
            Value::List(list) => {
                let stack = stack.push_attrs(&attrs);
                for item in list {
                    let stack = stack.push(Frame::Value(item));
                    self.render_nodes(f, scope, &stack, &section.body)?;
                }
            }
            value => {
                let stack = stack.push_attrs(&attrs);
                let stack = stack.push(Frame::Value(value));
                self.render_nodes(f, scope, &stack, &section.body)?;
            }
        }
        Ok(())
    }

    /// Renders `{{> name }}`.
    fn render_partial(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        partial: &ast::Partial,
    ) -> Result<()> {
        let source = &scope.template.source;
        let depth = self.enter_partial(scope, &partial.name)?;
        let template = self.get_partial(source, &partial.name)?;
        let template = match partial.indent {
            Some(indent) => Partial::Owned(self.indent_partial(
                template.as_ref(),
                &source[indent],
                &partial.name,
            )?),
            None => template,
        };

        let attrs = resolve_attrs(stack, &partial.attrs);
        let stack = stack.push_attrs(&attrs);

        let inner = Scope {
            template: template.as_ref(),
            name: Some(&partial.name.name),
            depth,
            blocks: None,
        };
        self.render(f, inner, &stack)
    }

    /// Renders `{{< name }} ... {{/ name }}`.
    ///
    /// The parent template is rendered like a partial, with the overrides
    /// declared inside the tag added to the block chain.
    fn render_parent(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        parent: &ast::Parent,
    ) -> Result<()> {
        let source = &scope.template.source;
        let depth = self.enter_partial(scope, &parent.name)?;
        let template = self.get_partial(source, &parent.name)?;

        let attrs = resolve_attrs(stack, &parent.attrs);
        let stack = stack.push_attrs(&attrs);

        let blocks = Blocks::new(scope.template, scope.name, &parent.overrides, scope.blocks);
        let inner = Scope {
            template: template.as_ref(),
            name: Some(&parent.name.name),
            depth,
            blocks: Some(&blocks),
        };
        self.render(f, inner, &stack)
    }

    /// Renders `{{$ name }} ... {{/ name }}`.
    ///
    /// Renders the most derived override if there is one, otherwise the
    /// default content.
    fn render_block(
        &self,
        f: &mut Formatter<'_>,
        scope: Scope<'_>,
        stack: &Stack<'_>,
        block: &ast::Block,
    ) -> Result<()> {
        match scope.blocks.and_then(|blocks| blocks.find(&block.name.name)) {
            Some((found, from)) => {
                trace!(name = %block.name.name, "rendering block override");
                let attrs = resolve_attrs(stack, &found.attrs);
                let stack = stack.push_attrs(&attrs);
                let inner = Scope {
                    template: from.template,
                    name: from.name,
                    depth: scope.depth,
                    blocks: scope.blocks,
                };
                self.render_nodes(f, inner, &stack, &found.body)
                    .map_err(|err| match from.name {
                        Some(name) => err.with_template_name(name),
                        None => err,
                    })
            }
            None => {
                let attrs = resolve_attrs(stack, &block.attrs);
                let stack = stack.push_attrs(&attrs);
                self.render_nodes(f, scope, &stack, &block.body)
            }
        }
    }

    /// Looks up the filters of a tag.
    ///
    /// Every filter must be registered, whether or not the tag's value is
    /// found.
    fn get_filters<'a>(
        &self,
        source: &str,
        filters: &'a [ast::Ident],
    ) -> Result<Vec<(&'a ast::Ident, &'render FilterFn)>> {
        filters
            .iter()
            .map(|filter| {
                let filter_fn = self
                    .engine
                    .filters
                    .get(filter.name.as_str())
                    .ok_or_else(|| Error::filter_not_found(&filter.name, source, filter.span))?;
                Ok((filter, &**filter_fn))
            })
            .collect()
    }

    /// Applies filters to a value from left to right.
    fn apply_filters<'a>(
        &self,
        source: &str,
        value: ValueCow<'a>,
        filters: &[(&ast::Ident, &FilterFn)],
    ) -> Result<ValueCow<'a>> {
        if filters.is_empty() {
            return Ok(value);
        }
        let mut value = value.into_owned();
        for &(filter, filter_fn) in filters {
            value = filter_fn(value).map_err(|err| err.enrich(source, filter.span))?;
        }
        Ok(ValueCow::Owned(value))
    }

    /// Compiles a copy of a partial with every line prefixed by the leading
    /// whitespace of its standalone tag.
    ///
    /// Only the partial's own lines are indented, interpolated values are
    /// left alone.
    fn indent_partial(
        &self,
        template: &ast::Template<'_>,
        indent: &str,
        name: &ast::Ident,
    ) -> Result<ast::Template<'static>> {
        trace!(name = %name.name, "indenting partial");
        let source = fmt::indent_lines(&template.source, indent);
        compile::template(source, self.engine.syntax.delims.clone(), self.engine.pragmas)
            .map_err(|err| err.with_template_name(&name.name))
    }

    /// Checks the partial depth and returns the depth of the partial.
    fn enter_partial(&self, scope: Scope<'_>, name: &ast::Ident) -> Result<usize> {
        if scope.depth >= self.max_partial_depth {
            return Err(Error::max_partial_depth(self.max_partial_depth)
                .enrich(&scope.template.source, name.span));
        }
        Ok(scope.depth + 1)
    }

    /// Looks up a partial using the partial function and then the engine.
    fn get_partial(&self, source: &str, name: &ast::Ident) -> Result<Partial<'render>> {
        if let Some(partial_fn) = self.partial_fn {
            if let Some(text) = partial_fn(&name.name) {
                trace!(name = %name.name, "compiling partial from function");
                let template = compile::template(
                    text,
                    self.engine.syntax.delims.clone(),
                    self.engine.pragmas,
                )
                .map_err(|err| err.with_template_name(&name.name))?;
                return Ok(Partial::Owned(template));
            }
        }
        match self.engine.templates.get(name.name.as_str()) {
            Some(template) => {
                trace!(name = %name.name, "found partial in engine");
                Ok(Partial::Borrowed(template))
            }
            None => Err(Error::partial_not_found(&name.name, source, name.span)),
        }
    }
}

impl<'a> Partial<'a> {
    fn as_ref(&self) -> &ast::Template<'_> {
        match self {
            Self::Borrowed(template) => template,
            Self::Owned(template) => template,
        }
    }
}

/// Resolves the attributes of a tag against the stack.
///
/// Variable attributes that are not found resolve to [`Value::None`].
pub(crate) fn resolve_attrs(stack: &Stack<'_>, attrs: &ast::AttrMap) -> Attrs {
    attrs
        .entries
        .iter()
        .map(|(key, value)| {
            let value = match value {
                ast::AttrValue::Literal(s) => Value::String(s.clone()),
                ast::AttrValue::Var(path) => stack
                    .resolve(path)
                    .map(ValueCow::into_owned)
                    .unwrap_or_default(),
            };
            (key.name.as_str(), value)
        })
        .collect()
}
