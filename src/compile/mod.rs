//! Compiles template source into a node tree.
//!
//! Compilation happens in three stages, each pulling tokens from the previous
//! one on demand:
//!
//! - [`Lexer`][lex::Lexer]: splits the source into text and tags, applying
//!   delimiter changes as they are encountered.
//! - [`Standalone`][standalone::Standalone]: drops the surrounding whitespace
//!   of tags that stand alone on a line.
//! - [`Parser`][parse::Parser]: builds the node tree, enforcing pragmas.

mod lex;
mod parse;
mod standalone;

use std::borrow::Cow;

use tracing::debug;

use crate::compile::parse::Parser;
use crate::types::ast;
use crate::types::pragma::Pragmas;
use crate::types::syntax::Delimiters;
use crate::Result;

/// Compile a template into a node tree.
///
/// `delims` and `pragmas` are the delimiters and pragmas in effect at the
/// start of the template.
pub(crate) fn template<'source, S>(
    source: S,
    delims: Delimiters,
    pragmas: Pragmas,
) -> Result<ast::Template<'source>>
where
    S: Into<Cow<'source, str>>,
{
    let source = source.into();
    debug!(len = source.len(), ?pragmas, "compiling template");
    let nodes = Parser::new(&source, delims, pragmas).parse_template()?;
    Ok(ast::Template { source, nodes })
}
