//! The chain of block overrides used to render inheritable templates.
//!
//! Rendering `{{< parent }}` extends the chain with the overrides declared
//! inside the tag before rendering the parent template. When the parent in
//! turn renders a `{{$ block }}` tag, the chain is searched for an override
//! with that name. The override closest to the root of the chain, i.e. the one
//! declared by the most derived template, wins.

use std::collections::BTreeMap;

use crate::types::ast;

pub struct Blocks<'a> {
    /// The template that declared the overrides, their bodies refer to its
    /// source.
    pub template: &'a ast::Template<'a>,

    /// The name of the template that declared the overrides.
    pub name: Option<&'a str>,

    overrides: &'a BTreeMap<String, ast::Block>,

    /// The chain of the template that declared the overrides.
    parent: Option<&'a Blocks<'a>>,
}

impl<'a> Blocks<'a> {
    pub fn new(
        template: &'a ast::Template<'a>,
        name: Option<&'a str>,
        overrides: &'a BTreeMap<String, ast::Block>,
        parent: Option<&'a Blocks<'a>>,
    ) -> Self {
        Self {
            template,
            name,
            overrides,
            parent,
        }
    }

    /// Finds the override for the given block name.
    ///
    /// Returns the block and the link in the chain it was declared in.
    pub fn find(&self, name: &str) -> Option<(&'a ast::Block, &Blocks<'a>)> {
        let mut found = None;
        let mut next = Some(self);
        while let Some(blocks) = next {
            if let Some(block) = blocks.overrides.get(name) {
                found = Some((block, blocks));
            }
            next = blocks.parent;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::borrow::Cow;

    use crate::types::span::Span;

    #[test]
    fn blocks_find_most_derived() {
        let template = ast::Template {
            source: Cow::Borrowed("abc"),
            nodes: Vec::new(),
        };
        let base = overrides(&[("title", 0), ("body", 1)]);
        let derived = overrides(&[("title", 2)]);

        // The most derived template is rendered first so it is the root of
        // the chain.
        let root = Blocks::new(&template, Some("derived"), &derived, None);
        let chain = Blocks::new(&template, Some("base"), &base, Some(&root));

        let (block, from) = chain.find("title").unwrap();
        assert_eq!(block.body.len(), 1);
        assert!(matches!(block.body[0], ast::Node::Text(Span { m: 2, n: 3 })));
        assert_eq!(from.name, Some("derived"));

        let (_, from) = chain.find("body").unwrap();
        assert_eq!(from.name, Some("base"));

        assert!(chain.find("footer").is_none());
    }

    fn overrides(blocks: &[(&str, usize)]) -> BTreeMap<String, ast::Block> {
        blocks
            .iter()
            .map(|&(name, i)| {
                let block = ast::Block {
                    name: ast::Ident {
                        name: name.to_owned(),
                        span: Span::at(0),
                    },
                    attrs: ast::AttrMap::default(),
                    body: vec![ast::Node::Text(Span::from(i..i + 1))],
                };
                (name.to_owned(), block)
            })
            .collect()
    }
}
