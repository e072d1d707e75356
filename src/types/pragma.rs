//! Pragmas are opt-in flags that enable extended tag grammar for the remainder
//! of a template, e.g. `{{% FILTERS }}`.

use std::fmt;

/// A syntax extension that can be enabled using a `{{% NAME }}` tag or for
/// every template using [`Engine::enable_pragma`][crate::Engine::enable_pragma].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pragma {
    /// `{{% FILTERS }}`: pipe values through filters, `{{ name | upper }}`.
    Filters,
    /// `{{% BLOCKS }}`: template inheritance using `{{< parent }}` and
    /// `{{$ block }}` tags.
    Blocks,
    /// `{{% ATTRIBUTES }}`: attach attributes to tags, `{{# item id="1" }}`.
    Attributes,
    /// `{{% ANCHORED-DOT }}`: a path starting with `.` only looks at the
    /// current context frame, `{{ .name }}`.
    AnchoredDot,
}

/// The set of enabled pragmas.
///
/// Pragmas can only ever be added to a set, once enabled they stay enabled for
/// the rest of the template.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Pragmas {
    bits: u8,
}

impl Pragma {
    /// Parses a pragma name as it appears in a `{{% NAME }}` tag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FILTERS" => Some(Self::Filters),
            "BLOCKS" => Some(Self::Blocks),
            "ATTRIBUTES" => Some(Self::Attributes),
            "ANCHORED-DOT" => Some(Self::AnchoredDot),
            _ => None,
        }
    }

    /// Returns the name of the pragma as it appears in a template.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Filters => "FILTERS",
            Self::Blocks => "BLOCKS",
            Self::Attributes => "ATTRIBUTES",
            Self::AnchoredDot => "ANCHORED-DOT",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Filters => 1 << 0,
            Self::Blocks => 1 << 1,
            Self::Attributes => 1 << 2,
            Self::AnchoredDot => 1 << 3,
        }
    }
}

impl fmt::Display for Pragma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Pragmas {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn enable(&mut self, pragma: Pragma) {
        self.bits |= pragma.bit();
    }

    pub const fn contains(&self, pragma: Pragma) -> bool {
        self.bits & pragma.bit() != 0
    }

    fn iter(&self) -> impl Iterator<Item = Pragma> + '_ {
        [
            Pragma::Filters,
            Pragma::Blocks,
            Pragma::Attributes,
            Pragma::AnchoredDot,
        ]
        .into_iter()
        .filter(|p| self.contains(*p))
    }
}

impl fmt::Debug for Pragmas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragmas_monotonic() {
        let mut pragmas = Pragmas::new();
        assert!(!pragmas.contains(Pragma::Filters));
        pragmas.enable(Pragma::Filters);
        pragmas.enable(Pragma::Filters);
        pragmas.enable(Pragma::Blocks);
        assert!(pragmas.contains(Pragma::Filters));
        assert!(pragmas.contains(Pragma::Blocks));
        assert!(!pragmas.contains(Pragma::Attributes));
        assert_eq!(format!("{pragmas:?}"), "{Filters, Blocks}");
    }

    #[test]
    fn pragma_names() {
        for p in [
            Pragma::Filters,
            Pragma::Blocks,
            Pragma::Attributes,
            Pragma::AnchoredDot,
        ] {
            assert_eq!(Pragma::from_name(p.name()), Some(p));
        }
        assert_eq!(Pragma::from_name("UNKNOWN"), None);
    }
}
