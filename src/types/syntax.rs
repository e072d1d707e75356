/// The template syntax configuration.
///
/// Mustache templates can change their own delimiters at any point using a
/// `{{=<% %>=}}` tag, this configuration only sets the delimiters that every
/// template *starts* with.
///
/// Use [`Syntax::default()`] to get the default syntax configuration and
/// [`Syntax::builder()`] to create a custom syntax configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub(crate) delims: Delimiters,
}

/// A builder for the syntax configuration.
///
/// This struct is typically created using [`Syntax::builder()`].
#[derive(Debug, Clone)]
pub struct SyntaxBuilder<'a> {
    tags: Option<(&'a str, &'a str)>,
}

/// A pair of open and close tag delimiters, e.g. `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Default for Syntax {
    /// Returns the default syntax configuration.
    ///
    /// This is equivalent to the following.
    /// ```
    /// use whisker::Syntax;
    ///
    /// let syntax = Syntax::builder().tags("{{", "}}").build();
    /// assert_eq!(syntax, Syntax::default());
    /// ```
    #[inline]
    fn default() -> Self {
        Syntax::builder().tags("{{", "}}").build()
    }
}

impl Syntax {
    /// Create a new syntax builder.
    ///
    /// # Examples
    ///
    /// ```
    /// let syntax = whisker::Syntax::builder().tags("<%", "%>").build();
    /// ```
    #[inline]
    pub fn builder<'a>() -> SyntaxBuilder<'a> {
        SyntaxBuilder::new()
    }
}

impl<'a> SyntaxBuilder<'a> {
    /// Creates a new syntax builder.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { tags: None }
    }

    /// Set the initial tag delimiters.
    ///
    /// # Panics
    ///
    /// If either of the strings are empty or contain whitespace or an `=`
    /// character, since such delimiters could never be restored using a
    /// delimiter change tag.
    #[inline]
    pub fn tags(&mut self, open: &'a str, close: &'a str) -> &mut Self {
        assert!(Delimiters::is_valid(open) && Delimiters::is_valid(close));
        self.tags = Some((open, close));
        self
    }

    /// Builds the syntax configuration.
    ///
    /// Falls back to `{{` and `}}` if no delimiters were set.
    #[inline]
    pub fn build(&self) -> Syntax {
        let (open, close) = self.tags.unwrap_or(("{{", "}}"));
        Syntax {
            delims: Delimiters::new(open, close),
        }
    }
}

impl Delimiters {
    pub(crate) fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_owned(),
            close: close.to_owned(),
        }
    }

    pub(crate) fn is_valid(delim: &str) -> bool {
        !delim.is_empty() && !delim.contains(|c: char| c.is_whitespace() || c == '=')
    }
}
