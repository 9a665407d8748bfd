//! Extension selection and rendering options.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ExtraError;

/// An extended block construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Construct {
    /// Pipe tables.
    Tables,
    /// Triple-backtick fenced code blocks.
    FencedCode,
    /// Term / `:` definition lists.
    DefinitionLists,
    /// Trailing `{#id .class}` groups on headers and fences.
    AttributeLists,
}

impl Construct {
    /// Every construct.
    pub const ALL: [Self; 4] = [
        Self::Tables,
        Self::FencedCode,
        Self::DefinitionLists,
        Self::AttributeLists,
    ];

    /// Canonical extension name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::FencedCode => "fenced_code_gfm",
            Self::DefinitionLists => "def_list",
            Self::AttributeLists => "attr_list",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Construct {
    type Err = ExtraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tables" => Ok(Self::Tables),
            "fenced_code_gfm" | "fenced_code" | "fenced-code" => Ok(Self::FencedCode),
            "def_list" | "definition_lists" | "definition-lists" => Ok(Self::DefinitionLists),
            "attr_list" | "attribute_lists" | "attribute-lists" => Ok(Self::AttributeLists),
            other => Err(ExtraError::UnknownExtension(other.to_owned())),
        }
    }
}

/// Which constructs are recognized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Extensions {
    /// Every construct.
    #[default]
    All,
    /// Only the listed constructs.
    Only(BTreeSet<Construct>),
}

impl Extensions {
    /// Select only the given constructs.
    #[must_use]
    pub fn only(constructs: impl IntoIterator<Item = Construct>) -> Self {
        Self::Only(constructs.into_iter().collect())
    }

    /// Build a selection from extension names.
    ///
    /// `all` anywhere in the list selects every construct.
    ///
    /// # Example
    ///
    /// ```
    /// use mdextra::{Construct, Extensions};
    ///
    /// let ext = Extensions::from_names(["tables", "fenced_code_gfm"]).unwrap();
    /// assert!(ext.enables(Construct::Tables));
    /// assert!(!ext.enables(Construct::DefinitionLists));
    /// assert_eq!(Extensions::from_names(["tables", "all"]).unwrap(), Extensions::All);
    /// ```
    pub fn from_names<I, S>(names: I) -> Result<Self, ExtraError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name == "all" {
                return Ok(Self::All);
            }
            selected.insert(name.parse()?);
        }
        Ok(Self::Only(selected))
    }

    /// Whether `construct` is selected.
    #[must_use]
    pub fn enables(&self, construct: Construct) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&construct),
        }
    }
}

impl FromStr for Extensions {
    type Err = ExtraError;

    /// Parse a comma- or whitespace-separated list of extension names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_names(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty()),
        )
    }
}

/// Code highlighter class conventions for fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlighter {
    /// `<code class="lang">`.
    #[default]
    None,
    /// `<pre class="prettyprint"><code class="language-lang">`.
    Prettify,
    /// `<code class="language-lang">`.
    HighlightJs,
}

impl FromStr for Highlighter {
    type Err = ExtraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "prettify" => Ok(Self::Prettify),
            "highlight" | "highlight.js" | "highlightjs" => Ok(Self::HighlightJs),
            other => Err(ExtraError::UnknownHighlighter(other.to_owned())),
        }
    }
}

/// Configuration for a [`MarkdownExtra`](crate::MarkdownExtra) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraOptions {
    /// Constructs to recognize.
    pub extensions: Extensions,
    /// CSS class for generated `<table>` elements.
    pub table_class: Option<String>,
    /// Class naming for fenced code blocks.
    pub highlighter: Highlighter,
    /// Whether nested conversions (cells, terms, definitions) are sanitized.
    pub sanitize: bool,
}

impl Default for ExtraOptions {
    fn default() -> Self {
        Self {
            extensions: Extensions::All,
            table_class: None,
            highlighter: Highlighter::None,
            sanitize: true,
        }
    }
}

impl ExtraOptions {
    /// Create options with every construct enabled and sanitized nesting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select which constructs are recognized.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set the CSS class of generated tables.
    #[must_use]
    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = Some(class.into());
        self
    }

    /// Set the highlighter convention.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Enable or disable sanitization of nested conversions.
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }
}
