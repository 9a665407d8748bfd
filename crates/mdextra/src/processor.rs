//! Extension pipeline registered on a host [`Converter`].

use mdextra_renderer::{
    BaselineConverter, ConversionHook, Converter, HookError, MarkdownConverter,
};

use crate::attr_list;
use crate::deflist;
use crate::error::ExtraError;
use crate::escape::normalize_escapes;
use crate::fenced;
use crate::hash::HashStore;
use crate::inline::InlineConverter;
use crate::options::{Construct, ExtraOptions};
use crate::table;

/// A block matcher: rewrites text, storing rendered blocks in the context.
type Matcher = fn(&str, &mut MatchContext<'_>) -> String;

/// Matchers in the order they run, regardless of how options list them.
const MATCHERS: [(Construct, Matcher); 4] = [
    (Construct::AttributeLists, attr_list::hash_attribute_blocks),
    (Construct::FencedCode, fenced::fenced_code_blocks),
    (Construct::Tables, table::tables),
    (Construct::DefinitionLists, deflist::definition_lists),
];

/// Per-call state handed to every matcher.
pub(crate) struct MatchContext<'a> {
    pub(crate) options: &'a ExtraOptions,
    pub(crate) inline: InlineConverter<'a>,
    pub(crate) store: &'a mut HashStore,
}

impl<'a> MatchContext<'a> {
    pub(crate) fn new(
        options: &'a ExtraOptions,
        converter: &'a dyn MarkdownConverter,
        store: &'a mut HashStore,
    ) -> Self {
        Self {
            options,
            inline: InlineConverter::new(converter),
            store,
        }
    }
}

/// Markdown Extra block constructs for one host converter.
///
/// Each instance owns its options, a nested converter for cell, term and
/// definition content, and a placeholder store that lives for one
/// conversion call.
///
/// # Example
///
/// ```
/// use mdextra::{ExtraOptions, MarkdownExtra};
/// use mdextra_renderer::Converter;
///
/// let mut converter = Converter::new();
/// MarkdownExtra::init(&mut converter, ExtraOptions::default());
///
/// let html = converter.make_html("a | b\n--|--\n1 | 2").unwrap();
/// assert!(html.contains("<td>1</td>"));
/// ```
#[derive(Debug)]
pub struct MarkdownExtra {
    options: ExtraOptions,
    converter: BaselineConverter,
    store: HashStore,
}

impl MarkdownExtra {
    /// Create an instance. Nested conversions sanitize unless
    /// `options.sanitize` is `false`.
    #[must_use]
    pub fn new(options: ExtraOptions) -> Self {
        let converter = if options.sanitize {
            BaselineConverter::sanitizing()
        } else {
            BaselineConverter::new()
        };
        Self {
            options,
            converter,
            store: HashStore::new(),
        }
    }

    /// Create an instance and register it on `host`.
    pub fn init(host: &mut Converter, options: ExtraOptions) {
        host.chain(Self::new(options));
    }

    /// Options this instance was created with.
    #[must_use]
    pub fn options(&self) -> &ExtraOptions {
        &self.options
    }

    /// Pre-block pass: normalize escapes, then replace every enabled
    /// construct with a placeholder.
    pub fn do_conversion(&mut self, text: &str) -> String {
        self.store.clear();
        let mut text = normalize_escapes(text);

        let mut ctx = MatchContext::new(&self.options, &self.converter, &mut self.store);
        for (construct, matcher) in MATCHERS {
            if !ctx.options.extensions.enables(construct) {
                continue;
            }
            text = matcher(&text, &mut ctx);
            tracing::debug!(construct = %construct, stored = ctx.store.len(), "Ran block matcher");
        }

        text.push('\n');
        text
    }

    /// Post-conversion pass: restore every placeholder, then apply
    /// attribute lists.
    pub fn finish_conversion(&mut self, html: &str) -> Result<String, ExtraError> {
        let resolved = self.store.resolve_all(html)?;
        let output = attr_list::apply_attribute_blocks(&resolved, &self.store)?;
        tracing::debug!(fragments = self.store.len(), "Restored placeholders");
        self.store.clear();
        Ok(output)
    }
}

impl ConversionHook for MarkdownExtra {
    fn pre_block_gamut(&mut self, text: &mut String) {
        *text = self.do_conversion(text);
    }

    fn post_conversion(&mut self, html: &mut String) -> Result<(), HookError> {
        *html = self.finish_conversion(html)?;
        Ok(())
    }
}
