//! Nested conversion of cell, term and definition content.

use std::borrow::Cow;
use std::sync::LazyLock;

use mdextra_renderer::MarkdownConverter;
use regex::{Captures, Regex};

/// Any tag, including an unterminated one at the end of input.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Span-level tags (and line breaks) allowed in span-only output.
static SPAN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:</?(?:a|abbr|acronym|applet|area|b|basefont|bdo|big|button|cite|code|del|dfn|em|figcaption|font|i|iframe|img|input|ins|kbd|label|map|mark|meter|object|param|progress|q|ruby|rp|rt|s|samp|script|select|small|span|strike|strong|sub|sup|textarea|time|tt|u|var|wbr)\b[^>]*>|<br\s?/?>)$",
    )
    .unwrap()
});

/// A line holding nothing but a block marker: a list item, header or quote
/// marker, a thematic break, or a code fence opening.
static EMPTY_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^( {0,3})(\d{1,9}[.)]|[-+*>]|#{1,6}|(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,}|`{3,}[^`\n]*|~{3,}.*)[ \t]*$",
    )
    .unwrap()
});

/// Runs nested conversions through a converter other than the host.
#[derive(Clone, Copy)]
pub(crate) struct InlineConverter<'a> {
    converter: &'a dyn MarkdownConverter,
}

impl<'a> InlineConverter<'a> {
    pub(crate) fn new(converter: &'a dyn MarkdownConverter) -> Self {
        Self { converter }
    }

    /// Convert `text` and keep only span-level tags.
    ///
    /// Lines that would open an empty block are escaped first, so a cell of
    /// `-` or `1.` keeps its text instead of becoming an empty list.
    pub(crate) fn spans(&self, text: &str) -> String {
        let text = escape_empty_blocks(text);
        filter_span_tags(&self.converter.make_html(&text))
            .trim()
            .to_owned()
    }

    /// Convert `text` keeping its block structure.
    pub(crate) fn blocks(&self, text: &str) -> String {
        self.converter.make_html(text).trim().to_owned()
    }
}

/// Backslash-escape the marker of every line matching [`EMPTY_BLOCK_RE`].
///
/// Ordered list markers are escaped at their delimiter (`1\.`), since a
/// backslash before a digit is literal.
fn escape_empty_blocks(text: &str) -> Cow<'_, str> {
    EMPTY_BLOCK_RE.replace_all(text, |caps: &Captures<'_>| {
        let (indent, marker) = (&caps[1], &caps[2]);
        let digits = marker.len() - marker.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        format!("{indent}{}\\{}", &marker[..digits], &marker[digits..])
    })
}

/// Remove every tag that is not span-level.
///
/// Text between tags is kept. Attributes of allowed tags are kept too, so
/// links and images still render.
pub(crate) fn filter_span_tags(html: &str) -> String {
    TAG_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let tag = &caps[0];
            if SPAN_TAG_RE.is_match(tag) {
                tag.to_owned()
            } else {
                String::new()
            }
        })
        .into_owned()
}
