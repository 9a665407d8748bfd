//! HTML sanitization for the sanitizing baseline converter.
//!
//! Only a basic set of block and span tags survives; everything else is
//! stripped (keeping its text), and `script`/`style` are removed along with
//! their content.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::{Builder, UrlRelative};

/// Tags that survive sanitization.
const BASIC_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "dd",
    "del",
    "dl",
    "dt",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "i",
    "img",
    "kbd",
    "li",
    "ol",
    "p",
    "pre",
    "s",
    "strike",
    "strong",
    "sub",
    "sup",
    "ul",
];

/// Strip disallowed tags and attributes from rendered HTML.
///
/// # Example
///
/// ```
/// use mdextra_renderer::sanitize_html;
///
/// let html = sanitize_html(r#"<p onclick="x()">Hi<script>alert(1)</script></p>"#);
/// assert_eq!(html, "<p>Hi</p>");
/// ```
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Whitelist shared by every sanitizing conversion.
static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", HashSet::from(["href", "title"]));
    tag_attributes.insert("img", HashSet::from(["src", "alt", "title", "width", "height"]));

    let mut builder = Builder::empty();
    builder
        .tags(BASIC_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .clean_content_tags(HashSet::from(["script", "style"]))
        .url_schemes(HashSet::from(["http", "https", "ftp", "mailto"]))
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None);
    builder
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keeps_basic_markup() {
        let html = "<h2>Title</h2>\n<p><em>a</em> <strong>b</strong> <code>c</code></p>";
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn test_removes_script_with_content() {
        assert_eq!(sanitize_html("<script>alert(1)</script>"), "");
    }

    #[test]
    fn test_strips_attributes_outside_whitelist() {
        assert_eq!(sanitize_html(r#"<p class="x" id="y">a</p>"#), "<p>a</p>");
    }

    #[test]
    fn test_keeps_link_href() {
        assert_eq!(
            sanitize_html(r#"<a href="https://example.com" onclick="x()">l</a>"#),
            r#"<a href="https://example.com">l</a>"#
        );
    }

    #[test]
    fn test_strips_table_tags_keeps_text() {
        let html = sanitize_html("<table><tr><td>cell</td></tr></table>");
        assert!(!html.contains("table"));
        assert!(html.contains("cell"));
    }

    #[test]
    fn test_repeated_calls_share_whitelist() {
        let first = sanitize_html(r#"<p><a href="javascript:x()">a</a></p>"#);
        let second = sanitize_html(r#"<p><a href="javascript:x()">a</a></p>"#);
        assert_eq!(first, "<p><a>a</a></p>");
        assert_eq!(first, second);
    }

    #[test]
    fn test_placeholder_paragraph_survives() {
        assert_eq!(sanitize_html("<p>~X0X</p>"), "<p>~X0X</p>");
    }
}
