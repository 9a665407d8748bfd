//! Attribute lists on headers and fenced code blocks.
//!
//! A trailing `{#id .class}` group is cut from the header or fence line and
//! stored as an [`AttributeList`]. An attribute marker paragraph is placed
//! directly before the block. After the block's HTML is restored, the
//! marker is merged into the following `<h1>`..`<h6>` or `<pre>` tag.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtraError;
use crate::fence;
use crate::hash::HashStore;
use crate::lines::{LineWriter, Lines, leading_spaces};
use crate::processor::MatchContext;

static ATTR_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>~XX\d+XX</p>").unwrap());

static TARGET_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<(h[1-6]|pre)\b([^>]*)>").unwrap());

static ID_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+id\s*=\s*"([^"]*)""#).unwrap());

static CLASS_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+class\s*=\s*"([^"]*)""#).unwrap());

const MARKER_PREFIX: &str = "<p>~XX";
const MARKER_SUFFIX: &str = "XX</p>";

/// Parsed `{#id .class}` group.
///
/// # Example
///
/// ```
/// use mdextra::AttributeList;
///
/// let attrs = AttributeList::parse("#intro .wide .dark #main").unwrap();
/// assert_eq!(attrs.id.as_deref(), Some("main"));
/// assert_eq!(attrs.classes, vec!["wide", "dark"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    /// Element id; the last `#` token wins.
    pub id: Option<String>,
    /// Classes in declaration order.
    pub classes: Vec<String>,
}

impl AttributeList {
    /// Parse the contents of a brace group (without the braces).
    ///
    /// Returns `None` when the group is empty or holds anything besides
    /// `#name` and `.name` tokens.
    #[must_use]
    pub fn parse(group: &str) -> Option<Self> {
        let mut attrs = Self::default();
        for token in group.split_whitespace() {
            if let Some(id) = token.strip_prefix('#')
                && is_name(id)
            {
                attrs.id = Some(id.to_owned());
            } else if let Some(class) = token.strip_prefix('.')
                && is_name(class)
            {
                attrs.classes.push(class.to_owned());
            } else {
                return None;
            }
        }
        (attrs.id.is_some() || !attrs.classes.is_empty()).then_some(attrs)
    }

    /// Split a trailing ` {...}` group off `line`.
    ///
    /// The group must be separated from the rest of the line by whitespace.
    /// Returns the line without the group (right-trimmed) and the parsed list.
    #[must_use]
    pub fn split_trailing(line: &str) -> Option<(&str, Self)> {
        let inner = line.trim_end_matches([' ', '\t']).strip_suffix('}')?;
        let open = inner.rfind('{')?;
        let head = &inner[..open];
        if !head.ends_with([' ', '\t']) {
            return None;
        }
        let attrs = Self::parse(&inner[open + 1..])?;
        Some((head.trim_end_matches([' ', '\t']), attrs))
    }

    /// Build an opening tag from `tag`, its current `attributes` and `self`.
    ///
    /// The id replaces any existing id. Classes are appended after the
    /// existing ones.
    #[must_use]
    pub fn merge_into(&self, tag: &str, attributes: &str) -> String {
        let existing_class = CLASS_ATTR_RE
            .captures(attributes)
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str());
        let existing_id = ID_ATTR_RE
            .captures(attributes)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let mut classes: Vec<&str> = existing_class.split_whitespace().collect();
        classes.extend(self.classes.iter().map(String::as_str));

        let without_class = CLASS_ATTR_RE.replace_all(attributes, "");
        let rest = ID_ATTR_RE.replace_all(&without_class, "");

        let mut output = format!("<{tag}");
        if let Some(id) = self.id.as_deref().or(existing_id) {
            let _ = write!(output, r#" id="{id}""#);
        }
        if !classes.is_empty() {
            let _ = write!(output, r#" class="{}""#, classes.join(" "));
        }
        output.push_str(&rest);
        output.push('>');
        output
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

/// Cut attribute groups from header and fence lines, leaving markers.
pub(crate) fn hash_attribute_blocks(text: &str, ctx: &mut MatchContext<'_>) -> String {
    let lines = Lines::new(text);
    let mut writer = LineWriter::with_capacity(text.len() + 32);

    for idx in 0..lines.len() {
        if !lines.is_code(idx)
            && !lines.is_html(idx)
            && let Some((head, attrs)) = target_line(&lines, idx)
        {
            let key = ctx.store.store_attributes(attrs);
            writer.push_block(&HashStore::emit_attributes(key));
            writer.push_text(head, lines.has_newline(idx));
            continue;
        }

        writer.push_line(&lines, idx);
    }

    writer.finish()
}

/// Attribute group on line `idx` if that line opens a header or fence.
fn target_line<'a>(lines: &Lines<'a>, idx: usize) -> Option<(&'a str, AttributeList)> {
    let line = lines.get(idx);
    let (head, attrs) = AttributeList::split_trailing(line)?;

    if let Some(info) = fence::opening_info(head) {
        let language = info.trim_start();
        let valid = !language.contains(char::is_whitespace) && !language.contains('{');
        return (valid && fence::find_closing(lines, idx).is_some()).then_some((head, attrs));
    }

    if is_atx_header(head) {
        return Some((head, attrs));
    }

    let underlined = idx + 1 < lines.len() && is_setext_underline(lines.get(idx + 1));
    (underlined && leading_spaces(line) < 4).then_some((head, attrs))
}

fn is_atx_header(line: &str) -> bool {
    if leading_spaces(line) > 3 {
        return false;
    }
    let trimmed = line.trim_start_matches(' ');
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    let rest = &trimmed[hashes..];
    (1..=6).contains(&hashes) && (rest.is_empty() || rest.starts_with([' ', '\t']))
}

fn is_setext_underline(line: &str) -> bool {
    if leading_spaces(line) > 3 {
        return false;
    }
    let trimmed = line.trim();
    !trimmed.is_empty() && (trimmed.chars().all(|c| c == '=') || trimmed.chars().all(|c| c == '-'))
}

/// Merge every attribute marker into the header or `<pre>` tag after it.
///
/// A marker with no such tag after it is dropped.
pub(crate) fn apply_attribute_blocks(html: &str, store: &HashStore) -> Result<String, ExtraError> {
    let mut output = String::with_capacity(html.len());
    let mut last = 0;

    for marker in ATTR_MARKER_RE.find_iter(html) {
        let digits = &marker.as_str()[MARKER_PREFIX.len()..marker.len() - MARKER_SUFFIX.len()];
        let attrs = digits
            .parse::<usize>()
            .ok()
            .and_then(|key| store.attributes(key))
            .ok_or_else(|| {
                tracing::error!(marker = marker.as_str(), "Attribute marker has no list");
                ExtraError::UnresolvedAttributes {
                    marker: marker.as_str().to_owned(),
                }
            })?;

        output.push_str(&html[last..marker.start()]);
        let rest = &html[marker.end()..];

        if let Some(target) = TARGET_TAG_RE.captures(rest)
            && let Some(whole) = target.get(0)
        {
            output.push_str(&attrs.merge_into(&target[1], &target[2]));
            last = marker.end() + whole.end();
        } else {
            tracing::debug!(marker = marker.as_str(), "Attribute marker has no target");
            last = marker.end() + usize::from(rest.starts_with('\n'));
        }
    }

    output.push_str(&html[last..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExtraOptions;
    use crate::processor::MatchContext;
    use mdextra_renderer::BaselineConverter;
    use pretty_assertions::assert_eq;

    fn hash(text: &str) -> (String, HashStore) {
        let options = ExtraOptions::default();
        let converter = BaselineConverter::new();
        let mut store = HashStore::new();
        let output = {
            let mut ctx = MatchContext::new(&options, &converter, &mut store);
            hash_attribute_blocks(text, &mut ctx)
        };
        (output, store)
    }

    #[test]
    fn test_parse_id_and_classes() {
        let attrs = AttributeList::parse(" #id .a .b ").unwrap();
        assert_eq!(attrs.id.as_deref(), Some("id"));
        assert_eq!(attrs.classes, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_keeps_duplicate_classes() {
        let attrs = AttributeList::parse(".a .a").unwrap();
        assert_eq!(attrs.classes, vec!["a", "a"]);
    }

    #[test]
    fn test_parse_rejects_other_tokens() {
        assert_eq!(AttributeList::parse(r#"#id lang="en""#), None);
        assert_eq!(AttributeList::parse("#"), None);
        assert_eq!(AttributeList::parse(""), None);
    }

    #[test]
    fn test_split_trailing() {
        let (head, attrs) = AttributeList::split_trailing("## Title {#top .x}  ").unwrap();
        assert_eq!(head, "## Title");
        assert_eq!(attrs.id.as_deref(), Some("top"));
        assert_eq!(attrs.classes, vec!["x"]);
    }

    #[test]
    fn test_split_trailing_needs_whitespace() {
        assert_eq!(AttributeList::split_trailing("## Title{#top}"), None);
        assert_eq!(AttributeList::split_trailing("{#top}"), None);
    }

    #[test]
    fn test_merge_into_plain_tag() {
        let attrs = AttributeList::parse("#x .a").unwrap();
        assert_eq!(attrs.merge_into("h2", ""), r#"<h2 id="x" class="a">"#);
    }

    #[test]
    fn test_merge_appends_after_existing_class() {
        let attrs = AttributeList::parse(".a .b").unwrap();
        assert_eq!(
            attrs.merge_into("pre", r#" class="prettyprint""#),
            r#"<pre class="prettyprint a b">"#
        );
    }

    #[test]
    fn test_merge_replaces_existing_id() {
        let attrs = AttributeList::parse("#new").unwrap();
        assert_eq!(
            attrs.merge_into("h1", r#" id="old" data-x="1""#),
            r#"<h1 id="new" data-x="1">"#
        );
    }

    #[test]
    fn test_hash_atx_header() {
        let (output, store) = hash("# Title {#top}\n\ntext\n");
        assert_eq!(output, "<p>~XX0XX</p>\n\n# Title\n\ntext\n");
        assert_eq!(store.attributes(0).unwrap().id.as_deref(), Some("top"));
    }

    #[test]
    fn test_hash_setext_header() {
        let (output, _) = hash("Title {.big}\n=====\n");
        assert_eq!(output, "<p>~XX0XX</p>\n\nTitle\n=====\n");
    }

    #[test]
    fn test_hash_fence_line() {
        let (output, store) = hash("```js {.numbered}\nx\n```\n");
        assert_eq!(output, "<p>~XX0XX</p>\n\n```js\nx\n```\n");
        assert_eq!(store.attributes(0).unwrap().classes, vec!["numbered"]);
    }

    #[test]
    fn test_unclosed_fence_line_untouched() {
        let text = "```js {.numbered}\nx\n";
        assert_eq!(hash(text).0, text);
    }

    #[test]
    fn test_paragraph_line_untouched() {
        let text = "Some text {#not-a-header}\n";
        assert_eq!(hash(text).0, text);
    }

    #[test]
    fn test_lines_inside_fence_untouched() {
        let text = "~~~\n# Comment {#x}\n~~~\n";
        assert_eq!(hash(text).0, text);
    }

    #[test]
    fn test_hash_without_header_space_untouched() {
        let text = "#Title {#x}\n";
        assert_eq!(hash(text).0, text);
    }

    #[test]
    fn test_apply_to_following_header() {
        let mut store = HashStore::new();
        store.store_attributes(AttributeList::parse("#top").unwrap());
        let html = apply_attribute_blocks("<p>~XX0XX</p>\n<h1>Title</h1>\n", &store).unwrap();
        assert_eq!(html, "<h1 id=\"top\">Title</h1>\n");
    }

    #[test]
    fn test_apply_drops_marker_without_target() {
        let mut store = HashStore::new();
        store.store_attributes(AttributeList::parse("#top").unwrap());
        let html = apply_attribute_blocks("<p>~XX0XX</p>\n<p>x</p>\n", &store).unwrap();
        assert_eq!(html, "<p>x</p>\n");
    }

    #[test]
    fn test_apply_unknown_key_is_error() {
        let store = HashStore::new();
        assert!(matches!(
            apply_attribute_blocks("<p>~XX4XX</p>", &store),
            Err(ExtraError::UnresolvedAttributes { .. })
        ));
    }
}
