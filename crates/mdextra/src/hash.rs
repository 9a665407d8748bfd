//! Placeholder store for pre-rendered block HTML.
//!
//! Matchers render their construct to HTML up front, store the fragment,
//! and leave a marker paragraph in the markdown. The baseline converter and
//! its sanitizer see only `<p>~X0X</p>`, which they pass through untouched,
//! and the post-conversion hook swaps every marker for its fragment.
//!
//! Attribute lists use a second marker shape, `<p>~XX0XX</p>`, keyed into a
//! separate sequence of typed [`AttributeList`] values.

use std::sync::LazyLock;

use regex::Regex;

use crate::attr_list::AttributeList;
use crate::error::ExtraError;

static BLOCK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>~X\d+X</p>").unwrap());

static MARKER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<p>~(?:X\d+X|XX\d+XX)</p>$").unwrap());

const BLOCK_PREFIX: &str = "<p>~X";
const BLOCK_SUFFIX: &str = "X</p>";

/// Call-scoped registry of rendered fragments and attribute lists.
#[derive(Debug, Default)]
pub struct HashStore {
    blocks: Vec<String>,
    attributes: Vec<AttributeList>,
}

impl HashStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return its key.
    pub fn store(&mut self, html: impl Into<String>) -> usize {
        self.blocks.push(html.into());
        self.blocks.len() - 1
    }

    /// Marker paragraph for a block key.
    ///
    /// ```
    /// use mdextra::HashStore;
    ///
    /// assert_eq!(HashStore::emit(3), "<p>~X3X</p>");
    /// ```
    #[must_use]
    pub fn emit(key: usize) -> String {
        format!("{BLOCK_PREFIX}{key}{BLOCK_SUFFIX}")
    }

    /// Store a fragment and return its marker.
    pub fn hash_block(&mut self, html: impl Into<String>) -> String {
        let key = self.store(html);
        Self::emit(key)
    }

    /// Fragment stored under `key`.
    #[must_use]
    pub fn get(&self, key: usize) -> Option<&str> {
        self.blocks.get(key).map(String::as_str)
    }

    /// Append an attribute list and return its key.
    pub fn store_attributes(&mut self, attributes: AttributeList) -> usize {
        self.attributes.push(attributes);
        self.attributes.len() - 1
    }

    /// Marker paragraph for an attribute key.
    #[must_use]
    pub fn emit_attributes(key: usize) -> String {
        format!("<p>~XX{key}XX</p>")
    }

    /// Attribute list stored under `key`.
    #[must_use]
    pub fn attributes(&self, key: usize) -> Option<&AttributeList> {
        self.attributes.get(key)
    }

    /// Number of stored block fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block fragments are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Replace every block marker in `text` with its fragment.
    ///
    /// Substitution is a single left-to-right pass, so a fragment is never
    /// rescanned for markers.
    pub fn resolve_all(&self, text: &str) -> Result<String, ExtraError> {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for marker in BLOCK_MARKER_RE.find_iter(text) {
            let digits = &marker.as_str()[BLOCK_PREFIX.len()..marker.len() - BLOCK_SUFFIX.len()];
            let fragment = digits
                .parse::<usize>()
                .ok()
                .and_then(|key| self.get(key))
                .ok_or_else(|| {
                    tracing::error!(marker = marker.as_str(), "Placeholder has no fragment");
                    ExtraError::UnresolvedPlaceholder {
                        marker: marker.as_str().to_owned(),
                    }
                })?;

            output.push_str(&text[last..marker.start()]);
            output.push_str(fragment);
            last = marker.end();
        }

        output.push_str(&text[last..]);
        Ok(output)
    }

    /// Drop every stored fragment and attribute list.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.attributes.clear();
    }
}

/// Whether `line` is exactly one marker paragraph.
pub(crate) fn is_marker_line(line: &str) -> bool {
    MARKER_LINE_RE.is_match(line.trim())
}
