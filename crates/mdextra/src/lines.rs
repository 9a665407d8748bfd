//! Line scanning helpers shared by the block matchers.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;

/// Start of an HTML block that runs until the next blank line.
static HTML_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^ {0,3}</?(?:address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[1-6]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul)(?:\s|/?>|$)",
    )
    .unwrap()
});

/// Start of a raw HTML block that runs until its closing tag.
static RAW_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ {0,3}<(pre|script|style|textarea)(?:\s|>|$)").unwrap());

/// How the baseline converter will treat a line, whatever the matchers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Text,
    /// Inside a block-level HTML element.
    Html,
    /// Opening line of a code fence.
    FenceOpen,
    /// Body or closing line of a code fence.
    Code,
}

/// Text split on `\n`, remembering which lines were newline-terminated.
///
/// The last entry is whatever follows the final newline (empty when the text
/// ends with `\n`), so joining the entries with `\n` restores the input.
///
/// Lines inside block-level HTML and code fences are flagged: the baseline
/// converter passes them through as raw HTML or code, so a placeholder
/// written there would never be resolved.
pub(crate) struct Lines<'a> {
    lines: Vec<&'a str>,
    kinds: Vec<LineKind>,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();
        let kinds = classify(&lines);
        Self { lines, kinds }
    }

    /// Whether line `idx` belongs to a block-level HTML element.
    pub(crate) fn is_html(&self, idx: usize) -> bool {
        self.kinds[idx] == LineKind::Html
    }

    /// Whether line `idx` is inside a code fence, past its opening line.
    pub(crate) fn is_code(&self, idx: usize) -> bool {
        self.kinds[idx] == LineKind::Code
    }

    /// Whether line `idx` is raw HTML or any line of a code fence.
    ///
    /// Matchers that only rewrite ordinary text never start or continue a
    /// construct on such a line.
    pub(crate) fn is_opaque(&self, idx: usize) -> bool {
        self.kinds[idx] != LineKind::Text
    }

    /// Number of entries, counting the one after a final newline.
    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn get(&self, idx: usize) -> &'a str {
        self.lines[idx]
    }

    /// Whether line `idx` is followed by a newline.
    pub(crate) fn has_newline(&self, idx: usize) -> bool {
        idx + 1 < self.lines.len()
    }

    pub(crate) fn is_blank(&self, idx: usize) -> bool {
        is_blank(self.lines[idx])
    }
}

/// Flag lines covered by code fences and HTML blocks.
///
/// Tags inside a fence open nothing, and fence lines inside an HTML block
/// are part of the block.
fn classify(lines: &[&str]) -> Vec<LineKind> {
    let mut kinds = vec![LineKind::Text; lines.len()];
    let mut fence = FenceTracker::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            kinds[idx] = if was_in_fence {
                LineKind::Code
            } else {
                LineKind::FenceOpen
            };
            idx += 1;
        } else if let Some(caps) = RAW_BLOCK_RE.captures(line) {
            let closing = format!("</{}>", caps[1].to_ascii_lowercase());
            while idx < lines.len() {
                kinds[idx] = LineKind::Html;
                let closed = lines[idx].to_ascii_lowercase().contains(&closing);
                idx += 1;
                if closed {
                    break;
                }
            }
        } else if HTML_BLOCK_RE.is_match(line) {
            while idx < lines.len() && !is_blank(lines[idx]) {
                kinds[idx] = LineKind::Html;
                idx += 1;
            }
        } else {
            idx += 1;
        }
    }

    kinds
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading space characters.
pub(crate) fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Output buffer for a matcher pass.
pub(crate) struct LineWriter {
    output: String,
}

impl LineWriter {
    /// Empty buffer, usually sized to the input text.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
        }
    }

    /// Copy line `idx` unchanged, including its newline.
    pub(crate) fn push_line(&mut self, lines: &Lines<'_>, idx: usize) {
        self.push_text(lines.get(idx), lines.has_newline(idx));
    }

    /// Append `text`, then a newline if `newline` is set.
    pub(crate) fn push_text(&mut self, text: &str, newline: bool) {
        self.output.push_str(text);
        if newline {
            self.output.push('\n');
        }
    }

    /// Write a placeholder marker as its own blank-line separated block.
    pub(crate) fn push_block(&mut self, marker: &str) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            if !self.output.ends_with('\n') {
                self.output.push('\n');
            }
            self.output.push('\n');
        }
        self.output.push_str(marker);
        self.output.push_str("\n\n");
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}
