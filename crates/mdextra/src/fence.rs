//! Code fence recognition.
//!
//! [`FenceTracker`] follows top-level `CommonMark` fences (backticks or
//! tildes, three or more, indented at most three spaces) so line rewriters
//! can leave code untouched. The `opening_info` and `find_closing` helpers
//! implement the stricter triple-backtick grammar of the fenced code matcher.

use crate::lines::{Lines, leading_spaces};

const BACKTICKS: &str = "```";

/// Tracks whether line-by-line processing is inside a fenced region.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Fence character and opening length of the current region.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the last line fed left the tracker inside a region.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if it opened or closed a region.
    ///
    /// A backtick info string may not contain a backtick, so a line such as
    /// ```` ```code``` ```` stays inline code.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        if leading_spaces(line) > 3 {
            return false;
        }
        let trimmed = line.trim_start_matches(' ');
        match self.open {
            Some((ch, len)) => {
                let run = run_length(trimmed, ch);
                let closes = run >= len && trimmed[run..].trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                let Some(ch) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') else {
                    return false;
                };
                let run = run_length(trimmed, ch);
                if run < 3 || (ch == '`' && trimmed[run..].contains('`')) {
                    return false;
                }
                self.open = Some((ch, run));
                true
            }
        }
    }
}

/// Byte length of the run of `ch` starting `s`.
fn run_length(s: &str, ch: char) -> usize {
    s.chars().take_while(|&c| c == ch).count() * ch.len_utf8()
}

/// Info string of a column-0 triple-backtick opening line.
///
/// An info string holding a backtick means a longer fence or inline code,
/// which the matcher leaves to the baseline.
pub(crate) fn opening_info(line: &str) -> Option<&str> {
    line.strip_prefix(BACKTICKS).filter(|info| !info.contains('`'))
}

/// Whether `line` is a closing fence: three backticks, trailing blanks only.
pub(crate) fn is_closing(line: &str) -> bool {
    line.trim_end_matches([' ', '\t']) == BACKTICKS
}

/// First newline-terminated closing fence after the opening at `open`.
///
/// Returns `None` unless the baseline's fence region ends on the same line,
/// so a block is never cut out of code the baseline renders differently.
pub(crate) fn find_closing(lines: &Lines<'_>, open: usize) -> Option<usize> {
    let close = (open + 1..lines.len())
        .find(|&idx| lines.has_newline(idx) && is_closing(lines.get(idx)))?;
    let same_region = (open + 1..=close).all(|idx| lines.is_code(idx)) && !lines.is_code(close + 1);
    same_region.then_some(close)
}
