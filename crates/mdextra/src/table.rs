//! Pipe tables.
//!
//! Two header forms are recognized, each needing a separator row directly
//! beneath it:
//!
//! ```text
//! | h1 | h2 |        h1 | h2
//! |:---|---:|        :- | -:
//! | a  | b  |        a  | b
//! ```
//!
//! The header fixes the column count. Short body rows are padded with empty
//! cells and extra cells in long rows are dropped.

use std::fmt::Write;

use html_escape::encode_double_quoted_attribute;

use crate::inline::InlineConverter;
use crate::lines::{LineWriter, Lines, leading_spaces};
use crate::processor::MatchContext;

/// Column alignment from a separator cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// `-`
    None,
    /// `:-`
    Left,
    /// `:-:`
    Center,
    /// `-:`
    Right,
}

impl Alignment {
    /// Alignment of one separator cell.
    ///
    /// ```
    /// use mdextra::Alignment;
    ///
    /// assert_eq!(Alignment::from_marker(":--"), Alignment::Left);
    /// assert_eq!(Alignment::from_marker(" :-: "), Alignment::Center);
    /// assert_eq!(Alignment::from_marker("---:"), Alignment::Right);
    /// assert_eq!(Alignment::from_marker("---"), Alignment::None);
    /// ```
    #[must_use]
    pub fn from_marker(marker: &str) -> Self {
        let marker = marker.trim();
        let left = marker.strip_prefix(':');
        let right = marker.strip_suffix(':');
        match (left, right) {
            (Some(inner), Some(_)) if inner.strip_suffix(':').is_some_and(is_dashes) => {
                Self::Center
            }
            (Some(inner), _) if is_dashes(inner) => Self::Left,
            (None, Some(inner)) if is_dashes(inner) => Self::Right,
            _ => Self::None,
        }
    }

    fn style(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Left => r#" style="text-align:left;""#,
            Self::Center => r#" style="text-align:center;""#,
            Self::Right => r#" style="text-align:right;""#,
        }
    }
}

fn is_dashes(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '-')
}

/// Header row shape, which decides what counts as a body row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// Header starts with `|`; rows start with `|`.
    Piped,
    /// Header has no leading `|`; rows are any line with a `|`.
    Bare,
}

impl Form {
    /// Form of the header/separator pair, or `None` if it is not a table.
    ///
    /// Both lines may be indented at most three spaces. A piped header needs
    /// a piped separator; a bare separator must start with a `-`/`:` cell
    /// before its first `|`.
    fn detect(header: &str, separator: &str) -> Option<Self> {
        if leading_spaces(header) > 3 || leading_spaces(separator) > 3 {
            return None;
        }
        let header = header.trim_start_matches(' ');
        let separator = separator.trim_start_matches(' ');

        if let Some(rest) = header.strip_prefix('|')
            && !rest.is_empty()
            && let Some(marks) = separator.strip_prefix('|')
            && is_separator_marks(marks.trim_start_matches(' '))
        {
            return Some(Self::Piped);
        }

        let bare_header = header.starts_with(|c: char| !c.is_whitespace()) && header.contains('|');
        let bare_separator = separator.split_once('|').is_some_and(|(first, _)| {
            let first = first.trim_end_matches(' ');
            !first.is_empty() && first.chars().all(|c| matches!(c, '-' | ':'))
        }) && is_separator_marks(separator);

        (bare_header && bare_separator).then_some(Self::Bare)
    }

    /// Whether `line` continues a table of this form.
    fn is_row(self, line: &str) -> bool {
        match self {
            Self::Piped => line.trim_start_matches(' ').starts_with('|'),
            Self::Bare => line.contains('|'),
        }
    }
}

/// Separator content: starts with `-` or `:`, only `-|: ` after, some `-`.
fn is_separator_marks(marks: &str) -> bool {
    marks.starts_with(['-', ':'])
        && marks.contains('-')
        && marks.chars().all(|c| matches!(c, '-' | '|' | ':' | ' '))
}

/// Cells of a row, outer pipes removed and each cell trimmed.
///
/// Every `|` splits, including one inside a code span. Escaped pipes were
/// already turned into `&#124;` and survive as cell text.
fn split_row(line: &str) -> Vec<&str> {
    let content = strip_outer_pipes(line);
    content.split('|').map(str::trim).collect()
}

/// Row content between an optional leading and trailing `|`.
fn strip_outer_pipes(line: &str) -> &str {
    let line = line.trim_start_matches(' ');
    let line = line.strip_prefix('|').unwrap_or(line);
    line.trim_end_matches(' ').strip_suffix('|').unwrap_or(line)
}

/// A recognized table.
#[derive(Debug)]
struct Table<'a> {
    header: Vec<&'a str>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<&'a str>>,
    /// Index of the first line after the table.
    end: usize,
}

impl<'a> Table<'a> {
    /// Table whose header is on line `start`, if the next line separates it.
    ///
    /// Body rows run until the first line that is not a row in the header's
    /// form, or that is raw HTML or code.
    fn parse(lines: &Lines<'a>, start: usize) -> Option<Self> {
        if start + 1 >= lines.len()
            || !lines.has_newline(start)
            || lines.is_opaque(start)
            || lines.is_opaque(start + 1)
        {
            return None;
        }
        let header_line = lines.get(start);
        let separator_line = lines.get(start + 1);
        let form = Form::detect(header_line, separator_line)?;

        let header = split_row(header_line);
        let alignments: Vec<Alignment> = split_row(separator_line)
            .into_iter()
            .map(Alignment::from_marker)
            .collect();
        if header.len() != alignments.len() {
            return None;
        }

        let mut rows = Vec::new();
        let mut end = start + 2;
        while end < lines.len() && !lines.is_opaque(end) && form.is_row(lines.get(end)) {
            let line = lines.get(end);
            if !strip_outer_pipes(line).trim().is_empty() {
                rows.push(split_row(line));
            }
            end += 1;
        }

        Some(Self {
            header,
            alignments,
            rows,
            end,
        })
    }

    /// Table HTML with every cell converted to span-level markup.
    fn render(&self, class: Option<&str>, inline: InlineConverter<'_>) -> String {
        let mut html = String::from("<table");
        if let Some(class) = class {
            let _ = write!(html, r#" class="{}""#, encode_double_quoted_attribute(class));
        }
        html.push_str(">\n<thead>\n<tr>\n");

        for (cell, align) in self.header.iter().zip(&self.alignments) {
            let _ = writeln!(html, "  <th{}>{}</th>", align.style(), inline.spans(cell));
        }
        html.push_str("</tr>\n</thead>\n");

        for row in &self.rows {
            html.push_str("<tr>\n");
            for (col, align) in self.alignments.iter().enumerate() {
                let cell = row.get(col).copied().unwrap_or_default();
                let _ = writeln!(html, "  <td{}>{}</td>", align.style(), inline.spans(cell));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</table>\n");
        html
    }
}

/// Replace every table with a placeholder.
///
/// When a candidate header/separator pair fails, scanning resumes on the
/// next line, so a table later in the same paragraph is still found.
pub(crate) fn tables(text: &str, ctx: &mut MatchContext<'_>) -> String {
    let lines = Lines::new(text);
    let mut writer = LineWriter::with_capacity(text.len());
    let mut idx = 0;

    while idx < lines.len() {
        if let Some(table) = Table::parse(&lines, idx) {
            let html = table.render(ctx.options.table_class.as_deref(), ctx.inline);
            writer.push_block(&ctx.store.hash_block(html));
            idx = table.end;
            continue;
        }

        writer.push_line(&lines, idx);
        idx += 1;
    }

    writer.finish()
}
