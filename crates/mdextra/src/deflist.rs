//! Definition lists.
//!
//! ```text
//! Term 1
//! Term 2
//!
//! :   Definition, wrapped in a paragraph because of the blank line above.
//!
//!     Indented continuation, still part of the same definition.
//!
//! :   A second definition for the same terms.
//!
//! Another term
//! :   Bare definition.
//! ```
//!
//! A list starts at the beginning of the text or after a blank line. All
//! term groups separated only by blank lines share one `<dl>`.

use std::fmt::Write;

use crate::hash::is_marker_line;
use crate::inline::InlineConverter;
use crate::lines::{LineWriter, Lines, is_blank, leading_spaces};
use crate::processor::MatchContext;

/// One `:` definition and its continuation lines.
#[derive(Debug)]
struct Definition<'a> {
    /// Source lines, the first still carrying its `:` marker.
    lines: Vec<&'a str>,
    /// Render through the block converter and wrap in paragraphs.
    block: bool,
}

/// Terms sharing the definitions that follow them.
#[derive(Debug)]
struct TermGroup<'a> {
    terms: Vec<&'a str>,
    definitions: Vec<Definition<'a>>,
}

#[derive(Debug)]
struct DefinitionList<'a> {
    groups: Vec<TermGroup<'a>>,
    /// Index of the first line after the list.
    end: usize,
}

/// `:` followed by a space or tab, indented at most three spaces.
fn is_definition_marker(line: &str) -> bool {
    leading_spaces(line) <= 3
        && line
            .trim_start_matches(' ')
            .strip_prefix(':')
            .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Any non-blank line that is neither a definition nor a placeholder.
fn is_term_line(line: &str) -> bool {
    !is_blank(line) && !is_definition_marker(line) && !is_marker_line(line)
}

/// Whether a line after a blank continues the current definition.
fn starts_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Length of the `   :   ` prefix of a marker line.
fn marker_prefix_len(line: &str) -> usize {
    let indent = leading_spaces(line);
    let after_colon = &line[indent + 1..];
    let gap = after_colon.len() - after_colon.trim_start_matches([' ', '\t']).len();
    indent + 1 + gap
}

/// Remove one level of indentation: a tab or up to four spaces.
fn outdent(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest;
    }
    let spaces = leading_spaces(line).min(4);
    &line[spaces..]
}

impl<'a> Definition<'a> {
    /// Parse the definition whose marker is on line `start`.
    ///
    /// The body takes every following line up to the next marker, placeholder,
    /// code fence or HTML block. Across blank lines it continues only while
    /// the next line is indented, which also switches it to block mode.
    ///
    /// Returns the definition and the index of the line after its body.
    fn parse(lines: &Lines<'a>, start: usize, leading_blank: bool) -> (Self, usize) {
        let mut body = vec![lines.get(start)];
        let mut has_blank = false;
        let mut idx = start + 1;

        while idx < lines.len() {
            let line = lines.get(idx);
            if !is_blank(line) {
                if is_definition_marker(line) || is_marker_line(line) || lines.is_opaque(idx) {
                    break;
                }
                body.push(line);
                idx += 1;
                continue;
            }

            let mut next = idx;
            while next < lines.len() && lines.is_blank(next) {
                next += 1;
            }
            let continues = next < lines.len()
                && !lines.is_opaque(next)
                && !is_definition_marker(lines.get(next))
                && starts_indented(lines.get(next));
            if !continues {
                break;
            }
            body.extend((idx..next).map(|i| lines.get(i)));
            has_blank = true;
            idx = next;
        }

        let definition = Self {
            lines: body,
            block: leading_blank || has_blank,
        };
        (definition, idx)
    }

    /// A `<dd>` element. Block mode outdents the body and keeps its
    /// paragraphs. Span mode keeps only span-level markup.
    fn render(&self, inline: InlineConverter<'_>) -> String {
        let Some((&first, rest)) = self.lines.split_first() else {
            return String::new();
        };
        let prefix = marker_prefix_len(first);

        if self.block {
            let marker_line = format!("{}{}", " ".repeat(prefix), &first[prefix..]);
            let body = std::iter::once(outdent(&marker_line))
                .chain(rest.iter().map(|line| outdent(line)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("<dd>\n{}\n</dd>\n", inline.blocks(&body))
        } else {
            let content = std::iter::once(&first[prefix..])
                .chain(rest.iter().map(|line| outdent(line)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("<dd>{}</dd>\n", inline.spans(&content))
        }
    }
}

impl<'a> DefinitionList<'a> {
    /// Term groups starting at line `start`, or `None` if the first line is
    /// not followed by a definition.
    ///
    /// Groups separated only by blank lines join the same list.
    fn parse(lines: &Lines<'a>, start: usize) -> Option<Self> {
        let mut groups = Vec::new();
        let mut pos = start;
        let mut end = start;

        while let Some((terms, first_marker, first_blank)) = parse_terms(lines, pos) {
            let mut definitions = Vec::new();
            let mut marker = first_marker;
            let mut leading_blank = first_blank;

            loop {
                let (definition, def_end) = Definition::parse(lines, marker, leading_blank);
                definitions.push(definition);
                end = def_end;

                let mut next = def_end;
                while next < lines.len() && lines.is_blank(next) {
                    next += 1;
                }
                if next < lines.len() && is_definition_marker(lines.get(next)) {
                    leading_blank = next > def_end;
                    marker = next;
                    continue;
                }
                pos = next;
                break;
            }

            groups.push(TermGroup { terms, definitions });
            if pos == end {
                break;
            }
        }

        (!groups.is_empty()).then_some(Self { groups, end })
    }

    fn render(&self, inline: InlineConverter<'_>) -> String {
        let mut html = String::from("<dl>\n");
        for group in &self.groups {
            for term in &group.terms {
                let _ = writeln!(html, "<dt>{}</dt>", inline.spans(term.trim()));
            }
            for definition in &group.definitions {
                html.push_str(&definition.render(inline));
            }
        }
        html.push_str("</dl>\n");
        html
    }
}

/// Term lines starting at `start`, followed by the first definition marker.
///
/// Terms stop at a blank line, a marker, a placeholder or an opaque line. At
/// most one blank line may separate the last term from its marker.
///
/// Returns the terms, the marker line index and whether a blank line
/// separates them.
fn parse_terms<'a>(lines: &Lines<'a>, start: usize) -> Option<(Vec<&'a str>, usize, bool)> {
    if start >= lines.len() || leading_spaces(lines.get(start)) > 3 {
        return None;
    }

    let mut idx = start;
    while idx < lines.len() && !lines.is_opaque(idx) && is_term_line(lines.get(idx)) {
        idx += 1;
    }
    if idx == start {
        return None;
    }

    let terms = (start..idx).map(|i| lines.get(i)).collect();
    let leading_blank = idx < lines.len() && lines.is_blank(idx);
    let marker = if leading_blank { idx + 1 } else { idx };

    (marker < lines.len() && !lines.is_opaque(marker) && is_definition_marker(lines.get(marker)))
        .then_some((terms, marker, leading_blank))
}

/// Replace every definition list with a placeholder.
pub(crate) fn definition_lists(text: &str, ctx: &mut MatchContext<'_>) -> String {
    let lines = Lines::new(text);
    let mut writer = LineWriter::with_capacity(text.len());
    let mut idx = 0;

    while idx < lines.len() {
        let at_block_start = idx == 0 || lines.is_blank(idx - 1);
        if at_block_start && let Some(list) = DefinitionList::parse(&lines, idx) {
            let html = list.render(ctx.inline);
            writer.push_block(&ctx.store.hash_block(html));
            idx = list.end;
            continue;
        }

        writer.push_line(&lines, idx);
        idx += 1;
    }

    writer.finish()
}
