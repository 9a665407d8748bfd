//! Triple-backtick fenced code blocks.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::escape::restore_in_code;
use crate::fence;
use crate::lines::{LineWriter, Lines};
use crate::options::Highlighter;
use crate::processor::MatchContext;

/// Replace every closed fenced block with a placeholder.
pub(crate) fn fenced_code_blocks(text: &str, ctx: &mut MatchContext<'_>) -> String {
    let lines = Lines::new(text);
    let mut writer = LineWriter::with_capacity(text.len());
    let mut idx = 0;

    while idx < lines.len() {
        if !lines.is_html(idx)
            && !lines.is_code(idx)
            && let Some(info) = fence::opening_info(lines.get(idx))
            && let Some(close) = fence::find_closing(&lines, idx)
        {
            let body = (idx + 1..close)
                .map(|i| lines.get(i))
                .collect::<Vec<_>>()
                .join("\n");
            let html = render_code_block(info.trim(), &body, ctx.options.highlighter);
            writer.push_block(&ctx.store.hash_block(html));
            idx = close + 1;
            continue;
        }

        writer.push_line(&lines, idx);
        idx += 1;
    }

    writer.finish()
}

/// Render a code block body with the class conventions of `highlighter`.
///
/// The body is never treated as markdown: only `&`, `<` and `>` are escaped.
///
/// # Example
///
/// ```
/// use mdextra::{Highlighter, render_code_block};
///
/// assert_eq!(
///     render_code_block("rust", "a < b", Highlighter::Prettify),
///     r#"<pre class="prettyprint"><code class="language-rust">a &lt; b</code></pre>"#
/// );
/// ```
#[must_use]
pub fn render_code_block(language: &str, body: &str, highlighter: Highlighter) -> String {
    let language = (!language.is_empty()).then(|| encode_double_quoted_attribute(language));

    let pre_class = match highlighter {
        Highlighter::Prettify => r#" class="prettyprint""#,
        Highlighter::None | Highlighter::HighlightJs => "",
    };
    let code_class = match (language, highlighter) {
        (Some(lang), Highlighter::None) => format!(r#" class="{lang}""#),
        (Some(lang), Highlighter::Prettify | Highlighter::HighlightJs) => {
            format!(r#" class="language-{lang}""#)
        }
        (None, _) => String::new(),
    };
    let body = restore_in_code(body);

    format!(
        "<pre{pre_class}><code{code_class}>{}</code></pre>",
        encode_text(&body)
    )
}
