//! Baseline and hooked markdown converters.

use std::fmt;

use pulldown_cmark::{Options, Parser, html};

use crate::error::ConvertError;
use crate::hook::ConversionHook;
use crate::sanitize::sanitize_html;

/// Converts a markdown fragment to HTML.
pub trait MarkdownConverter {
    /// Render `markdown` to HTML.
    fn make_html(&self, markdown: &str) -> String;
}

/// Plain `CommonMark` converter.
///
/// Only core syntax is enabled: no tables, no definition lists, no heading
/// attributes and no strikethrough. A sanitizing converter additionally
/// strips every tag outside a basic whitelist from its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaselineConverter {
    sanitize: bool,
}

impl BaselineConverter {
    /// Create a converter that passes raw HTML through.
    #[must_use]
    pub fn new() -> Self {
        Self { sanitize: false }
    }

    /// Create a converter that sanitizes its output.
    #[must_use]
    pub fn sanitizing() -> Self {
        Self { sanitize: true }
    }

    /// Whether output is sanitized.
    #[must_use]
    pub fn is_sanitizing(&self) -> bool {
        self.sanitize
    }
}

impl MarkdownConverter for BaselineConverter {
    fn make_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::empty());
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);

        if self.sanitize {
            sanitize_html(&output)
        } else {
            output
        }
    }
}

/// Host converter: a [`BaselineConverter`] plus an ordered hook chain.
///
/// # Conversion steps
///
/// 1. Line endings are normalized to `\n`.
/// 2. `~T` and `~X` in author text are guarded as `~TT` and `~TX`, so author
///    text can never spell a `~X` placeholder.
/// 3. `"\n\n"` is appended.
/// 4. Every hook's [`pre_block_gamut`](ConversionHook::pre_block_gamut) runs.
/// 5. The text is rendered (and sanitized, for a sanitizing converter).
/// 6. Every hook's [`post_conversion`](ConversionHook::post_conversion) runs.
/// 7. The guard from step 2 is removed.
#[derive(Default)]
pub struct Converter {
    baseline: BaselineConverter,
    hooks: Vec<Box<dyn ConversionHook>>,
}

impl Converter {
    /// Create a converter that passes raw HTML through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter that sanitizes the rendered document.
    #[must_use]
    pub fn sanitizing() -> Self {
        Self {
            baseline: BaselineConverter::sanitizing(),
            hooks: Vec::new(),
        }
    }

    /// Append a hook to the chain.
    pub fn chain(&mut self, hook: impl ConversionHook + 'static) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The baseline converter used for step 5.
    #[must_use]
    pub fn baseline(&self) -> BaselineConverter {
        self.baseline
    }

    /// Convert a markdown document to HTML, running every registered hook.
    pub fn make_html(&mut self, markdown: &str) -> Result<String, ConvertError> {
        let mut text = guard_markers(&normalize_newlines(markdown));
        text.push_str("\n\n");

        for hook in &mut self.hooks {
            hook.pre_block_gamut(&mut text);
        }

        let mut html = self.baseline.make_html(&text);

        for hook in &mut self.hooks {
            hook.post_conversion(&mut html).map_err(ConvertError::Hook)?;
        }

        tracing::trace!(
            hooks = self.hooks.len(),
            input_len = markdown.len(),
            output_len = html.len(),
            "Converted document"
        );

        Ok(unguard_markers(&html))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("baseline", &self.baseline)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Guard `~T` and `~X` so author text cannot collide with placeholders.
fn guard_markers(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        output.push(c);
        if c == '~' && matches!(chars.peek(), Some('T' | 'X')) {
            output.push('T');
        }
    }
    output
}

fn unguard_markers(html: &str) -> String {
    html.replace("~T", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::HookError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Hook that records what it sees and appends a tag to each buffer.
    struct Recorder {
        name: &'static str,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl ConversionHook for Recorder {
        fn pre_block_gamut(&mut self, text: &mut String) {
            self.seen.borrow_mut().push(format!("pre {}: {text:?}", self.name));
        }

        fn post_conversion(&mut self, html: &mut String) -> Result<(), HookError> {
            self.seen.borrow_mut().push(format!("post {}", self.name));
            html.push_str(self.name);
            Ok(())
        }
    }

    struct Failing;

    impl ConversionHook for Failing {
        fn post_conversion(&mut self, _html: &mut String) -> Result<(), HookError> {
            Err("broken".into())
        }
    }

    #[test]
    fn test_baseline_renders_paragraph() {
        assert_eq!(BaselineConverter::new().make_html("hello"), "<p>hello</p>\n");
    }

    #[test]
    fn test_baseline_has_no_tables() {
        let html = BaselineConverter::new().make_html("a | b\n--|--\n1 | 2\n");
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_baseline_passes_raw_html() {
        let html = BaselineConverter::new().make_html("<script>x()</script>\n");
        assert!(html.contains("<script>"));
    }

    #[test]
    fn test_sanitizing_baseline_strips_script() {
        let html = BaselineConverter::sanitizing().make_html("<script>x()</script>\n\nhi");
        assert!(!html.contains("script"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut converter = Converter::new();
        converter
            .chain(Recorder {
                name: "a",
                seen: Rc::clone(&seen),
            })
            .chain(Recorder {
                name: "b",
                seen: Rc::clone(&seen),
            });

        let html = converter.make_html("x").unwrap();

        assert_eq!(html, "<p>x</p>\nab");
        assert_eq!(
            *seen.borrow(),
            vec![
                r#"pre a: "x\n\n""#.to_owned(),
                r#"pre b: "x\n\n""#.to_owned(),
                "post a".to_owned(),
                "post b".to_owned(),
            ]
        );
    }

    #[test]
    fn test_crlf_normalized_before_hooks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut converter = Converter::new();
        converter.chain(Recorder {
            name: "a",
            seen: Rc::clone(&seen),
        });

        converter.make_html("a\r\nb\rc").unwrap();

        assert_eq!(seen.borrow()[0], r#"pre a: "a\nb\nc\n\n""#);
    }

    #[test]
    fn test_placeholder_syntax_guarded_from_hooks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut converter = Converter::new();
        converter.chain(Recorder {
            name: "",
            seen: Rc::clone(&seen),
        });

        let html = converter.make_html("~X0X and ~T").unwrap();

        assert_eq!(seen.borrow()[0], r#"pre : "~TX0X and ~TT\n\n""#);
        assert_eq!(html, "<p>~X0X and ~T</p>\n");
    }

    #[test]
    fn test_tilde_fence_unaffected_by_guard() {
        let html = Converter::new().make_html("~~~\ncode\n~~~").unwrap();
        assert_eq!(html, "<pre><code>code\n</code></pre>\n");
    }

    #[test]
    fn test_hook_error_is_reported() {
        let mut converter = Converter::new();
        converter.chain(Failing);

        let err = converter.make_html("x").unwrap_err();

        assert!(matches!(err, ConvertError::Hook(_)));
        assert_eq!(err.to_string(), "post-conversion hook failed: broken");
    }

    #[test]
    fn test_guard_roundtrip() {
        for text in ["~", "~~", "~T", "~TX", "~X~X", "a~Tb~Xc", "~~~X"] {
            assert_eq!(unguard_markers(&guard_markers(text)), text);
        }
    }
}
