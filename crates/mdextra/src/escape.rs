//! Escaped delimiter normalization.
//!
//! Block matchers split on `|` and look for `:` markers. Author-escaped
//! delimiters are turned into numeric character references before any
//! matcher runs so they can never act as delimiters.

/// Replace `\|` with `&#124;` and `\:` with `&#58;`.
///
/// No other character is touched, and the backslash itself is not treated
/// as escapable, so `\\|` becomes `\&#124;`.
///
/// # Example
///
/// ```
/// use mdextra::normalize_escapes;
///
/// assert_eq!(normalize_escapes(r"a \| b \: c"), "a &#124; b &#58; c");
/// ```
#[must_use]
pub fn normalize_escapes(text: &str) -> String {
    text.replace(r"\|", "&#124;").replace(r"\:", "&#58;")
}

/// Undo [`normalize_escapes`] inside code, which is never markdown.
pub(crate) fn restore_in_code(code: &str) -> String {
    code.replace("&#124;", r"\|").replace("&#58;", r"\:")
}
