//! Conversion error types.

use crate::hook::HookError;

/// Error returned by [`Converter::make_html`](crate::Converter::make_html).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A post-conversion hook rejected the rendered document.
    #[error("post-conversion hook failed: {0}")]
    Hook(#[source] HookError),
}
