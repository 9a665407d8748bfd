//! Error types for option parsing and placeholder resolution.

/// Error produced by the extension pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtraError {
    /// An extension name that matches no construct.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
    /// A highlighter name that matches no mode.
    #[error("unknown highlighter: {0}")]
    UnknownHighlighter(String),
    /// A block placeholder with no stored fragment.
    #[error("unresolved placeholder {marker}")]
    UnresolvedPlaceholder {
        /// The marker text found in the output.
        marker: String,
    },
    /// An attribute marker with no stored attribute list.
    #[error("unresolved attribute marker {marker}")]
    UnresolvedAttributes {
        /// The marker text found in the output.
        marker: String,
    },
}
