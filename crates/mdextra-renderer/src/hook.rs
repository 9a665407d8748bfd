//! Conversion hook contract.

/// Boxed error reported by a hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Callbacks run by a [`Converter`](crate::Converter) around baseline rendering.
///
/// Both methods transform their buffer in place. Hooks run in registration
/// order, and every hook sees the output of the previous one.
pub trait ConversionHook {
    /// Transform markdown text before block-level conversion.
    fn pre_block_gamut(&mut self, _text: &mut String) {}

    /// Transform the HTML after full conversion (and sanitization).
    fn post_conversion(&mut self, _html: &mut String) -> Result<(), HookError> {
        Ok(())
    }
}
