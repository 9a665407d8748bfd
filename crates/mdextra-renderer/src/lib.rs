//! Baseline markdown converter with pluggable conversion hooks.
//!
//! This crate provides the host side of an extension pipeline:
//! - [`BaselineConverter`]: plain `CommonMark` rendering via pulldown-cmark,
//!   optionally sanitized down to a basic tag whitelist
//! - [`ConversionHook`]: a pair of callbacks run before block conversion and
//!   after full conversion
//! - [`Converter`]: a baseline converter plus an ordered chain of hooks
//!
//! # Example
//!
//! ```
//! use mdextra_renderer::{ConversionHook, Converter, HookError};
//!
//! struct Shout;
//!
//! impl ConversionHook for Shout {
//!     fn post_conversion(&mut self, html: &mut String) -> Result<(), HookError> {
//!         *html = html.to_uppercase();
//!         Ok(())
//!     }
//! }
//!
//! let mut converter = Converter::new();
//! converter.chain(Shout);
//! let html = converter.make_html("hello").unwrap();
//! assert_eq!(html.trim(), "<P>HELLO</P>");
//! ```

mod converter;
mod error;
mod hook;
mod sanitize;

pub use converter::{BaselineConverter, Converter, MarkdownConverter};
pub use error::ConvertError;
pub use hook::{ConversionHook, HookError};
pub use sanitize::sanitize_html;
