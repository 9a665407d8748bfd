//! Markdown Extra block constructs as conversion hooks.
//!
//! [`MarkdownExtra`] plugs into a [`mdextra_renderer::Converter`] and adds
//! the block constructs its `CommonMark` baseline does not know:
//!
//! - pipe tables with column alignment
//! - triple-backtick fenced code blocks with highlighter classes
//! - definition lists
//! - `{#id .class}` attribute lists on headers and fenced code
//!
//! # Architecture
//!
//! The instance runs as two hooks. Before block conversion it normalizes
//! escaped delimiters, then runs each enabled matcher in a fixed order.
//! Every matcher renders its construct to HTML right away, stores it in a
//! [`HashStore`] and leaves a `<p>~X0X</p>` marker in the markdown. The
//! baseline converter (and its sanitizer) pass markers through untouched.
//! After conversion the markers are swapped back for the stored HTML and
//! attribute lists are merged into their elements.
//!
//! Cell, term and definition content is converted by a separate, optionally
//! sanitizing converter owned by the instance, never by the host.
//!
//! # Example
//!
//! ```
//! use mdextra::{ExtraOptions, Highlighter, MarkdownExtra};
//! use mdextra_renderer::Converter;
//!
//! let mut converter = Converter::sanitizing();
//! MarkdownExtra::init(
//!     &mut converter,
//!     ExtraOptions::default().with_highlighter(Highlighter::HighlightJs),
//! );
//!
//! let html = converter.make_html("```rust\nfn main() {}\n```").unwrap();
//! assert_eq!(
//!     html.trim(),
//!     r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
//! );
//! ```

mod attr_list;
mod deflist;
mod error;
mod escape;
mod fence;
mod fenced;
mod hash;
mod inline;
mod lines;
mod options;
mod processor;
mod table;

pub use attr_list::AttributeList;
pub use error::ExtraError;
pub use escape::normalize_escapes;
pub use fenced::render_code_block;
pub use hash::HashStore;
pub use options::{Construct, Extensions, ExtraOptions, Highlighter};
pub use processor::MarkdownExtra;
pub use table::Alignment;
