//! Wiki document conversion: lightweight markup to HTML for a
//! multi-language, multi-book wiki.
//!
//! [`Convertor`] runs one document through three passes: `{{command}}`
//! script extraction, markdown rendering with every link routed through the
//! `wiki-link` resolver, and table-of-contents assembly. Alongside the HTML
//! it accumulates the session's bookkeeping (resolved cross-page links,
//! language variants, tags) and a non-fatal error list that never
//! interrupts conversion.
//!
//! # Example
//!
//! ```
//! use wiki_convert::Convertor;
//!
//! let convertor = Convertor::new("doc", "en", "guide/setup");
//! let result = convertor.convert("# Setup\n\nSee [the tutorial](tutorial).");
//!
//! assert_eq!(result.title.as_deref(), Some("Setup"));
//! assert!(result.html.contains(r#"<a href="/en/guide/tutorial">"#));
//! ```

mod code_block;
mod convertor;
mod renderer;
mod script;
mod toc;

pub use code_block::Highlighter;
pub use convertor::{ConvertResult, Convertor};
pub use renderer::escape_html;
pub use toc::{TocEntry, TocMode};
