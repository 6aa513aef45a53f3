//! Wiki link resolution and canonical URL construction.
//!
//! This crate is the link engine behind the wiki converter: it takes a raw
//! link token as authored (`en:tutorial#setup`, `api:Foo\Bar::baz()`,
//! `#Setup Guide`, `http://example.com`, bare `tutorial`) and turns it into
//! either a final URL string or a structured [`PageRef`] that
//! [`build_url`] renders into a URL.
//!
//! # Architecture
//!
//! Resolution is an ordered chain of classifiers (external link, same-page
//! anchor, structured wiki reference, literal pass-through) followed by an
//! exhaustive dispatch over the [`Namespace`] of the resolved book. The
//! resolver is pure with respect to its inputs except for the attachment
//! existence check, which goes through the [`AttachmentStore`] seam, and the
//! error list it appends to.
//!
//! # Example
//!
//! ```
//! use wiki_link::{LinkResolver, PageContext, Resolved, SitePaths, build_url};
//!
//! let current = PageContext::new("doc", "en", "guide/setup");
//! let paths = SitePaths::default();
//! let store = wiki_link::FsAttachmentStore::new(&paths.attachment_dir);
//! let resolver = LinkResolver::new(&current, &paths, &store);
//!
//! let mut errors = Vec::new();
//! match resolver.resolve("advanced#Tips", &mut errors) {
//!     Resolved::Page(page) => {
//!         assert_eq!(page.name, "guide/advanced");
//!         assert_eq!(build_url(&page, &current, &paths), "/en/guide/advanced#toc-tips");
//!     }
//!     Resolved::Url(_) => unreachable!(),
//! }
//! ```

mod attachment;
mod page_ref;
mod paths;
mod percent;
mod resolver;
mod slug;
mod url;

pub use attachment::{AttachmentStore, FsAttachmentStore};
pub use page_ref::{HOMEPAGE, PageContext, PageRef, Resolved};
pub use paths::SitePaths;
pub use resolver::{LinkResolver, Namespace};
pub use slug::{webalize, webalize_path};
pub use url::build_url;
