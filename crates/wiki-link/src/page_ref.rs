//! Page identity types shared by the resolver and the URL builder.

use crate::slug::webalize_path;

/// Sentinel page name for a book's landing page.
///
/// An empty or `/`-only name collapses to this value during resolution, and
/// [`build_url`](crate::build_url) renders it as the bare book root.
pub const HOMEPAGE: &str = "homepage";

/// Identifies a wiki page by book, language, name and optional fragment.
///
/// Produced by [`LinkResolver::resolve`](crate::LinkResolver::resolve) for
/// ordinary (non-pseudo-book) references. `book` and `lang` are never empty:
/// missing qualifiers are substituted from the current page context before a
/// reference leaves the resolver. `name` never contains `:` (converted to
/// `/`) and carries no leading or trailing slash.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRef {
    /// Content collection the page belongs to (e.g. "doc", "www").
    pub book: String,
    /// Two-letter language code.
    pub lang: String,
    /// Slash-separated path within the book; [`HOMEPAGE`] for the book root.
    pub name: String,
    /// Anchor id within the page, already `toc-` prefixed.
    pub fragment: Option<String>,
}

impl PageRef {
    /// Create a reference from already-normalized parts.
    #[must_use]
    pub fn new(
        book: impl Into<String>,
        lang: impl Into<String>,
        name: impl Into<String>,
        fragment: Option<String>,
    ) -> Self {
        Self {
            book: book.into(),
            lang: lang.into(),
            name: name.into(),
            fragment,
        }
    }

    /// Copy of this reference for cross-reference bookkeeping: the name is
    /// webalized with slashes preserved and the fragment is cleared.
    ///
    /// The original reference stays untouched so the URL built from it keeps
    /// the authored name and anchor.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            book: self.book.clone(),
            lang: self.lang.clone(),
            name: webalize_path(&self.name),
            fragment: None,
        }
    }
}

/// The page currently being converted.
///
/// Supplies the defaults for unqualified link tokens and the base directory
/// for relative-name expansion. Immutable for the duration of one document's
/// conversion.
#[derive(Clone, Debug)]
pub struct PageContext {
    /// Book of the current page.
    pub book: String,
    /// Language of the current page.
    pub lang: String,
    /// Name of the current page within its book.
    pub name: String,
}

impl PageContext {
    /// Create a context for the page being converted.
    #[must_use]
    pub fn new(book: impl Into<String>, lang: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            lang: lang.into(),
            name: name.into(),
        }
    }
}

/// Outcome of resolving a raw link token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Final URL string, used verbatim as href/src.
    Url(String),
    /// Internal page reference, rendered by [`build_url`](crate::build_url).
    Page(PageRef),
}

impl Resolved {
    /// Get the page reference if this resolved to an internal page.
    #[must_use]
    pub fn as_page(&self) -> Option<&PageRef> {
        match self {
            Self::Page(page) => Some(page),
            Self::Url(_) => None,
        }
    }

    /// Get the URL if this resolved to a plain string.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Page(_) => None,
        }
    }
}
