//! Canonical URL rendering for resolved page references.

use crate::page_ref::{HOMEPAGE, PageContext, PageRef};
use crate::paths::SitePaths;
use crate::slug::webalize_path;

/// Render the canonical URL for `page`.
///
/// References within the current book produce a relative URL (no scheme or
/// host); everything else gets an absolute `http://` URL on a subdomain of
/// the configured apex domain, with the `www` book living on the apex
/// itself. A `-`-suffixed book version ("doc-2.0") becomes a path segment
/// after the language.
///
/// Performs no I/O and never fails: odd inputs (empty book, malformed
/// domain) yield syntactically odd but harmless URLs.
#[must_use]
pub fn build_url(page: &PageRef, current: &PageContext, paths: &SitePaths) -> String {
    let (base_book, version) = match page.book.split_once('-') {
        Some((base, version)) => (base, Some(version)),
        None => (page.book.as_str(), None),
    };
    let name = webalize_path(&page.name);

    let mut url = String::new();
    if page.book != current.book {
        url.push_str("http://");
        if base_book != "www" {
            url.push_str(base_book);
            url.push('.');
        }
        url.push_str(&paths.domain);
    }
    url.push('/');
    url.push_str(&page.lang);
    url.push('/');
    if let Some(version) = version {
        url.push_str(version);
        url.push('/');
    }
    if name != HOMEPAGE {
        url.push_str(&name);
    }
    if let Some(fragment) = &page.fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
