//! Raw link token classification and namespace dispatch.
//!
//! A token is classified by an ordered chain (external link, same-page
//! anchor, structured wiki reference, literal pass-through) and structured
//! references are then dispatched on the [`Namespace`] of their resolved
//! book. The structured grammar is `[book:][[:/]lang][name][#section]`:
//! `book` is 3+ lowercase letters with an optional `-D.D` version suffix,
//! `lang` is exactly two lowercase letters immediately followed by `:`, `/`,
//! `#` or the end, `name` runs to the first `#` and `section` is the rest.

use std::sync::LazyLock;

use regex::Regex;

use crate::attachment::AttachmentStore;
use crate::page_ref::{HOMEPAGE, PageContext, PageRef, Resolved};
use crate::paths::SitePaths;
use crate::percent::form_urlencode;
use crate::slug::webalize;

/// External links: an `@` preceded by at least one character, or a known
/// scheme, or a bare `ftp.`/`www.` host.
static EXTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[^\n]+@|https?:|ftp:|mailto:|ftp\.|www\.)").unwrap()
});

/// Closed set of pseudo-books with special URL formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// Release files under the download directory.
    Download,
    /// Uploaded files served from the media URL.
    Attachment,
    /// Generated API reference (code-symbol locator, not a page path).
    Api,
    /// Forum user profiles addressed by numeric id.
    User,
    /// Entries in the php.net manual.
    Php,
    /// Any regular content book.
    Ordinary,
}

impl Namespace {
    /// Classify a resolved book name.
    #[must_use]
    pub fn of(book: &str) -> Self {
        match book {
            "download" => Self::Download,
            "attachment" => Self::Attachment,
            "api" => Self::Api,
            "user" => Self::User,
            "php" => Self::Php,
            _ => Self::Ordinary,
        }
    }
}

/// Captures of the structured reference grammar, borrowed from the token.
struct RawLink<'t> {
    book: Option<&'t str>,
    lang: Option<&'t str>,
    /// Name exactly as authored; the api/user/php namespaces format from
    /// this capture while everything else uses the normalized form.
    name: &'t str,
    section: Option<&'t str>,
}

impl<'t> RawLink<'t> {
    /// Parse `[book:][[:/]lang][name][#section]`.
    ///
    /// Returns `None` only when the token cannot match the grammar, which
    /// happens when the section spans a line break.
    fn parse(token: &'t str) -> Option<Self> {
        let (head, section) = match token.split_once('#') {
            Some((head, section)) => (head, Some(section)),
            None => (token, None),
        };
        if section.is_some_and(|s| s.contains('\n')) {
            return None;
        }

        let mut rest = head;
        let mut book = None;
        if let Some((candidate, after)) = rest.split_once(':')
            && is_book(candidate)
        {
            book = Some(candidate);
            rest = after;
        }

        let mut lang = None;
        if let Some((code, after)) = take_lang(rest) {
            lang = Some(code);
            rest = after;
        }

        Some(Self {
            book,
            lang,
            name: rest,
            section,
        })
    }
}

/// `[a-z]{3,}` optionally suffixed `-D.D`.
fn is_book(s: &str) -> bool {
    let (letters, version) = match s.split_once('-') {
        Some((letters, version)) => (letters, Some(version)),
        None => (s, None),
    };
    if letters.len() < 3 || !letters.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    version.is_none_or(|v| {
        let v = v.as_bytes();
        v.len() == 3 && v[0].is_ascii_digit() && v[1] == b'.' && v[2].is_ascii_digit()
    })
}

/// Exactly two lowercase letters, optionally preceded by a single `:` or
/// `/`, and immediately followed by `:`, `/` or the end of the pre-fragment
/// text. Consumes nothing unless the whole pattern matches.
fn take_lang(rest: &str) -> Option<(&str, &str)> {
    let body = match rest.as_bytes().first() {
        Some(b':' | b'/') => &rest[1..],
        _ => rest,
    };
    let bytes = body.as_bytes();
    let is_code = bytes.len() >= 2
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_lowercase()
        && matches!(bytes.get(2), None | Some(b':' | b'/'));
    is_code.then(|| (&body[..2], &body[2..]))
}

/// Resolves raw link tokens against the current page and site configuration.
///
/// Pure except for the attachment existence check (behind the
/// [`AttachmentStore`] seam) and the error list passed into
/// [`resolve`](Self::resolve), which belongs to the enclosing conversion
/// session.
pub struct LinkResolver<'a> {
    current: &'a PageContext,
    paths: &'a SitePaths,
    store: &'a dyn AttachmentStore,
}

impl<'a> LinkResolver<'a> {
    /// Create a resolver for one document's conversion.
    #[must_use]
    pub fn new(
        current: &'a PageContext,
        paths: &'a SitePaths,
        store: &'a dyn AttachmentStore,
    ) -> Self {
        Self {
            current,
            paths,
            store,
        }
    }

    /// Resolve a raw link token into a URL or an internal page reference.
    ///
    /// Non-fatal problems (a missing attachment file) are appended to
    /// `errors`; tokens that match no grammar pass through unchanged with no
    /// error recorded.
    pub fn resolve(&self, token: &str, errors: &mut Vec<String>) -> Resolved {
        if EXTERNAL_RE.is_match(token) {
            return Resolved::Url(token.to_owned());
        }

        if let Some(rest) = token.strip_prefix('#') {
            // Strip an already-present prefix so re-deriving the id does not
            // double it.
            let rest = rest.strip_prefix("toc-").unwrap_or(rest);
            return Resolved::Url(format!("#toc-{}", webalize(rest)));
        }

        let Some(raw) = RawLink::parse(token) else {
            return Resolved::Url(token.to_owned());
        };

        let name = self.normalize_name(&raw);
        let book = match raw.book {
            Some(book) => book.to_owned(),
            None if self.current.book == "meta" => "www".to_owned(),
            None => self.current.book.clone(),
        };
        let lang = raw
            .lang
            .map_or_else(|| self.current.lang.clone(), str::to_owned);
        let section = raw.section.unwrap_or("");

        match Namespace::of(&book) {
            Namespace::Download => {
                Resolved::Url(format!("{}/{name}", self.paths.download_url))
            }
            Namespace::Attachment => Resolved::Url(self.attachment_url(&name, errors)),
            Namespace::Api => {
                Resolved::Url(format!("{}/{}", self.paths.api_url, api_path(raw.name)))
            }
            Namespace::User => Resolved::Url(format!(
                "{}{}",
                self.paths.profile_url,
                leading_int(raw.name)
            )),
            Namespace::Php => {
                let mut url = format!("http://php.net/{}", form_urlencode(raw.name));
                if !section.is_empty() {
                    url.push('#');
                    url.push_str(section);
                }
                Resolved::Url(url)
            }
            Namespace::Ordinary => {
                let section = section.strip_prefix("toc-").unwrap_or(section);
                let fragment =
                    (!section.is_empty()).then(|| format!("toc-{}", webalize(section)));
                Resolved::Page(PageRef::new(book, lang, name, fragment))
            }
        }
    }

    /// Resolve an image or media src: external URLs pass through, anything
    /// else is served from the current book's attachment directory, with the
    /// same missing-file check as `attachment:` links.
    pub fn resolve_media(&self, src: &str, errors: &mut Vec<String>) -> String {
        if EXTERNAL_RE.is_match(src) {
            return src.to_owned();
        }
        self.attachment_url(src, errors)
    }

    fn attachment_url(&self, name: &str, errors: &mut Vec<String>) -> String {
        if !self.store.exists(&self.current.book, name) {
            errors.push(format!("Missing file {name}"));
        }
        format!("{}/{}/{name}", self.paths.media_url, self.current.book)
    }

    /// Name normalization: colons to slashes, homepage collapse and relative
    /// expansion against the current page's directory.
    fn normalize_name(&self, raw: &RawLink<'_>) -> String {
        let mut name = raw.name.replace(':', "/");
        name.truncate(name.trim_end_matches('/').len());

        if name.is_empty() || name.to_lowercase().trim_matches('/') == HOMEPAGE {
            name = HOMEPAGE.to_owned();
        }

        // A leading slash, or an explicit book or language qualifier, forces
        // the absolute (book-root) interpretation.
        if !name.starts_with('/')
            && raw.book.is_none()
            && raw.lang.is_none()
            && let Some(slash) = self.current.name.rfind('/')
            && slash > 0
        {
            name = format!("{}{name}", &self.current.name[..=slash]);
        }

        name.trim_matches('/').to_owned()
    }
}

/// Code-symbol locator for the `api:` namespace, derived from the name
/// exactly as authored (backslashes, `::` and `()` intact).
fn api_path(name: &str) -> String {
    let path = name.replace('\\', ".");
    if path.contains("()") {
        // Method: drop the parens, anchor on the last `::`.
        let path = path.replace("()", "");
        match path.rfind("::") {
            Some(at) => format!("{}.html#_{}", &path[..at], &path[at + 2..]),
            None => path,
        }
    } else if path.contains("::") {
        // Property or constant.
        path.replace("::", ".html#")
    } else {
        // Class.
        format!("{path}.html")
    }
}

/// Integer prefix of `text` after optional whitespace and sign; anything
/// else parses to 0.
fn leading_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -value } else { value }
}
