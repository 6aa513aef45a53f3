//! URL-safe slugs ("webalization") for anchors, page names and heading ids.

use deunicode::deunicode;

/// Convert free text into a URL-safe slug.
///
/// Transliterates to ASCII, lowercases, collapses every run of other
/// characters into a single `-` and drops separators at both ends.
/// Idempotent: `webalize(webalize(s)) == webalize(s)`.
///
/// # Examples
///
/// ```
/// use wiki_link::webalize;
///
/// assert_eq!(webalize("Setup Guide"), "setup-guide");
/// assert_eq!(webalize("Žluťoučký kůň"), "zlutoucky-kun");
/// assert_eq!(webalize("#anchors & such"), "anchors-such");
/// ```
#[must_use]
pub fn webalize(text: &str) -> String {
    webalize_impl(text, false)
}

/// Like [`webalize`], but `/` is kept as-is so multi-segment page names
/// survive with each segment slugged individually.
///
/// # Examples
///
/// ```
/// use wiki_link::webalize_path;
///
/// assert_eq!(webalize_path("Guide/Quick Start"), "guide/quick-start");
/// ```
#[must_use]
pub fn webalize_path(text: &str) -> String {
    webalize_impl(text, true)
}

fn webalize_impl(text: &str, keep_slash: bool) -> String {
    let ascii = deunicode(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || (keep_slash && c == '/') {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_webalize() {
        assert_eq!(webalize("Hello World"), "hello-world");
        assert_eq!(webalize("What's New?"), "what-s-new");
        assert_eq!(webalize("  Spaces  "), "spaces");
        assert_eq!(webalize("kebab-case"), "kebab-case");
        assert_eq!(webalize(""), "");
        assert_eq!(webalize("---"), "");
    }

    #[test]
    fn test_webalize_transliterates() {
        assert_eq!(webalize("Černý čaj"), "cerny-caj");
        assert_eq!(webalize("Über uns"), "uber-uns");
    }

    #[test]
    fn test_webalize_path_keeps_slashes() {
        assert_eq!(webalize_path("a b/c d"), "a-b/c-d");
        assert_eq!(webalize_path("guide/setup"), "guide/setup");
        // Separator runs adjacent to a kept slash still collapse to one dash.
        assert_eq!(webalize_path("x /y"), "x-/y");
    }

    #[test]
    fn test_webalize_is_idempotent() {
        for s in ["Setup Guide", "x /y", "Černý čaj", "--a--b--", "a/b c"] {
            assert_eq!(webalize(&webalize(s)), webalize(s));
            assert_eq!(webalize_path(&webalize_path(s)), webalize_path(s));
        }
    }

    #[test]
    fn test_webalize_strips_slash_without_keep() {
        assert_eq!(webalize("a/b"), "a-b");
    }
}
