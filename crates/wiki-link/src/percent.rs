//! Form-style URL encoding for the php.net manual namespace.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except `[A-Za-z0-9-_.]` and the space (handled separately).
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b' ');

/// Encode a query component the way `application/x-www-form-urlencoded`
/// does: spaces become `+`, other reserved bytes are percent-escaped.
pub(crate) fn form_urlencode(text: &str) -> String {
    utf8_percent_encode(text, FORM)
        .to_string()
        .replace(' ', "+")
}
