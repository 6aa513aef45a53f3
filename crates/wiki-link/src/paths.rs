//! Site-level path configuration for URL formatting.

use std::path::PathBuf;

/// Opaque paths and base URLs used when formatting special-namespace links.
///
/// Supplied once per conversion run and read-only for its duration. The
/// values carry no semantics beyond string concatenation; the `wiki-config`
/// crate loads them from `wiki.toml`.
#[derive(Clone, Debug, Default)]
pub struct SitePaths {
    /// Public base URL for uploaded media; attachment links are served from
    /// `{media_url}/{book}/{name}`.
    pub media_url: String,
    /// Filesystem root backing the attachment existence check, laid out as
    /// `{attachment_dir}/{book}/{name}`.
    pub attachment_dir: PathBuf,
    /// Base URL of the generated API reference.
    pub api_url: String,
    /// Base URL for downloadable release files.
    pub download_url: String,
    /// Apex domain for absolute cross-book URLs (e.g. "example.org").
    pub domain: String,
    /// Prefix for user profile URLs; the numeric user id is appended.
    pub profile_url: String,
}
