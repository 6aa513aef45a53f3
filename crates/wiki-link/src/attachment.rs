//! Attachment existence checks behind a storage seam.

use std::path::PathBuf;

/// Existence check for files referenced through the `attachment:` namespace.
///
/// The resolver's only I/O goes through this trait, so conversions can run
/// against a test double instead of the filesystem.
pub trait AttachmentStore: Send + Sync {
    /// Whether `name` exists under `book`'s attachment directory.
    fn exists(&self, book: &str, name: &str) -> bool;
}

/// Filesystem-backed store laid out as `{root}/{book}/{name}`.
#[derive(Clone, Debug)]
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AttachmentStore for FsAttachmentStore {
    fn exists(&self, book: &str, name: &str) -> bool {
        self.root.join(book).join(name).is_file()
    }
}
