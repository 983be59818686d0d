//! Object-store access: the `ObjectStore` seam and its Google Cloud Storage implementation.

mod error;
mod gcs;
pub(crate) mod transport;

use std::path::{Path, PathBuf};

pub use error::StoreError;
pub use gcs::GcsStore;

/// One object in the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Full object name, e.g. `content/packs/Base/1.2.3/Base.zip`.
    pub name: String,
    /// Size in bytes when the listing reported it.
    pub size: Option<u64>,
    /// Direct download URL from the listing.
    pub media_link: Option<String>,
    pub generation: Option<String>,
}

impl Blob {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            media_link: None,
            generation: None,
        }
    }
}

/// Read access to a bucket. Calls are sequential; implementations may keep
/// mutable state such as cached access tokens.
pub trait ObjectStore {
    /// All objects whose name starts with `prefix`.
    fn list_blobs(&mut self, prefix: &str) -> Result<Vec<Blob>, StoreError>;

    /// Download `blob` to `dest`, replacing any existing file. Returns bytes written.
    fn download_to_path(&mut self, blob: &Blob, dest: &Path) -> Result<u64, StoreError>;
}

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
