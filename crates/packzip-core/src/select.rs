//! Pick the newest pack archive among a pack's blobs.
//!
//! Pack uploads live at `<prefix>/<version>/<Pack>.zip`; the version is the
//! name of the directory holding the zip.

use crate::store::Blob;
use crate::version::LooseVersion;

/// Version directory of an object name: basename of its parent.
///
/// `content/packs/Base/1.2.3/Base.zip` → `1.2.3`; a top-level object has none.
pub fn version_of_blob(name: &str) -> &str {
    match name.rsplit_once('/') {
        Some((parent, _)) => parent.rsplit('/').next().unwrap_or(parent),
        None => "",
    }
}

/// The `.zip` blob with the highest loose version, or `None` if there is no zip.
/// On equal versions the first listed blob is kept.
pub fn latest_version_blob(blobs: &[Blob]) -> Option<&Blob> {
    let mut best: Option<(LooseVersion, &Blob)> = None;
    for blob in blobs.iter().filter(|b| b.name.ends_with(".zip")) {
        let version = LooseVersion::parse(version_of_blob(&blob.name));
        let newer = match &best {
            Some((current, _)) => version > *current,
            None => true,
        };
        if newer {
            best = Some((version, blob));
        }
    }
    best.map(|(_, blob)| blob)
}
