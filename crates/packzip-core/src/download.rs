//! Download phase: fetch the latest archive of every pack into the destination.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::scope::{pack_prefix, BuildScope};
use crate::select::{latest_version_blob, version_of_blob};
use crate::store::ObjectStore;

/// A pack archive on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedPack {
    pub name: String,
    /// `<destination>/<name>.zip`.
    pub path: PathBuf,
    /// Version directory the archive came from.
    pub version: String,
    pub bytes: u64,
}

/// Local file name for a pack's archive, also its entry name in the bundle.
pub fn pack_file_name(pack: &str) -> String {
    format!("{}.zip", pack)
}

/// For each pack, list its uploads and download the newest zip.
///
/// Packs with nothing uploaded are skipped. The first listing or download
/// failure aborts the phase.
pub fn download_packs<S: ObjectStore + ?Sized>(
    store: &mut S,
    pack_names: &[String],
    storage_base_path: &str,
    scope: &BuildScope,
    destination: &Path,
) -> Result<Vec<DownloadedPack>> {
    let mut downloaded = Vec::new();
    for pack in pack_names {
        let prefix = pack_prefix(storage_base_path, scope, pack);
        let blobs = store
            .list_blobs(&prefix)
            .with_context(|| format!("list objects under {}", prefix))?;
        if blobs.is_empty() {
            tracing::debug!("pack {} not found under {}", pack, prefix);
            continue;
        }
        let Some(blob) = latest_version_blob(&blobs) else {
            tracing::warn!(
                "pack {}: {} object(s) under {} but no .zip archive",
                pack,
                blobs.len(),
                prefix
            );
            continue;
        };

        let path = destination.join(pack_file_name(pack));
        let version = version_of_blob(&blob.name).to_string();
        tracing::info!("downloading pack {} version {} from {}", pack, version, blob.name);
        let bytes = store
            .download_to_path(blob, &path)
            .with_context(|| format!("download {} to {}", blob.name, path.display()))?;

        downloaded.push(DownloadedPack {
            name: pack.clone(),
            path,
            version,
            bytes,
        });
    }
    Ok(downloaded)
}
