//! Leave only the bundle in the destination directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Remove every entry of `destination` except `keep`. Directories are removed
/// recursively; symlinks are removed, not followed. Returns the number of entries removed.
pub fn cleanup(destination: &Path, keep: &str) -> Result<usize> {
    let entries = fs::read_dir(destination)
        .with_context(|| format!("read {}", destination.display()))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.with_context(|| format!("scan {}", destination.display()))?;
        if entry.file_name() == keep {
            continue;
        }
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .with_context(|| format!("stat {}", path.display()))?
            .is_dir();
        let res = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        res.with_context(|| format!("remove {}", path.display()))?;
        tracing::debug!("removed {}", path.display());
        removed += 1;
    }
    Ok(removed)
}
