//! Pack discovery: every entry of the local packs directory names a pack.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Entries of `packs_dir` not in `ignored`, sorted by name.
pub fn list_pack_names(packs_dir: &Path, ignored: &[String]) -> Result<Vec<String>> {
    let entries = fs::read_dir(packs_dir)
        .with_context(|| format!("read packs directory {}", packs_dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("scan {}", packs_dir.display()))?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!("skipping non-UTF-8 pack entry {:?}", raw);
                continue;
            }
        };
        if ignored.iter().any(|i| *i == name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
