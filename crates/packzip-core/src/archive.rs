//! Bundle the downloaded pack archives into one zip.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::download::{pack_file_name, DownloadedPack};

fn add_entries<W: Write + io::Seek>(writer: &mut ZipWriter<W>, packs: &[DownloadedPack]) -> Result<()> {
    // Pack archives are already compressed.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    for pack in packs {
        tracing::info!("zipping {}", pack.path.display());
        let mut source =
            File::open(&pack.path).with_context(|| format!("open {}", pack.path.display()))?;
        writer
            .start_file(pack_file_name(&pack.name), options)
            .with_context(|| format!("start entry for {}", pack.name))?;
        io::copy(&mut source, writer).with_context(|| format!("copy {}", pack.path.display()))?;
    }
    Ok(())
}

/// Write `<destination>/<artifact_name>` holding one `<pack>.zip` entry per pack.
///
/// Returns `false` if any entry could not be added; the archive is closed either way.
pub fn zip_packs(packs: &[DownloadedPack], destination: &Path, artifact_name: &str) -> bool {
    let artifact = destination.join(artifact_name);
    let file = match File::create(&artifact) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed creating {}: {}", artifact.display(), e);
            return false;
        }
    };

    let mut writer = ZipWriter::new(file);
    let mut success = true;
    if let Err(e) = add_entries(&mut writer, packs) {
        tracing::error!("failed adding packs to the zip file: {:#}", e);
        success = false;
    }
    if let Err(e) = writer.finish() {
        tracing::error!("failed closing {}: {}", artifact.display(), e);
        success = false;
    }
    success
}
