//! The whole run: discover packs, download the latest of each, bundle, clean up.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::archive::zip_packs;
use crate::checksum::{digest_file, FileDigest};
use crate::cleanup::cleanup;
use crate::config::PackzipConfig;
use crate::download::{download_packs, DownloadedPack};
use crate::packs::list_pack_names;
use crate::scope::BuildScope;
use crate::store::ObjectStore;

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the packs are downloaded to and the bundle is written in.
    pub destination: PathBuf,
    pub packs_dir: PathBuf,
    pub ignored_packs: Vec<String>,
    pub storage_base_path: String,
    pub artifact_name: String,
    pub scope: BuildScope,
}

impl RunOptions {
    pub fn from_config(cfg: &PackzipConfig, destination: PathBuf, scope: BuildScope) -> Self {
        Self {
            destination,
            packs_dir: cfg.packs_dir.clone(),
            ignored_packs: cfg.ignored_packs.clone(),
            storage_base_path: cfg.storage_base_path.clone(),
            artifact_name: cfg.artifact_name.clone(),
            scope,
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.destination.join(&self.artifact_name)
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub success: bool,
    /// Packs that were downloaded (and, on success, bundled).
    pub packs: Vec<DownloadedPack>,
    /// The bundle, if one was written.
    pub artifact: Option<PathBuf>,
    pub digest: Option<FileDigest>,
    /// Entries removed from the destination by cleanup.
    pub removed: usize,
}

fn download_phase<S: ObjectStore + ?Sized>(
    opts: &RunOptions,
    store: &mut S,
) -> Result<Vec<DownloadedPack>> {
    let pack_names = list_pack_names(&opts.packs_dir, &opts.ignored_packs)?;
    tracing::info!(
        "{} pack(s) in {}",
        pack_names.len(),
        opts.packs_dir.display()
    );
    fs::create_dir_all(&opts.destination)
        .with_context(|| format!("create {}", opts.destination.display()))?;
    download_packs(
        store,
        &pack_names,
        &opts.storage_base_path,
        &opts.scope,
        &opts.destination,
    )
}

/// Run the pipeline. Errors are logged and folded into `RunOutcome::success`;
/// cleanup runs regardless of outcome.
pub fn run<S: ObjectStore + ?Sized>(opts: &RunOptions, store: &mut S) -> RunOutcome {
    let mut outcome = RunOutcome {
        success: true,
        ..RunOutcome::default()
    };

    match download_phase(opts, store) {
        Ok(packs) => outcome.packs = packs,
        Err(e) => {
            tracing::error!("failed downloading packs: {:#}", e);
            outcome.success = false;
        }
    }

    if !outcome.packs.is_empty() {
        outcome.success = zip_packs(&outcome.packs, &opts.destination, &opts.artifact_name);
        let artifact = opts.artifact_path();
        if artifact.is_file() {
            outcome.artifact = Some(artifact);
        }
    } else if outcome.success {
        tracing::warn!("no pack archives found for {:?}; nothing to zip", opts.scope);
    }

    if outcome.success {
        if let Some(artifact) = &outcome.artifact {
            match digest_file(artifact) {
                Ok(d) => {
                    tracing::info!("{} sha256={} bytes={}", artifact.display(), d.sha256, d.bytes);
                    outcome.digest = Some(d);
                }
                Err(e) => tracing::warn!("could not hash {}: {:#}", artifact.display(), e),
            }
        }
    }

    match cleanup(&opts.destination, &opts.artifact_name) {
        Ok(removed) => outcome.removed = removed,
        Err(e) => {
            tracing::error!("cleanup failed: {:#}", e);
            outcome.success = false;
        }
    }

    outcome
}
