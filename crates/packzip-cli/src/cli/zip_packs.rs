//! The zip-packs command: resolve config and credentials, run the pipeline, report.

use anyhow::{Context, Result};
use packzip_core::auth::Credentials;
use packzip_core::config::{self, PackzipConfig};
use packzip_core::pipeline::{self, RunOptions, RunOutcome};
use packzip_core::retry::RetryPolicy;
use packzip_core::scope::BuildScope;
use packzip_core::store::GcsStore;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ZipArgs {
    pub destination: PathBuf,
    pub bucket: String,
    pub branch: Option<String>,
    pub build: Option<String>,
    pub service_account: Option<PathBuf>,
    pub packs_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub(super) fn load_config(args: &ZipArgs) -> Result<PackzipConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    if let Some(dir) = &args.packs_dir {
        cfg.packs_dir = dir.clone();
    }
    Ok(cfg)
}

pub(super) fn run_options(args: &ZipArgs, cfg: &PackzipConfig) -> RunOptions {
    let scope = BuildScope::new(args.branch.as_deref(), args.build.as_deref());
    RunOptions::from_config(cfg, args.destination.clone(), scope)
}

fn report(outcome: &RunOutcome) {
    for pack in &outcome.packs {
        println!("Downloaded pack {} ({})", pack.name, pack.version);
    }
    if outcome.success {
        if let (Some(artifact), Some(digest)) = (&outcome.artifact, &outcome.digest) {
            println!("{}  {}", digest.sha256, artifact.display());
        }
        println!("Successfully zipped packs.");
    } else {
        eprintln!("Failed zipping packs.");
    }
}

/// Run the whole download-zip-cleanup procedure. Returns whether it succeeded.
pub async fn run_zip_packs(args: ZipArgs) -> Result<bool> {
    let cfg = load_config(&args)?;
    tracing::debug!("loaded config: {:?}", cfg);

    let credentials = Credentials::resolve(args.service_account.as_deref())
        .context("initialize storage client")?;
    tracing::info!(
        "using {} for bucket {}",
        credentials.describe(),
        args.bucket
    );

    let opts = run_options(&args, &cfg);
    if !opts.scope.is_scoped() {
        tracing::info!("no branch/build given; using unscoped path {}", opts.storage_base_path);
    }
    let retry = RetryPolicy::from(&cfg.retry_or_default());
    let mut store = GcsStore::new(args.bucket.clone(), credentials)
        .with_endpoint(cfg.api_endpoint.clone())
        .with_retry(retry);

    let outcome = tokio::task::spawn_blocking(move || pipeline::run(&opts, &mut store))
        .await
        .context("pipeline task panicked")?;

    report(&outcome);
    Ok(outcome.success)
}
