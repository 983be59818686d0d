//! CLI for packzip.

mod zip_packs;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Zip the latest version of every pack from a GCS bucket into one archive.
#[derive(Debug, Parser)]
#[command(name = "packzip")]
#[command(about = "Zip packs from a GCS bucket", long_about = None)]
pub struct Cli {
    /// Full path of the folder to zip the packs in.
    #[arg(short = 'd', long, alias = "destination_path")]
    pub destination_path: PathBuf,

    /// Storage bucket name.
    #[arg(short = 'b', long, alias = "bucket_name")]
    pub bucket_name: String,

    /// Name of the branch. Ignored unless --circle-build is also given.
    #[arg(short = 'r', long, alias = "branch_name")]
    pub branch_name: Option<String>,

    /// Number of the CI build. Ignored unless --branch-name is also given.
    #[arg(short = 'n', long, alias = "circle_build")]
    pub circle_build: Option<String>,

    /// Path to a gcloud service-account key (CI usage). For local development leave
    /// this out and authenticate with `gcloud auth application-default login`.
    #[arg(short = 's', long, alias = "service_account")]
    pub service_account: Option<PathBuf>,

    /// Local directory whose entries name the packs (overrides config `packs_dir`).
    #[arg(short = 'p', long, alias = "packs_dir")]
    pub packs_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.config/packzip/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exit with status 1 when downloading or zipping fails.
    #[arg(long)]
    pub fail_on_error: bool,
}

impl Cli {
    /// Parse arguments and run. `Ok(false)` asks the caller to exit non-zero.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();
        let success = zip_packs::run_zip_packs(cli.clone_args()).await?;
        Ok(success || !cli.fail_on_error)
    }

    fn clone_args(&self) -> zip_packs::ZipArgs {
        zip_packs::ZipArgs {
            destination: self.destination_path.clone(),
            bucket: self.bucket_name.clone(),
            branch: self.branch_name.clone(),
            build: self.circle_build.clone(),
            service_account: self.service_account.clone(),
            packs_dir: self.packs_dir.clone(),
            config: self.config.clone(),
        }
    }
}
