use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl RetryConfig {
    /// Reject delays that cannot be represented as a `Duration`.
    pub fn validate(&self) -> Result<()> {
        if Duration::try_from_secs_f64(self.base_delay_secs).is_err() {
            anyhow::bail!(
                "invalid [retry] base_delay_secs = {}: must be a finite, non-negative number of seconds",
                self.base_delay_secs
            );
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/packzip/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackzipConfig {
    /// Object prefix under which packs are published (`<base>/<branch>/<build>/<pack>/<version>/`).
    pub storage_base_path: String,
    /// File name of the produced bundle inside the destination directory.
    pub artifact_name: String,
    /// Local directory whose entries name the packs to fetch.
    pub packs_dir: PathBuf,
    /// Entries of `packs_dir` that are not packs.
    pub ignored_packs: Vec<String>,
    /// Storage API endpoint; override for emulators.
    pub api_endpoint: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for PackzipConfig {
    fn default() -> Self {
        Self {
            storage_base_path: "content/packs".to_string(),
            artifact_name: "zipped_packs.zip".to_string(),
            packs_dir: PathBuf::from("Packs"),
            ignored_packs: ["__init__.py", "ApiModules", "NonSupported", "index"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_endpoint: "https://storage.googleapis.com".to_string(),
            retry: None,
        }
    }
}

impl PackzipConfig {
    pub fn retry_or_default(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("packzip")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PackzipConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PackzipConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<PackzipConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PackzipConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    if let Some(retry) = &cfg.retry {
        retry
            .validate()
            .with_context(|| format!("config: {}", path.display()))?;
    }
    Ok(cfg)
}
