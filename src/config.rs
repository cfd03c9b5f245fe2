// src/config.rs
//! Client configuration: optional YAML file, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::service_client::{EXPORT_ENDPOINT, UPLOAD_ENDPOINT};
use crate::staging::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_CONFIG_FILE: &str = "shortlist.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub service_url: String,
    pub upload_endpoint: String,
    pub export_endpoint: String,
    /// No timeout unless set.
    pub timeout_seconds: Option<u64>,
    pub max_upload_bytes: u64,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:5000".to_string(),
            upload_endpoint: UPLOAD_ENDPOINT.to_string(),
            export_endpoint: EXPORT_ENDPOINT.to_string(),
            timeout_seconds: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("/tmp/resume-shortlist.log"),
            source: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `shortlist.yaml` in the
    /// current directory is used when present, built-in defaults otherwise.
    /// Relative paths are left as given; call `resolve_paths` once every
    /// override is applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn resolve_paths(&mut self) -> Result<()> {
        self.export_dir = Self::resolve_path(&self.export_dir)?;
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid configuration")
    }

    /// Override fields from `SHORTLIST_*` variables looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("SHORTLIST_SERVICE_URL") {
            self.service_url = url;
        }
        if let Some(dir) = var("SHORTLIST_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("SHORTLIST_LOG_FILE") {
            self.log_file = PathBuf::from(file);
        }
        if let Some(secs) = var("SHORTLIST_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("SHORTLIST_TIMEOUT_SECS must be a number of seconds"))?;
            self.timeout_seconds = Some(secs);
        }
        Ok(())
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}
