// src/config.rs
//! Runtime configuration: built-in defaults, optional TOML file, then
//! environment variable overrides, in that order

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const CONFIG_FILE: &str = "fitcheck.toml";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub share_origin: Option<String>,
    pub export_dir: PathBuf,
}

/// Optional values read from `fitcheck.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub share_origin: Option<String>,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let mut config = Self::defaults();

        if let Some(path) = Self::config_file_path() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let file: FileConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            info!("Loaded configuration from: {}", path.display());
            config.apply_file(file);
        }

        config.apply_env();
        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            share_origin: None,
            export_dir: PathBuf::from("."),
        }
    }

    /// An explicit FITCHECK_CONFIG path must exist; the implicit local file
    /// is picked up only when present.
    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FITCHECK_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            None
        }
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(timeout) = file.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(origin) = file.share_origin {
            self.share_origin = Some(origin);
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = dir;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(api_url) = std::env::var("FITCHECK_API_URL") {
            self.api_url = api_url;
        }
        if let Ok(timeout) = std::env::var("FITCHECK_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_seconds = secs,
                Err(_) => warn!("Ignoring invalid FITCHECK_TIMEOUT_SECS: {}", timeout),
            }
        }
        if let Ok(origin) = std::env::var("FITCHECK_SHARE_ORIGIN") {
            self.share_origin = Some(origin);
        }
        if let Ok(dir) = std::env::var("FITCHECK_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
    }

    /// Origin used for share links. Defaults to the scheme and authority of
    /// the API base URL since a terminal client has no page origin of its own.
    pub fn share_origin(&self) -> String {
        if let Some(origin) = &self.share_origin {
            return origin.clone();
        }
        match reqwest::Url::parse(&self.api_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.api_url.trim_end_matches('/').to_string(),
        }
    }
}
