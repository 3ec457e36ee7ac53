//! Client configuration.
//!
//! This module handles loading and saving the client configuration,
//! which covers the API endpoint and request timeout.
//!
//! Configuration is stored at `~/.config/cloudalbum-client/config.json`.
//! The environment variables `CLOUDALBUM_API_ENDPOINT` and
//! `CLOUDALBUM_TIMEOUT_SECS` override the stored values.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for the config directory path
const APP_NAME: &str = "cloudalbum-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default API endpoint (the backend's local dev address)
const DEFAULT_API_ENDPOINT: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from disk, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_overrides(
            std::env::var("CLOUDALBUM_API_ENDPOINT").ok(),
            std::env::var("CLOUDALBUM_TIMEOUT_SECS").ok(),
        );
        Ok(config)
    }

    /// Build configuration from defaults and environment only, without
    /// touching the filesystem.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(
            std::env::var("CLOUDALBUM_API_ENDPOINT").ok(),
            std::env::var("CLOUDALBUM_TIMEOUT_SECS").ok(),
        );
        config
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, timeout: Option<String>) {
        if let Some(endpoint) = endpoint {
            self.api_endpoint = endpoint;
        }
        if let Some(timeout) = timeout {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid timeout override"),
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
