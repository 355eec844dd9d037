//! Application configuration.
//!
//! Holds the backend endpoints and keys plus the startup pacing and shimmer
//! tuning. Stored at `~/.config/kindred/config.json`; every field has a
//! default so a missing or partial file is fine. Environment variables
//! override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bootstrap::DEFAULT_MIN_SPLASH_DELAY;
use crate::shimmer::ShimmerSettings;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "kindred";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_URL: &str = "http://localhost:54321";
const DEFAULT_PURCHASES_URL: &str = "https://api.revenuecat.com";

const ENV_API_URL: &str = "KINDRED_API_URL";
const ENV_API_KEY: &str = "KINDRED_API_KEY";
const ENV_PURCHASES_URL: &str = "KINDRED_PURCHASES_URL";
const ENV_PURCHASES_KEY: &str = "KINDRED_PURCHASES_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub purchases_url: String,
    pub purchases_api_key: Option<String>,
    pub splash_min_delay_ms: u64,
    pub shimmer: ShimmerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            purchases_url: DEFAULT_PURCHASES_URL.to_string(),
            purchases_api_key: None,
            splash_min_delay_ms: DEFAULT_MIN_SPLASH_DELAY.as_millis() as u64,
            shimmer: ShimmerSettings::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!(?path, "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(key) = value(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(url) = value(ENV_PURCHASES_URL) {
            self.purchases_url = url;
        }
        if let Some(key) = value(ENV_PURCHASES_KEY) {
            self.purchases_api_key = Some(key);
        }
    }

    pub fn splash_min_delay(&self) -> Duration {
        Duration::from_millis(self.splash_min_delay_ms)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the device session and log files
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.splash_min_delay(), Duration::from_millis(500));
        assert_eq!(config.shimmer.min_opacity, 0.3);
        assert_eq!(config.shimmer.max_opacity, 0.7);
        assert!(config.purchases_api_key.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{"api_url":"https://x.supabase.co","shimmer":{"leg_ms":800}}"#)
            .unwrap();
        assert_eq!(config.api_url, "https://x.supabase.co");
        assert_eq!(config.shimmer.leg_ms, 800);
        assert_eq!(config.shimmer.frame_ms, 16);
        assert_eq!(config.splash_min_delay_ms, 500);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Config::from_json("{not json").is_err());
    }

    #[test]
    fn test_overrides_skip_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://env.example"),
            (ENV_API_KEY, "   "),
            (ENV_PURCHASES_KEY, "appl_123"),
        ]);
        let mut config = Config {
            api_key: "from-file".to_string(),
            ..Default::default()
        };
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://env.example");
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.purchases_api_key.as_deref(), Some("appl_123"));
        assert_eq!(config.purchases_url, DEFAULT_PURCHASES_URL);
    }
}
