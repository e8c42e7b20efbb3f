use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ServiceId;

/// Environment variable that takes precedence over the stored OpenWeather key.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration for a single service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides [`ServiceId::default_base_url`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,

    /// Key taken from [`OPENWEATHER_KEY_ENV`]; never written back to disk.
    #[serde(skip)]
    openweather_key_override: Option<String>,
}

impl Config {
    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    fn service_entry(&mut self, id: ServiceId) -> &mut ServiceConfig {
        self.services.entry(id.as_str().to_string()).or_default()
    }

    /// Load config from the platform location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "api-lookup", "lookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env(&mut self) {
        self.override_openweather_key(std::env::var(OPENWEATHER_KEY_ENV).ok());
    }

    /// Let `value` take precedence over the stored OpenWeather key.
    /// Blank values are ignored.
    pub fn override_openweather_key(&mut self, value: Option<String>) {
        let key = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if key.is_some() {
            tracing::debug!("using OpenWeather API key from {OPENWEATHER_KEY_ENV}");
            self.openweather_key_override = key;
        }
    }

    /// Set/replace the API key of a service.
    pub fn upsert_api_key(&mut self, id: ServiceId, api_key: String) {
        self.service_entry(id).api_key = Some(api_key);
    }

    /// Set/replace the base URL of a service.
    pub fn set_base_url(&mut self, id: ServiceId, base_url: String) {
        self.service_entry(id).base_url = Some(base_url);
    }

    /// Stores a base URL override, or clears it when `input` is blank or
    /// the service's default.
    pub fn update_base_url(&mut self, id: ServiceId, input: &str) {
        let input = input.trim();
        if input.is_empty() || input == id.default_base_url() {
            if let Some(cfg) = self.services.get_mut(id.as_str()) {
                cfg.base_url = None;
            }
        } else {
            self.set_base_url(id, input.to_string());
        }
    }

    /// Returns API key for a service, if present.
    pub fn api_key(&self, id: ServiceId) -> Option<&str> {
        let overridden = match id {
            ServiceId::OpenWeather => self.openweather_key_override.as_deref(),
            ServiceId::Placeholder => None,
        };

        overridden.or_else(|| self.service_config(id).and_then(|cfg| cfg.api_key.as_deref()))
    }

    /// Configured base URL, or the service's public default.
    pub fn base_url(&self, id: ServiceId) -> &str {
        self.service_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url())
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        !id.requires_api_key() || self.api_key(id).is_some()
    }
}
