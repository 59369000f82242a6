//! Client configuration
//!
//! Settings are stored as TOML in the user's config directory. Environment
//! variables (optionally from a `.env` file) override file values, and CLI
//! flags override both.

use crate::api::constants::{DEFAULT_BASE_URL, normalize_base_url};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod preferences;

pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};

/// Environment variable overriding the server address
pub const BASE_URL_ENV: &str = "AETHER_BASE_URL";

/// Environment variable overriding the detected user agent
pub const USER_AGENT_ENV: &str = "AETHER_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_liveness_interval_secs")]
    pub liveness_interval_secs: u64,
    /// Overrides the user agent used for device detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_liveness_interval_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            liveness_interval_secs: default_liveness_interval_secs(),
            user_agent: None,
        }
    }
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("aether-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".aether-cli")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Location of the persisted UI preferences (theme)
    pub fn get_preferences_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("preferences.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", path);

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Apply `AETHER_*` variables from the process environment and `.env`
    pub fn apply_env(&mut self) {
        dotenvy::dotenv().ok();
        self.apply_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(USER_AGENT_ENV).ok(),
        );
    }

    /// Replace values that were given explicitly; blank values are ignored
    pub fn apply_overrides(&mut self, base_url: Option<String>, user_agent: Option<String>) {
        if let Some(base_url) = base_url.filter(|value| !value.trim().is_empty()) {
            debug!("Overriding base URL with {}", base_url);
            self.base_url = base_url;
        }
        if let Some(user_agent) = user_agent.filter(|value| !value.trim().is_empty()) {
            self.user_agent = Some(user_agent);
        }
    }

    pub fn base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn liveness_interval(&self) -> Duration {
        Duration::from_secs(self.liveness_interval_secs.max(1))
    }
}
