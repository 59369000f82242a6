//! `plugins-config.json` manifest
//!
//! Declares the plugins a server installation pulls in, where they come
//! from and which deployment environments include them.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_MANIFEST_FILE: &str = "plugins-config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Development,
    Production,
    Ci,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Ci => "ci",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "ci" => Ok(Environment::Ci),
            other => anyhow::bail!("Unknown environment '{}', expected development, production or ci", other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginEntry>,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub dev_only: bool,
    #[serde(default)]
    pub install_path: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryInfo>,
    #[serde(default)]
    pub dependencies: Option<PluginDependencies>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub dev_branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginDependencies {
    #[serde(default)]
    pub python: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    #[serde(default)]
    pub skip_optional: bool,
    #[serde(default = "default_true")]
    pub include_dev_plugins: bool,
    #[serde(default)]
    pub use_dev_branches: bool,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            skip_optional: false,
            include_dev_plugins: true,
            use_dev_branches: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl PluginEntry {
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository.as_ref().and_then(|repo| repo.url.as_deref())
    }
}

impl PluginManifest {
    /// Parse a manifest. A missing or malformed file yields an empty manifest.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("{:#}", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Config file {:?} not found", path))?;
        let manifest: PluginManifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in config file {:?}", path))?;
        debug!("Loaded manifest with {} plugins", manifest.plugins.len());
        Ok(manifest)
    }

    pub fn environment(&self, environment: Environment) -> EnvironmentSettings {
        self.environments
            .get(environment.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `entry` belongs in an installation for `environment`
    pub fn should_install(&self, entry: &PluginEntry, environment: Environment) -> bool {
        let settings = self.environment(environment);

        if !entry.enabled {
            return false;
        }
        if settings.skip_optional && !entry.required {
            return false;
        }
        if !settings.include_dev_plugins && entry.dev_only {
            return false;
        }
        true
    }

    /// Branch to fetch for `entry` in `environment`
    pub fn branch_for(&self, entry: &PluginEntry, environment: Environment) -> String {
        let settings = self.environment(environment);
        let repository = entry.repository.as_ref();

        if settings.use_dev_branches {
            if let Some(dev_branch) = repository.and_then(|repo| repo.dev_branch.clone()) {
                return dev_branch;
            }
        }

        repository
            .and_then(|repo| repo.branch.clone())
            .unwrap_or_else(|| "main".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> PluginManifest {
        serde_json::from_value(json!({
            "plugins": {
                "rates": {
                    "name": "Rate Importer",
                    "required": true,
                    "install_path": "py/plugins/rates",
                    "repository": {"url": "https://github.com/example/rates.git", "dev_branch": "develop"}
                },
                "cards": {
                    "install_path": "py/plugins/cards",
                    "repository": {"url": "https://github.com/example/cards.git", "branch": "stable"}
                },
                "debugger": {
                    "dev_only": true,
                    "install_path": "py/plugins/debugger",
                    "repository": {"url": "https://github.com/example/debugger.git"}
                },
                "retired": {"enabled": false}
            },
            "environments": {
                "production": {"include_dev_plugins": false},
                "development": {"use_dev_branches": true},
                "ci": {"skip_optional": true}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_should_install_per_environment() {
        let manifest = manifest();
        let entry = |key: &str| manifest.plugins[key].clone();

        assert!(manifest.should_install(&entry("rates"), Environment::Production));
        assert!(manifest.should_install(&entry("cards"), Environment::Production));
        assert!(!manifest.should_install(&entry("debugger"), Environment::Production));
        assert!(!manifest.should_install(&entry("retired"), Environment::Development));

        assert!(manifest.should_install(&entry("debugger"), Environment::Development));

        assert!(manifest.should_install(&entry("rates"), Environment::Ci));
        assert!(!manifest.should_install(&entry("cards"), Environment::Ci));
    }

    #[test]
    fn test_branch_selection() {
        let manifest = manifest();
        let rates = &manifest.plugins["rates"];
        let cards = &manifest.plugins["cards"];

        assert_eq!(manifest.branch_for(rates, Environment::Development), "develop");
        assert_eq!(manifest.branch_for(rates, Environment::Production), "main");
        assert_eq!(manifest.branch_for(cards, Environment::Development), "stable");
        assert_eq!(manifest.branch_for(cards, Environment::Production), "stable");
    }

    #[test]
    fn test_unknown_environment_uses_defaults() {
        let manifest = PluginManifest::default();
        let settings = manifest.environment(Environment::Ci);
        assert!(settings.include_dev_plugins);
        assert!(!settings.skip_optional);
    }

    #[test]
    fn test_missing_file_is_empty_manifest() {
        let manifest = PluginManifest::load(Path::new("/nonexistent/plugins-config.json"));
        assert!(manifest.plugins.is_empty());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("ci".parse::<Environment>().unwrap(), Environment::Ci);
        assert!("staging".parse::<Environment>().is_err());
    }
}
