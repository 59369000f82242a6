//! Persisted UI preferences
//!
//! A small string key/value store that survives restarts. The shell keeps
//! the theme here.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in a TOML table on disk, written through on every set
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store. A missing or unreadable file starts empty rather
    /// than failing, the UI falls back to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring preferences at {:?}: {:#}", path, e);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} preferences from {:?}", values.len(), path);
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse preferences: {:?}", path))
    }

    fn write(&self) -> Result<()> {
        let content = toml::to_string(&self.values).context("Failed to serialize preferences")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences: {:?}", self.path))
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.write()
    }
}

/// Non-persistent store, for `tui --no-persist` or when no config directory is available
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn with(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        let mut store = FilePreferences::open(&path);
        assert!(store.get("theme").is_none());
        store.set("theme", "dark").unwrap();

        let reopened = FilePreferences::open(&path);
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "theme = ").unwrap();

        let mut store = FilePreferences::open(&path);
        assert!(store.get("theme").is_none());

        store.set("theme", "light").unwrap();
        assert_eq!(FilePreferences::open(&path).get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryPreferences::with("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }
}
