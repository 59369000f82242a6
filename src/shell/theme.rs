use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Root attribute the renderer reads the active theme from
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";

/// Preference key the theme is persisted under
pub const THEME_PREFERENCE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    #[default]
    Light,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown theme '{}', expected 'dark' or 'light'", s))
    }
}

/// Global attributes every view styles itself from
pub trait DocumentRoot: Send {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// In-process document root
#[derive(Debug, Default, Clone)]
pub struct RootElement {
    attributes: HashMap<String, String>,
}

impl RootElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme currently applied to the root, if any valid one is set
    pub fn theme(&self) -> Option<ThemeMode> {
        self.attribute(THEME_ATTRIBUTE).as_deref().and_then(ThemeMode::parse)
    }
}

impl DocumentRoot for RootElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}
