use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user's working record on the server.
///
/// Only the identifier and display name are interpreted by the client; every
/// other attribute is carried through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Case {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Case {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            fields: Map::new(),
        }
    }

    /// Set an attribute. `id` and `name` go to the typed fields so they are
    /// never serialized twice; values of the wrong type clear them.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "id" => self.id = value.as_i64(),
            "name" => self.name = value.as_str().map(str::to_string),
            _ => {
                self.fields.insert(key, value);
            }
        }
        self
    }

    /// Human readable label for lists and headers
    pub fn display_name(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), Some(id)) => format!("{} (#{})", name, id),
            (Some(name), None) => name.clone(),
            (None, Some(id)) => format!("Case #{}", id),
            (None, None) => "Unsaved case".to_string(),
        }
    }
}

/// A server-registered plugin whose UI is served under the server origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    /// Relative path of the plugin's UI resource
    #[serde(rename = "ui")]
    pub ui_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, ui_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ui_path: ui_path.into(),
            extra: Map::new(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(Value::as_str)
    }
}

/// Envelope returned by the plugin discovery endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginList {
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
}
