//! Trusted plugin URLs
//!
//! Plugin UIs are loaded from the server's own origin. A
//! [`TrustedResourceUrl`] can only be built from a relative path that stays
//! on that origin, which is the single place plugin-supplied strings cross
//! into something the UI will load.

use crate::api::PluginDescriptor;
use reqwest::Url;
use std::fmt;
use thiserror::Error;

/// Prefix every plugin UI path is rooted under
pub const PLUGIN_URL_PREFIX: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginUrlError {
    #[error("Plugin UI path is empty")]
    Empty,
    #[error("Plugin UI path {0:?} has surrounding whitespace or control characters")]
    Malformed(String),
    #[error("Plugin UI path '{0}' is not a relative path")]
    NotRelative(String),
    #[error("Plugin UI path '{0}' escapes the plugin root")]
    ParentTraversal(String),
    #[error("Plugin UI path '{0}' resolves to another origin")]
    CrossOrigin(String),
}

/// Same-origin URL of a plugin UI, safe to embed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrustedResourceUrl(String);

impl TrustedResourceUrl {
    /// The result is always [`PLUGIN_URL_PREFIX`] followed by `ui_path`
    /// unchanged; anything that cannot be used as-is is rejected.
    pub fn for_plugin_path(ui_path: &str) -> Result<Self, PluginUrlError> {
        let path = ui_path;
        if path.is_empty() {
            return Err(PluginUrlError::Empty);
        }
        if path.trim() != path || path.chars().any(char::is_control) {
            return Err(PluginUrlError::Malformed(path.to_string()));
        }

        // A leading separator would make "//host/..." after prefixing
        if path.starts_with('/') || path.contains('\\') {
            return Err(PluginUrlError::NotRelative(path.to_string()));
        }

        let before_separator = path.split(['/', '?', '#']).next().unwrap_or_default();
        if before_separator.contains(':') {
            return Err(PluginUrlError::NotRelative(path.to_string()));
        }

        let path_part = path.split(['?', '#']).next().unwrap_or_default();
        if path_part.split('/').any(|segment| decode_dots(segment) == "..") {
            return Err(PluginUrlError::ParentTraversal(path.to_string()));
        }

        Ok(Self(format!("{}{}", PLUGIN_URL_PREFIX, path)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL on `origin`. Fails if the result would leave that origin.
    pub fn resolve(&self, origin: &Url) -> Result<Url, PluginUrlError> {
        let resolved = origin
            .join(&self.0)
            .map_err(|_| PluginUrlError::NotRelative(self.0.clone()))?;

        if resolved.origin() != origin.origin() {
            return Err(PluginUrlError::CrossOrigin(self.0.clone()));
        }
        Ok(resolved)
    }
}

impl fmt::Display for TrustedResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Segment with every `%2e` decoded to `.`, as URL parsers read it
fn decode_dots(segment: &str) -> String {
    let mut decoded = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(index) = rest.find('%') {
        decoded.push_str(&rest[..index]);
        let escape = &rest[index..];
        if escape.get(1..3).is_some_and(|hex| hex.eq_ignore_ascii_case("2e")) {
            decoded.push('.');
            rest = &escape[3..];
        } else {
            decoded.push('%');
            rest = &escape[1..];
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Trusted URL for a plugin's UI. Pure; no side effects.
pub fn get_plugin_url(plugin: &PluginDescriptor) -> Result<TrustedResourceUrl, PluginUrlError> {
    TrustedResourceUrl::for_plugin_path(&plugin.ui_path)
}
