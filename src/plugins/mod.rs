//! Plugin provisioning for a server installation
//!
//! Reads the plugin manifest, decides what each deployment environment
//! includes and fetches plugin repositories with git.

pub mod installer;
pub mod manifest;

pub use installer::{InstallOutcome, InstallSummary, PluginInstaller, PluginStatus};
pub use manifest::{DEFAULT_MANIFEST_FILE, Environment, PluginEntry, PluginManifest};
