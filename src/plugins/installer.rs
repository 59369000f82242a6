use super::manifest::{Environment, PluginEntry, PluginManifest};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Upper bound for a single clone
const CLONE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// Disabled or excluded for the environment
    Skipped,
    Failed(String),
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, InstallOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Row for `plugins manifest list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatus {
    pub key: String,
    pub name: String,
    pub version: Option<String>,
    pub repository: Option<String>,
    pub enabled: bool,
    pub required: bool,
    pub installed: bool,
}

pub struct PluginInstaller {
    manifest: PluginManifest,
    environment: Environment,
    project_root: PathBuf,
}

impl PluginInstaller {
    pub fn new(manifest: PluginManifest, environment: Environment, project_root: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            environment,
            project_root: project_root.into(),
        }
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Install directory under the project root. Paths that are absolute,
    /// climb with `..` or name the root itself are refused.
    fn target_path(&self, entry: &PluginEntry) -> Option<PathBuf> {
        let path = Path::new(entry.install_path.as_deref()?.trim());
        let mut components = path.components().peekable();
        components.peek()?;

        let mut has_name = false;
        for component in components {
            match component {
                Component::Normal(_) => has_name = true,
                Component::CurDir => {}
                _ => {
                    warn!("Ignoring install path {:?} outside the project root", path);
                    return None;
                }
            }
        }
        has_name.then(|| self.project_root.join(path))
    }

    pub async fn install_all(&self) -> InstallSummary {
        let mut summary = InstallSummary {
            total: self.manifest.plugins.len(),
            ..Default::default()
        };

        if self.manifest.plugins.is_empty() {
            info!("No plugins configured");
            return summary;
        }

        for (key, entry) in &self.manifest.plugins {
            match self.install(key, entry).await {
                InstallOutcome::Installed => summary.installed += 1,
                InstallOutcome::Skipped => summary.skipped += 1,
                InstallOutcome::Failed(reason) => {
                    error!("Failed to install {}: {}", key, reason);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Plugin installation finished: {} installed, {} skipped, {} failed",
            summary.installed, summary.skipped, summary.failed
        );
        summary
    }

    pub async fn install(&self, key: &str, entry: &PluginEntry) -> InstallOutcome {
        info!("Installing plugin {}", entry.display_name(key));

        if !self.manifest.should_install(entry, self.environment) {
            info!("Skipping {} (disabled or not required for {})", key, self.environment);
            return InstallOutcome::Skipped;
        }

        let (Some(url), Some(target)) = (entry.repository_url(), self.target_path(entry)) else {
            return InstallOutcome::Failed(format!(
                "Missing required info: url={:?}, path={:?}",
                entry.repository_url(),
                entry.install_path
            ));
        };

        let branch = self.manifest.branch_for(entry, self.environment);
        if let Err(e) = clone_repository(url, &branch, &target).await {
            return InstallOutcome::Failed(format!("{:#}", e));
        }

        if let Some(dependencies) = &entry.dependencies {
            if !dependencies.python.is_empty() {
                warn!(
                    "{} declares Python dependencies ({}); install them on the server",
                    key,
                    dependencies.python.join(", ")
                );
            }
        }

        if target.exists() {
            InstallOutcome::Installed
        } else {
            InstallOutcome::Failed("Plugin installation verification failed".to_string())
        }
    }

    pub fn list(&self) -> Vec<PluginStatus> {
        self.manifest
            .plugins
            .iter()
            .map(|(key, entry)| PluginStatus {
                key: key.clone(),
                name: entry.display_name(key).to_string(),
                version: entry.version.clone(),
                repository: entry.repository_url().map(str::to_string),
                enabled: entry.enabled,
                required: entry.required,
                installed: self.target_path(entry).is_some_and(|path| path.exists()),
            })
            .collect()
    }

    /// Remove every installed plugin directory, returns how many were removed
    pub async fn clean(&self) -> usize {
        let mut removed = 0;
        for (key, entry) in &self.manifest.plugins {
            let Some(target) = self.target_path(entry) else { continue };
            if !target.exists() {
                continue;
            }
            match tokio::fs::remove_dir_all(&target).await {
                Ok(()) => {
                    info!("Removed {}", key);
                    removed += 1;
                }
                Err(e) => error!("Failed to remove {}: {}", key, e),
            }
        }
        removed
    }
}

/// Shallow clone of `branch` into `target`, replacing whatever is there
async fn clone_repository(url: &str, branch: &str, target: &Path) -> Result<()> {
    info!("Cloning {} (branch: {})", url, branch);

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    if target.exists() {
        tokio::fs::remove_dir_all(target)
            .await
            .with_context(|| format!("Failed to remove existing {:?}", target))?;
    }

    let clone = Command::new("git")
        .args(["clone", "--branch", branch, "--depth", "1", url])
        .arg(target)
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(CLONE_TIMEOUT, clone)
        .await
        .with_context(|| format!("Clone timed out for {}", url))?
        .context("Failed to run git")?;

    if !output.status.success() {
        anyhow::bail!("Git clone failed: {}", String::from_utf8_lossy(&output.stderr).trim());
    }

    let git_dir = target.join(".git");
    if git_dir.exists() {
        tokio::fs::remove_dir_all(&git_dir)
            .await
            .with_context(|| format!("Failed to remove {:?}", git_dir))?;
        debug!("Cleaned up {:?}", git_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn manifest() -> PluginManifest {
        serde_json::from_value(json!({
            "plugins": {
                "cards": {"install_path": "plugins/cards", "repository": {"url": "https://example.invalid/cards.git"}},
                "nourl": {"install_path": "plugins/nourl"},
                "retired": {"enabled": false, "install_path": "plugins/retired"}
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_plugin_is_skipped() {
        let dir = tempdir().unwrap();
        let installer = PluginInstaller::new(manifest(), Environment::Production, dir.path());
        let entry = installer.manifest().plugins["retired"].clone();

        assert_eq!(installer.install("retired", &entry).await, InstallOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_missing_repository_fails() {
        let dir = tempdir().unwrap();
        let installer = PluginInstaller::new(manifest(), Environment::Production, dir.path());
        let entry = installer.manifest().plugins["nourl"].clone();

        let outcome = installer.install("nourl", &entry).await;
        assert!(matches!(outcome, InstallOutcome::Failed(ref reason) if reason.contains("Missing required info")));
    }

    #[test]
    fn test_list_reports_install_state() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("plugins/cards")).unwrap();
        let installer = PluginInstaller::new(manifest(), Environment::Production, dir.path());

        let statuses = installer.list();
        assert_eq!(statuses.len(), 3);
        let cards = statuses.iter().find(|s| s.key == "cards").unwrap();
        assert!(cards.installed);
        assert!(cards.enabled);
        let retired = statuses.iter().find(|s| s.key == "retired").unwrap();
        assert!(!retired.installed);
        assert!(!retired.enabled);
    }

    #[tokio::test]
    async fn test_clean_removes_installed_dirs() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("plugins/cards/ui")).unwrap();
        std::fs::create_dir_all(dir.path().join("plugins/retired")).unwrap();
        let installer = PluginInstaller::new(manifest(), Environment::Production, dir.path());

        assert_eq!(installer.clean().await, 2);
        assert!(!dir.path().join("plugins/cards").exists());
        assert_eq!(installer.clean().await, 0);
    }

    #[tokio::test]
    async fn test_install_paths_stay_under_project_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("project");
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&outside).unwrap();

        let manifest: PluginManifest = serde_json::from_value(json!({
            "plugins": {
                "climber": {
                    "install_path": "plugins/../../outside",
                    "repository": {"url": "https://example.invalid/climber.git"}
                },
                "absolute": {"install_path": outside.to_string_lossy()},
                "root": {"install_path": "."}
            }
        }))
        .unwrap();
        let installer = PluginInstaller::new(manifest, Environment::Production, &root);

        assert_eq!(installer.clean().await, 0);
        assert!(outside.exists());
        assert!(root.exists());
        assert!(installer.list().iter().all(|status| !status.installed));

        let entry = installer.manifest().plugins["climber"].clone();
        let outcome = installer.install("climber", &entry).await;
        assert!(matches!(outcome, InstallOutcome::Failed(ref reason) if reason.contains("Missing required info")));
    }
}
