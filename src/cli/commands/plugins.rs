use super::CommandContext;
use crate::cli::ui::with_spinner;
use aether_cli::gallery::get_plugin_url;
use aether_cli::plugins::{DEFAULT_MANIFEST_FILE, Environment, PluginInstaller, PluginManifest};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use reqwest::Url;
use std::path::PathBuf;

#[derive(Args)]
pub struct PluginsCommands {
    #[command(subcommand)]
    pub command: PluginsSubcommands,
}

#[derive(Subcommand)]
pub enum PluginsSubcommands {
    /// List plugins registered on the server
    List,
    /// Provision plugins from a plugins-config.json manifest
    Manifest(ManifestCommands),
}

#[derive(Args)]
pub struct ManifestCommands {
    /// Manifest file
    #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
    pub config: PathBuf,

    /// Deployment environment (development, production or ci)
    #[arg(long, default_value = "production")]
    pub environment: Environment,

    /// Directory plugin install paths are relative to
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    #[command(subcommand)]
    pub command: ManifestSubcommands,
}

#[derive(Subcommand)]
pub enum ManifestSubcommands {
    /// Show every configured plugin and whether it is installed
    List,
    /// Install the plugins selected for the environment
    Install,
    /// Remove installed plugin directories
    Clean,
}

pub async fn plugins_command(args: PluginsCommands, context: &CommandContext) -> Result<()> {
    match args.command {
        PluginsSubcommands::List => list_server_plugins(context).await,
        PluginsSubcommands::Manifest(manifest) => manifest_command(manifest).await,
    }
}

async fn list_server_plugins(context: &CommandContext) -> Result<()> {
    let origin = Url::parse(&context.config.base_url()).context("Invalid server address")?;
    let plugins = with_spinner("Loading plugins", context.gateway.load_plugins())
        .await
        .context("Error loading plugins")?;

    if plugins.is_empty() {
        println!("{}", "No plugins registered".dimmed());
        return Ok(());
    }

    println!("{}", "Plugins:".bold());
    for plugin in &plugins {
        let location = match get_plugin_url(plugin).and_then(|url| url.resolve(&origin)) {
            Ok(url) => url.to_string().cyan(),
            Err(e) => format!("rejected: {}", e).bright_red(),
        };
        println!("  {} {}", plugin.name.bold(), location);
        if let Some(description) = plugin.description() {
            println!("    {}", description.dimmed());
        }
    }
    Ok(())
}

async fn manifest_command(args: ManifestCommands) -> Result<()> {
    let manifest = PluginManifest::load(&args.config);
    if manifest.plugins.is_empty() {
        println!("{} No plugins configured in {}", "!".yellow(), args.config.display());
        return Ok(());
    }
    let installer = PluginInstaller::new(manifest, args.environment, args.project_root.clone());

    match args.command {
        ManifestSubcommands::List => {
            println!("{}", "Configured plugins:".bold());
            for status in installer.list() {
                let state = if !status.enabled {
                    "disabled".yellow()
                } else if status.installed {
                    "installed".bright_green()
                } else {
                    "not installed".bright_red()
                };
                let version = status.version.as_deref().unwrap_or("?");
                let required = if status.required { " required".bright_blue() } else { "".normal() };
                println!("  {} {} [{}]{}", status.name.bold(), format!("v{}", version).dimmed(), state, required);
                if let Some(repository) = &status.repository {
                    println!("    {}", repository.dimmed());
                }
            }
            Ok(())
        }
        ManifestSubcommands::Install => {
            println!("Installing plugins for {}", args.environment.to_string().cyan());
            let summary = with_spinner("Installing plugins", installer.install_all()).await;
            println!(
                "{} installed, {} skipped, {} failed (of {})",
                summary.installed.to_string().bright_green(),
                summary.skipped.to_string().yellow(),
                summary.failed.to_string().bright_red(),
                summary.total
            );
            if summary.failed > 0 {
                anyhow::bail!("{} plugin(s) failed to install, see aether-cli.log", summary.failed);
            }
            Ok(())
        }
        ManifestSubcommands::Clean => {
            let removed = installer.clean().await;
            println!("{} Removed {} plugin(s)", "✓".bright_green(), removed);
            Ok(())
        }
    }
}
