use aether_cli::api::AetherClient;
use aether_cli::config::Config;
use aether_cli::session::SessionGateway;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

mod cli;
mod tui;

use cli::commands::TuiCommands;
use cli::{Cli, CommandContext, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("aether-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting aether-cli");

    // File, then environment, then flags
    let mut config = Config::load()?;
    config.apply_env();
    config.apply_overrides(cli.base_url.clone(), cli.user_agent.clone());
    debug!("Using server {}", config.base_url());

    let client = AetherClient::with_timeout(&config.base_url(), config.request_timeout())
        .context("Failed to create API client")?;
    let context = CommandContext {
        gateway: SessionGateway::from_client(client),
        config,
    };

    let command = cli.command.unwrap_or(Commands::Tui(TuiCommands { no_persist: false }));
    match command {
        Commands::Tui(args) => cli::commands::tui_command(args, &context).await?,
        Commands::Ping(args) => cli::commands::ping_command(args, &context).await?,
        Commands::Cases(args) => cli::commands::cases_command(args, &context).await?,
        Commands::Plugins(args) => cli::commands::plugins_command(args, &context).await?,
    }

    Ok(())
}
