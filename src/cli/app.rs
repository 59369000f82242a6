use super::commands::cases::CasesCommands;
use super::commands::ping::PingCommands;
use super::commands::plugins::PluginsCommands;
use super::commands::tui::TuiCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aether-cli")]
#[command(about = "A terminal client for the AetherOne radionics server")]
#[command(version)]
pub struct Cli {
    /// Server address (overrides config file and AETHER_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// User agent used for device detection
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Defaults to `tui`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI interface
    Tui(TuiCommands),
    /// Check whether the server is reachable
    Ping(PingCommands),
    /// Case storage
    Cases(CasesCommands),
    /// Server plugins and plugin provisioning
    Plugins(PluginsCommands),
}
