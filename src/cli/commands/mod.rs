pub mod cases;
pub mod ping;
pub mod plugins;
pub mod tui;

use aether_cli::config::Config;
use aether_cli::session::SessionGateway;

pub use cases::cases_command;
pub use ping::ping_command;
pub use plugins::plugins_command;
pub use tui::{TuiCommands, tui_command};

/// Resolved configuration and server session shared by every command
pub struct CommandContext {
    pub config: Config,
    pub gateway: SessionGateway,
}
