use super::CommandContext;
use crate::tui::{TuiOptions, launch};
use anyhow::Result;
use clap::Args;
use is_terminal::IsTerminal;

#[derive(Args)]
pub struct TuiCommands {
    /// Keep the theme choice for this run only
    #[arg(long)]
    pub no_persist: bool,
}

pub async fn tui_command(args: TuiCommands, context: &CommandContext) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        anyhow::bail!("The interactive interface needs a terminal on stdout");
    }

    let options = TuiOptions {
        base_url: context.config.base_url(),
        user_agent: context.config.user_agent.clone(),
        liveness_interval: context.config.liveness_interval(),
        persist_preferences: !args.no_persist,
    };
    launch(context.gateway.clone(), options).await
}
