use super::CommandContext;
use crate::cli::ui::with_spinner;
use anyhow::Result;
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct PingCommands {
    /// Print nothing, only set the exit status
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn ping_command(args: PingCommands, context: &CommandContext) -> Result<()> {
    let base_url = context.config.base_url();
    let online = with_spinner(
        format!("Pinging {}", base_url),
        context.gateway.check_liveness(),
    )
    .await;

    if !args.quiet {
        if online {
            println!("{} {}", "●".bright_green(), format!("{} is online", base_url).bold());
        } else {
            println!("{} {}", "●".bright_red(), format!("{} is offline", base_url).bold());
        }
    }

    if !online {
        anyhow::bail!("Server at {} is not reachable", base_url);
    }
    Ok(())
}
