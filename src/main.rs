mod args;
mod commands;

use args::{Cli, Commands};
use clap::Parser;
use raybot_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let api_url = cli.api_url.as_deref();
    match cli.command {
        Commands::Config { command } => commands::config::cmd_config(api_url, command).await?,
        Commands::Settings => commands::settings::cmd_settings(api_url)?,
        Commands::Completions { shell, install } => {
            commands::completions::cmd_completions(shell, install)?
        }
    }

    Ok(())
}
