use anyhow::{Context, Result};
use clap::Parser;

use mutabaah::cli::args::{Cli, Commands};
use mutabaah::cli::handlers;
use mutabaah::config::AppConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&mut config, reset)?;
        }
        Some(Commands::Times) => {
            handlers::handle_times(&config)?;
        }
        Some(Commands::Check { prayer }) => {
            handlers::handle_check(&config, &prayer).await?;
        }
        Some(Commands::Month { year, month }) => {
            handlers::handle_month(&config, year, month).await?;
        }
        // No subcommand → show today's schedule
        Some(Commands::Today) | None => {
            handlers::handle_today(&config).await?;
        }
    }

    Ok(())
}
