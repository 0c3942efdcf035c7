mod auth;
mod cli;
mod config;
mod error;
mod listing;
mod output;
mod pipeline;
mod providers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    if !cli.quiet() {
        output::print_banner();
    }

    info!("Starting mergedlistr");
    cli.execute().await?;

    Ok(())
}
