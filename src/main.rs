mod commands;
mod shutdown;
mod startup;

use clap::Parser;
use commands::{Cli, CommandContext};
use startup::{build_client, init_logging, load_config};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    init_logging()?;
    let config = load_config()?;
    let client = build_client(&config)?;

    commands::run(cli, CommandContext::new(config, client)).await?;

    Ok(())
}
