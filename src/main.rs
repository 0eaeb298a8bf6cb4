use anyhow::{Context, Result};
use clap::Parser;

use mifos::{app::load_config, cli::{execute, Cli}, utils::init_logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Resolve the gateway once; everything downstream receives it by value
    let config = load_config(cli.server.as_deref()).context("Failed to resolve the gateway URL")?;

    execute(&cli.command, config).await
}
