//! stopstart - browse compartments and edit instance stop/start schedules.

use anyhow::Result;
use clap::Parser;

use stopstart_cli::commands::Cli;
use stopstart_cli::{error, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json());

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
