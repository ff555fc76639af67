//! Interactive console command.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::io::BufReader;
use tracing::info;

use crate::console::Console;

use super::CommandContext;

/// Open the interactive console at the root compartment.
#[derive(Debug, Args)]
pub struct ConsoleCommand {}

impl ConsoleCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;
        info!(api_url = %client.base_url(), "Starting console");

        let console = Console::start(Arc::new(client));
        console
            .run(BufReader::new(tokio::io::stdin()), std::io::stdout())
            .await
    }
}
