//! Health command.

use anyhow::Result;
use stopstart_api::health::check_health;

use crate::output::{print_json, print_success, OutputFormat};

use super::CommandContext;

pub async fn run(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let health = check_health(&client).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&health),
        OutputFormat::Table if health.is_ok() => {
            print_success(&format!("API em {} está no ar", client.base_url()))
        }
        OutputFormat::Table => anyhow::bail!("API respondeu com status '{}'", health.status),
    }

    Ok(())
}
