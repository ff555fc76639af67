//! Context commands (saved settings).

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::config_path;
use crate::output::{print_json, print_success, OutputFormat};

use super::CommandContext;

/// Manage saved settings.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the effective settings.
    Show,

    /// Save the API base URL.
    SetApiUrl {
        /// API base URL (e.g. http://localhost:8000).
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct ContextView {
    api_url: String,
    config_path: Option<String>,
}

impl ContextCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(ctx),
            ContextSubcommand::SetApiUrl { url } => set_api_url(ctx, url),
        }
    }
}

fn show(ctx: CommandContext) -> Result<()> {
    let view = ContextView {
        api_url: ctx.config.api_url.clone(),
        config_path: config_path().ok().map(|p| p.display().to_string()),
    };

    match ctx.format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("config: {}", view.config_path.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}

fn set_api_url(mut ctx: CommandContext, url: String) -> Result<()> {
    let url = url.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        anyhow::bail!("a URL da API não pode ser vazia");
    }

    ctx.config.api_url = url;
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "api_url": ctx.config.api_url })),
        OutputFormat::Table => print_success(&format!("URL da API definida como {}", ctx.config.api_url)),
    }

    Ok(())
}
