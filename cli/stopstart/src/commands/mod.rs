//! CLI commands.

mod console;
mod context;
mod health;
mod nav;
mod schedule;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stopstart_api::ApiClient;

use crate::config::{Config, API_URL_ENV};
use crate::output::OutputFormat;

/// stopstart - browse compartments and edit instance stop/start schedules.
#[derive(Debug, Parser)]
#[command(name = "stopstart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// API base URL. Overrides the saved config.
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Emit logs as JSON (filter with STOPSTART_LOG).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive console (breadcrumb, lists, schedule form).
    Console(console::ConsoleCommand),

    /// Show one level of the compartment tree.
    Nav(nav::NavArgs),

    /// Read or change an instance's stop/start schedule.
    Config(schedule::ScheduleCommand),

    /// Check that the API is up.
    Health,

    /// Show or change saved settings.
    Context(context::ContextCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Whether logs should be emitted as JSON.
    pub fn log_json(&self) -> bool {
        self.log_json
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }

        let ctx = CommandContext {
            config,
            format: OutputFormat::parse(&self.format),
        };

        match self.command {
            Commands::Console(cmd) => cmd.run(ctx).await,
            Commands::Nav(args) => nav::run(ctx, args).await,
            Commands::Config(cmd) => cmd.run(ctx).await,
            Commands::Health => health::run(ctx).await,
            Commands::Context(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("stopstart {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Get an API client for the configured endpoint.
    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config.api_url)?)
    }
}
