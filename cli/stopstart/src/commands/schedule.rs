//! Schedule commands (read, replace, reset an instance's stop/start config).

use anyhow::Result;
use clap::{Args, Subcommand};
use stopstart_api::instance_config::{
    delete_instance_config, fetch_instance_config, save_instance_config,
};
use stopstart_api::{ApiClient, InstanceConfig, RequestError, Weekday};

use crate::error::CliError;
use crate::form::parse_time_input;
use crate::output::{print_info, print_json, print_rendered, print_success, OutputFormat};
use crate::view::render_schedule;

use super::CommandContext;

/// Schedule commands.
#[derive(Debug, Args)]
pub struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleSubcommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleSubcommand {
    /// Show an instance's schedule.
    Get(GetArgs),

    /// Change fields and write the whole schedule back.
    Set(SetArgs),

    /// Remove an instance's schedule.
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
struct GetArgs {
    /// Instance ID.
    instance: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Instance ID.
    instance: String,

    /// Enable the automation.
    #[arg(long, conflicts_with = "disabled")]
    enabled: bool,

    /// Disable the automation.
    #[arg(long)]
    disabled: bool,

    /// IANA timezone (e.g. America/Sao_Paulo).
    #[arg(long)]
    timezone: Option<String>,

    /// Start time, HH:MM ('-' clears).
    #[arg(long, value_parser = parse_time_arg)]
    start: Option<TimeArg>,

    /// Stop time, HH:MM ('-' clears).
    #[arg(long, value_parser = parse_time_arg)]
    stop: Option<TimeArg>,

    /// Active days, comma separated (e.g. MON,TUE,FRI; '-' clears).
    #[arg(long, value_parser = parse_days_arg)]
    days: Option<Days>,
}

#[derive(Debug, Args)]
struct ResetArgs {
    /// Instance ID.
    instance: String,
}

/// Replacement time; `None` clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TimeArg(Option<String>);

/// Replacement day list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Days(Vec<Weekday>);

fn parse_time_arg(value: &str) -> Result<TimeArg, String> {
    parse_time_input(value)
        .map(TimeArg)
        .map_err(|e| e.to_string())
}

fn parse_days_arg(value: &str) -> Result<Days, String> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return Ok(Days(Vec::new()));
    }

    let mut days = Vec::new();
    for part in value.split(',') {
        let day = part.parse::<Weekday>().map_err(|e| e.to_string())?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(Days(days))
}

impl ScheduleCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ScheduleSubcommand::Get(args) => get(ctx, args).await,
            ScheduleSubcommand::Set(args) => set(ctx, args).await,
            ScheduleSubcommand::Reset(args) => reset(ctx, args).await,
        }
    }
}

/// Fetch the schedule, falling back to the default draft when nothing is
/// stored. Returns whether a stored schedule was found.
async fn fetch_or_default(
    client: &ApiClient,
    instance_id: &str,
) -> Result<(InstanceConfig, bool)> {
    let fetched = fetch_instance_config(client, instance_id).await;
    stored_or_default(instance_id, fetched).map_err(|e| CliError::from(e).into())
}

/// A 404 and a body flagged `configurado: false` both mean "not configured
/// yet". Any other failure is returned.
fn stored_or_default(
    instance_id: &str,
    fetched: Result<InstanceConfig, RequestError>,
) -> Result<(InstanceConfig, bool), RequestError> {
    match fetched {
        Ok(config) if config.is_unconfigured() => {
            Ok((InstanceConfig::default_for(instance_id), false))
        }
        Ok(mut config) => {
            config.instance_id = instance_id.to_string();
            Ok((config, true))
        }
        Err(err) if err.is_not_found() => Ok((InstanceConfig::default_for(instance_id), false)),
        Err(err) => Err(err),
    }
}

impl SetArgs {
    /// Apply the given flags to `draft`; fields without a flag are kept.
    fn apply(&self, draft: &mut InstanceConfig) {
        if self.enabled {
            draft.enabled = true;
        }
        if self.disabled {
            draft.enabled = false;
        }
        if let Some(timezone) = &self.timezone {
            draft.timezone = timezone.clone();
        }
        if let Some(TimeArg(start)) = &self.start {
            draft.start_time = start.clone();
        }
        if let Some(TimeArg(stop)) = &self.stop {
            draft.stop_time = stop.clone();
        }
        if let Some(Days(days)) = &self.days {
            draft.days_of_week = days.clone();
        }
    }
}

async fn get(ctx: CommandContext, args: GetArgs) -> Result<()> {
    let client = ctx.client()?;
    let (config, found) = fetch_or_default(&client, &args.instance).await?;

    if !found && ctx.format == OutputFormat::Table {
        print_info("Instância sem configuração; exibindo valores padrão.");
    }
    print_rendered(&config, &render_schedule(&config), ctx.format);
    Ok(())
}

async fn set(ctx: CommandContext, args: SetArgs) -> Result<()> {
    let client = ctx.client()?;
    let (mut draft, _) = fetch_or_default(&client, &args.instance).await?;
    args.apply(&mut draft);

    let saved = save_instance_config(&client, &args.instance, &draft)
        .await
        .map_err(|e| {
            CliError::not_found_as(e, format!("instância '{}'", args.instance))
        })?;

    match ctx.format {
        OutputFormat::Json => print_json(&saved),
        OutputFormat::Table => {
            print_success(&format!("Configuração de {} salva", args.instance));
            println!("{}", render_schedule(&saved));
        }
    }
    Ok(())
}

async fn reset(ctx: CommandContext, args: ResetArgs) -> Result<()> {
    let client = ctx.client()?;
    delete_instance_config(&client, &args.instance)
        .await
        .map_err(|e| {
            CliError::not_found_as(e, format!("instância '{}'", args.instance))
        })?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "ok": true })),
        OutputFormat::Table => {
            print_success(&format!("Configuração de {} removida", args.instance))
        }
    }
    Ok(())
}
