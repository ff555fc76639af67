//! Navigation command (one level of the compartment tree).

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use stopstart_api::navigation::fetch_navigation_level;
use stopstart_api::{Compartment, Instance, NavigationLevel};
use tabled::{Table, Tabled};

use crate::error::CliError;
use crate::output::print_rendered;
use crate::view::{render_breadcrumb, NO_COMPARTMENTS, NO_INSTANCES};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct NavArgs {
    /// Compartment ID (omit for the root level).
    #[arg(long)]
    compartment: Option<String>,
}

#[derive(Tabled)]
struct CompartmentRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Nome")]
    name: &'a str,
    #[tabled(rename = "OCID")]
    ocid: &'a str,
}

impl<'a> From<&'a Compartment> for CompartmentRow<'a> {
    fn from(c: &'a Compartment) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            ocid: &c.ocid,
        }
    }
}

#[derive(Tabled)]
struct InstanceRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Nome")]
    name: &'a str,
    #[tabled(rename = "Região")]
    region: &'a str,
    #[tabled(rename = "Estado")]
    lifecycle_state: &'a str,
}

impl<'a> From<&'a Instance> for InstanceRow<'a> {
    fn from(i: &'a Instance) -> Self {
        Self {
            id: &i.id,
            name: &i.name,
            region: &i.region,
            lifecycle_state: &i.lifecycle_state,
        }
    }
}

/// Breadcrumb plus ID-bearing tables, for scripting against other commands.
fn render_level(level: &NavigationLevel) -> String {
    let mut sections = vec![render_breadcrumb(&level.breadcrumb)];

    sections.push("Sub-compartments".bold().to_string());
    if level.child_compartments.is_empty() {
        sections.push(NO_COMPARTMENTS.dimmed().to_string());
    } else {
        let rows: Vec<CompartmentRow<'_>> =
            level.child_compartments.iter().map(Into::into).collect();
        sections.push(Table::new(rows).to_string());
    }

    sections.push("Instâncias".bold().to_string());
    if level.instances.is_empty() {
        sections.push(NO_INSTANCES.dimmed().to_string());
    } else {
        let rows: Vec<InstanceRow<'_>> = level.instances.iter().map(Into::into).collect();
        sections.push(Table::new(rows).to_string());
    }

    sections.join("\n")
}

pub async fn run(ctx: CommandContext, args: NavArgs) -> Result<()> {
    let client = ctx.client()?;
    let compartment = args.compartment.as_deref();

    let level = fetch_navigation_level(&client, compartment)
        .await
        .map_err(|e| {
            CliError::not_found_as(
                e,
                format!("compartment '{}'", compartment.unwrap_or("raiz")),
            )
        })?;

    print_rendered(&level, &render_level(&level), ctx.format);
    Ok(())
}
