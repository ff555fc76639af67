//! Text rendering for the console.
//!
//! Every function here is a pure renderer: state in, `String` out. Positions
//! shown in lists are 1-based and are the numbers console actions take.

use std::fmt::Write;

use colored::Colorize;
use stopstart_api::{Compartment, Instance, InstanceConfig, Weekday};
use tabled::{Table, Tabled};

use crate::app::App;
use crate::form::ConfigForm;

pub const TITLE: &str = "Stop/Start OCI - Gerenciador de Instâncias";
pub const ROOT_LABEL: &str = "Raiz";
pub const ENTER_LABEL: &str = "Entrar";
pub const CONFIGURE_LABEL: &str = "Configurar";
pub const NO_COMPARTMENTS: &str = "Nenhum sub-compartment.";
pub const NO_INSTANCES: &str = "Nenhuma instância aqui.";
pub const LOADING: &str = "Carregando...";
pub const LOADING_CONFIG: &str = "Carregando configuração...";

#[derive(Tabled)]
struct CompartmentRow<'a> {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Nome")]
    name: &'a str,
    #[tabled(rename = "Ação")]
    action: &'static str,
}

#[derive(Tabled)]
struct InstanceRow<'a> {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Nome")]
    name: &'a str,
    #[tabled(rename = "Região")]
    region: &'a str,
    #[tabled(rename = "Estado")]
    lifecycle_state: &'a str,
    #[tabled(rename = "Ação")]
    action: &'static str,
}

/// Root entry followed by one numbered entry per breadcrumb compartment.
pub fn render_breadcrumb(breadcrumb: &[Compartment]) -> String {
    let mut out = ROOT_LABEL.to_string();
    for (i, compartment) in breadcrumb.iter().enumerate() {
        let _ = write!(out, " / [{}] {}", i + 1, compartment.name);
    }
    out
}

pub fn render_compartments(compartments: &[Compartment]) -> String {
    if compartments.is_empty() {
        return NO_COMPARTMENTS.dimmed().to_string();
    }

    let rows: Vec<CompartmentRow<'_>> = compartments
        .iter()
        .enumerate()
        .map(|(i, c)| CompartmentRow {
            position: i + 1,
            name: &c.name,
            action: ENTER_LABEL,
        })
        .collect();

    format!("{}\n{}", "Sub-compartments".bold(), Table::new(rows))
}

pub fn render_instances(instances: &[Instance]) -> String {
    if instances.is_empty() {
        return NO_INSTANCES.dimmed().to_string();
    }

    let rows: Vec<InstanceRow<'_>> = instances
        .iter()
        .enumerate()
        .map(|(i, inst)| InstanceRow {
            position: i + 1,
            name: &inst.name,
            region: &inst.region,
            lifecycle_state: &inst.lifecycle_state,
            action: CONFIGURE_LABEL,
        })
        .collect();

    format!("{}\n{}", "Instâncias".bold(), Table::new(rows))
}

fn render_time(value: Option<&str>) -> &str {
    value.unwrap_or("--:--")
}

fn render_days(selected: &[Weekday]) -> String {
    Weekday::ALL
        .iter()
        .map(|day| {
            let mark = if selected.contains(day) { "x" } else { " " };
            format!("[{}] {} {}", mark, day.code(), day.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// The schedule form for one instance.
pub fn render_config_form(form: &ConfigForm) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("Configuração – {}", form.instance().name).bold()
    );

    let Some(draft) = form.draft() else {
        let _ = write!(out, "{}", LOADING_CONFIG);
        return out;
    };

    let enabled = if draft.enabled { "x" } else { " " };
    let _ = writeln!(out, "[{}] Habilitar automação", enabled);
    let _ = writeln!(out, "Timezone: {}", draft.timezone);
    let _ = writeln!(
        out,
        "Horário de Start: {}",
        render_time(draft.start_time.as_deref())
    );
    let _ = writeln!(
        out,
        "Horário de Stop: {}",
        render_time(draft.stop_time.as_deref())
    );
    let _ = writeln!(out, "Dias da semana: {}", render_days(&draft.days_of_week));

    if let Some(error) = form.error() {
        let _ = writeln!(out, "{}", error.red());
    }

    let submit = if form.is_saving() { "Salvando..." } else { "Salvar" };
    let controls = format!("[Cancelar] [{}]", submit);
    if form.can_submit() {
        let _ = write!(out, "{}", controls);
    } else {
        let _ = write!(out, "{}", controls.dimmed());
    }

    out
}

/// A saved schedule, as shown by the one-shot commands.
pub fn render_schedule(config: &InstanceConfig) -> String {
    let yes_no = |v: bool| if v { "sim" } else { "não" };
    let days = if config.days_of_week.is_empty() {
        "-".to_string()
    } else {
        config
            .days_of_week
            .iter()
            .map(Weekday::code)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "Instância: {}", config.instance_id);
    let _ = writeln!(out, "Habilitado: {}", yes_no(config.enabled));
    let _ = writeln!(out, "Timezone: {}", config.timezone);
    let _ = writeln!(out, "Start: {}", render_time(config.start_time.as_deref()));
    let _ = writeln!(out, "Stop: {}", render_time(config.stop_time.as_deref()));
    let _ = write!(out, "Dias: {}", days);
    if let Some(configured) = config.configured {
        let _ = write!(out, "\nConfigurado: {}", yes_no(configured));
    }
    out
}

/// Full console screen.
pub fn render_app(app: &App) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE.bold());
    let _ = writeln!(out, "{}", render_breadcrumb(app.breadcrumb()));

    if app.is_loading() {
        let _ = writeln!(out, "{}", LOADING);
    }
    if let Some(error) = app.error() {
        let _ = writeln!(out, "{}", error.red());
    }

    if !app.is_loading() {
        let _ = writeln!(out, "{}", render_compartments(app.child_compartments()));
        let _ = writeln!(out, "{}", render_instances(app.instances()));
    }

    if let Some(form) = app.config_form() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", render_config_form(form));
    }

    out
}
