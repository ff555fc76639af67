//! Output formatting for one-shot commands.

use colored::Colorize;
use serde::Serialize;

const CLI_SCHEMA_VERSION: &str = "stopstart.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Print rendered text in table mode, or `data` as JSON.
pub fn print_rendered<T: Serialize>(data: &T, rendered: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", rendered),
        OutputFormat::Json => print_json(data),
    }
}

/// Print a value as schema-wrapped JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    println!("{}", format_json(data));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{}", success_line(message));
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{}", info_line(message));
}

/// Success line shared by the one-shot commands and the console.
pub fn success_line(message: &str) -> String {
    format!("{} {}", "Sucesso:".green().bold(), message)
}

fn info_line(message: &str) -> String {
    format!("{} {}", "Info:".blue().bold(), message)
}

fn format_json<T: Serialize + ?Sized>(data: &T) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    });
    serde_json::to_string_pretty(&wrapped).unwrap_or_else(|_| "{}".to_string())
}
