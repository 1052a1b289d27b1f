use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use paramkit::error::ErrorResponse;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Outcome of checking one value bag.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Schema file or registry action the values were checked against.
    pub target: &'a str,
    pub mode: &'a str,
    pub valid: bool,
    /// HTTP status a handler would answer with.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl Report<'_> {
    fn detail(&self, key: &str) -> String {
        self.error
            .as_ref()
            .and_then(|err| err.info.as_ref())
            .and_then(|info| info.get(key))
            .and_then(|value| value.as_str())
            .unwrap_or("-")
            .to_string()
    }
}

pub fn print_report(report: &Report<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TARGET", "MODE", "RESULT", "FIELD", "RULE", "MESSAGE"]);
            let (result, message) = match &report.error {
                None => ("ok", "-".to_string()),
                Some(err) => ("invalid", err.message.clone()),
            };
            table.add_row(vec![
                report.target.to_string(),
                report.mode.to_string(),
                result.to_string(),
                report.detail("field"),
                report.detail("rule"),
                message,
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match &report.error {
            None => println!("ok: {} ({})", report.target, report.mode),
            Some(err) => println!(
                "invalid: {} ({}) field={} rule={} message={}",
                report.target,
                report.mode,
                report.detail("field"),
                report.detail("rule"),
                err.message
            ),
        },
    }
}

#[derive(Debug, Serialize)]
struct ActionsOutput<'a> {
    directory: String,
    actions: &'a [ActionRow<'a>],
}

/// One registered action and its declared parameters.
#[derive(Debug, Serialize)]
pub struct ActionRow<'a> {
    pub action: &'a str,
    pub fields: Vec<&'a str>,
}

pub fn print_actions(directory: &str, actions: &[ActionRow<'_>], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ActionsOutput {
            directory: directory.to_string(),
            actions,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ACTION", "FIELDS"]);
            for row in actions {
                table.add_row(vec![row.action.to_string(), row.fields.join(", ")]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in actions {
                println!("{}: {}", row.action, row.fields.join(", "));
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
