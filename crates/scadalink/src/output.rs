//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits `field=value` lines.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Row types ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// One line of `scadalink tags`.
#[derive(Debug, Serialize, Tabled)]
pub struct TagRow {
    #[tabled(rename = "Tag")]
    pub tag: String,
    #[tabled(rename = "Controllable", display_with = "yes_no")]
    pub controllable: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn yes_no(flag: &bool) -> String {
    if *flag { "yes".into() } else { "no".into() }
}

/// A device-group snapshot as printed by `read` and `watch`.
#[derive(Debug, Serialize)]
pub struct StateReport<'a, S: Serialize> {
    pub group: &'a str,
    pub updated_at: Option<DateTime<Utc>>,
    pub state: &'a S,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a snapshot in the chosen format.
pub fn render_state<S: Serialize>(
    format: &OutputFormat,
    report: &StateReport<'_, S>,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows = state_fields(report.state)?
                .into_iter()
                .map(|(field, value)| FieldRow {
                    field,
                    value: format_value(&value, color),
                })
                .collect::<Vec<_>>();
            let stamp = report
                .updated_at
                .map_or_else(|| "never".to_owned(), |t| t.format("%H:%M:%S").to_string());
            let title = format!("{} (updated {stamp})", report.group);
            let title = if color { title.bold().to_string() } else { title };
            Ok(format!("{title}\n{}", render_table(&rows)))
        }
        OutputFormat::Json => render_json(report, false),
        OutputFormat::JsonCompact => render_json(report, true),
        OutputFormat::Yaml => render_yaml(report),
        OutputFormat::Plain => Ok(state_fields(report.state)?
            .into_iter()
            .map(|(field, value)| format!("{field}={}", format_value(&value, false)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render the tag list of a group.
pub fn render_tags(format: &OutputFormat, rows: &[TagRow]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(rows)),
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Yaml => render_yaml(rows),
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|r| r.tag.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render an arbitrary serializable value; `table` falls back to `text`.
pub fn render_single<T: Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => Ok(text(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
    let _ = stdout.flush();
}

// ── Format-specific renderers ────────────────────────────────────────

/// Field name/value pairs of a flat state record, in declaration order.
fn state_fields<S: Serialize>(state: &S) -> Result<Vec<(String, Value)>, CliError> {
    match serde_json::to_value(state).map_err(|e| CliError::Render(e.to_string()))? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Ok(vec![("value".to_owned(), other)]),
    }
}

fn format_value(value: &Value, color: bool) -> String {
    match value {
        Value::Bool(true) if color => "on".green().bold().to_string(),
        Value::Bool(false) if color => "off".dimmed().to_string(),
        Value::Bool(true) => "on".into(),
        Value::Bool(false) => "off".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
