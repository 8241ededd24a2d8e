//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use bedwatch_core::RiskLevel;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Applies the palette only when color is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn heading(self, text: &str) -> String {
        if self.enabled {
            text.bold().cyan().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn risk(self, risk: RiskLevel) -> String {
        let text = risk.to_string();
        if !self.enabled {
            return text;
        }
        match risk {
            RiskLevel::High => text.red().bold().to_string(),
            RiskLevel::Medium => text.yellow().to_string(),
            RiskLevel::Low => text.green().to_string(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item views don't map onto one `Tabled` row.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Two-column `Field │ Value` table for detail views.
pub fn render_kv(pairs: &[(&str, String)]) -> String {
    #[derive(Tabled)]
    struct Kv<'a> {
        #[tabled(rename = "Field")]
        field: &'a str,
        #[tabled(rename = "Value")]
        value: &'a str,
    }
    let rows: Vec<Kv> = pairs
        .iter()
        .map(|(field, value)| Kv {
            field,
            value: value.as_str(),
        })
        .collect();
    render_table(&rows)
}

/// Pretty-printed JSON.
pub fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Compact single-line JSON.
pub fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(data)?)
}

/// YAML output.
pub fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        hits: u32,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: &'static str,
        #[tabled(rename = "Hits")]
        hits: u32,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: "a", hits: 1 }, Item { id: "b", hits: 2 }]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| ItemRow {
                id: i.id,
                hits: i.hits,
            },
            |i| i.id.to_owned(),
        )
        .unwrap()
    }

    #[test]
    fn list_formats() {
        let table = render(OutputFormat::Table);
        assert!(table.contains("ID"));
        assert!(table.contains("Hits"));

        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"id":"a","hits":1},{"id":"b","hits":2}]"#
        );
        assert!(render(OutputFormat::Yaml).contains("- id: a"));
        assert_eq!(render(OutputFormat::Plain), "a\nb");
    }

    #[test]
    fn kv_table_lists_every_pair() {
        let out = render_kv(&[("Total", "3".into()), ("Level", "High".into())]);
        assert!(out.contains("Field"));
        assert!(out.contains("Total"));
        assert!(out.contains("High"));
    }

    #[test]
    fn painter_is_transparent_when_disabled() {
        let painter = Painter::new(false);
        assert_eq!(painter.heading("Metrics"), "Metrics");
        assert_eq!(painter.risk(RiskLevel::High), "High");
        assert!(Painter::new(true).risk(RiskLevel::High).contains("\u{1b}["));
    }
}
