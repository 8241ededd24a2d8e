//! `metrics` handler: aggregate a batch of generated logs.

use indexmap::IndexMap;
use tabled::Tabled;

use bedwatch_core::{AggregateMetrics, aggregate, distribution_share};

use crate::cli::{CountArgs, OutputFormat};
use crate::commands::Ctx;
use crate::commands::util::{check_batch, generate_logs};
use crate::error::CliError;
use crate::output::{self, Painter};

pub const NO_DATA: &str = "No data available (0 logs generated)";

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Requests")]
    count: u64,
    #[tabled(rename = "Share")]
    share: String,
}

fn share_table(distribution: &IndexMap<String, u64>, total: u64) -> String {
    let rows: Vec<ShareRow> = distribution
        .iter()
        .map(|(name, &count)| ShareRow {
            name: name.clone(),
            count,
            share: format!("{:.1}%", distribution_share(count, total)),
        })
        .collect();
    output::render_table(&rows)
}

/// Summary table followed by the region and operation breakdowns.
pub fn metrics_detail(m: &AggregateMetrics, painter: Painter) -> String {
    let summary = output::render_kv(&[
        ("Total Requests", m.total_requests.to_string()),
        ("Input Tokens", m.total_input_tokens.to_string()),
        ("Output Tokens", m.total_output_tokens.to_string()),
        ("Total Tokens", m.total_tokens.to_string()),
        ("Avg Latency (ms)", m.avg_latency.to_string()),
        ("Unique Models", m.unique_models.to_string()),
        ("Success Rate", format!("{}%", m.success_rate)),
        ("Error Rate", format!("{}%", m.error_rate)),
    ]);
    format!(
        "{summary}\n\n{}\n{}\n\n{}\n{}",
        painter.heading("Regions"),
        share_table(&m.region_distribution, m.total_requests),
        painter.heading("Operations"),
        share_table(&m.operation_distribution, m.total_requests),
    )
}

/// Render `metrics`, with an explicit message when there is nothing to show.
pub fn render_metrics(
    metrics: Option<&AggregateMetrics>,
    format: OutputFormat,
    painter: Painter,
) -> Result<String, CliError> {
    match (metrics, format) {
        (None, OutputFormat::Table | OutputFormat::Plain) => Ok(NO_DATA.to_owned()),
        (None, _) => output::render_single(format, &metrics, |_| String::new(), |_| String::new()),
        (Some(m), _) => output::render_single(
            format,
            m,
            |m| metrics_detail(m, painter),
            |m| m.total_requests.to_string(),
        ),
    }
}

pub fn handle(args: &CountArgs, ctx: &Ctx) -> Result<(), CliError> {
    check_batch("count", args.count)?;
    let logs = generate_logs(ctx.monitor.seed, args.count);
    let metrics = aggregate(&logs);
    tracing::debug!(logs = logs.len(), "aggregated generated logs");

    let out = render_metrics(metrics.as_ref(), ctx.format, ctx.painter)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_explicit() {
        let painter = Painter::new(false);
        assert_eq!(
            render_metrics(None, OutputFormat::Table, painter).unwrap(),
            NO_DATA
        );
        assert_eq!(
            render_metrics(None, OutputFormat::JsonCompact, painter).unwrap(),
            "null"
        );
    }

    #[test]
    fn detail_lists_distributions() {
        let logs = generate_logs(Some(3), 20);
        let metrics = aggregate(&logs).unwrap();
        let out = render_metrics(Some(&metrics), OutputFormat::Table, Painter::new(false)).unwrap();
        assert!(out.contains("Total Requests"));
        assert!(out.contains("Regions"));
        assert!(out.contains("Operations"));
        for region in metrics.region_distribution.keys() {
            assert!(out.contains(region.as_str()));
        }

        let plain = render_metrics(Some(&metrics), OutputFormat::Plain, Painter::new(false)).unwrap();
        assert_eq!(plain, "20");
    }
}
