//! `simulate` handler: drive the producer by hand and report the feeds.

use std::sync::Arc;

use serde::Serialize;

use bedwatch_core::{AggregateMetrics, Monitor, RiskLevel, ThreatSummary};

use crate::cli::SimulateArgs;
use crate::commands::Ctx;
use crate::commands::metrics::{NO_DATA, metrics_detail};
use crate::error::CliError;
use crate::output::{self, Painter};

/// Feed state after a simulation run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub ticks: usize,
    pub logs_generated: usize,
    pub security_events_generated: usize,
    pub logs: usize,
    pub security_events: usize,
    pub chat_messages: usize,
    pub metrics: Option<Arc<AggregateMetrics>>,
    pub threat_summary: Arc<ThreatSummary>,
}

/// Seed (unless `no_initial`), then run `ticks` producer steps.
pub async fn simulate(monitor: &Monitor, ticks: usize, no_initial: bool) -> SimulationReport {
    if !no_initial {
        monitor.seed().await;
    }

    let mut logs_generated = 0;
    let mut security_events_generated = 0;
    for _ in 0..ticks {
        let outcome = monitor.tick().await;
        logs_generated += usize::from(outcome.log);
        security_events_generated += usize::from(outcome.security_event);
    }
    tracing::info!(ticks, logs_generated, security_events_generated, "simulation done");

    SimulationReport {
        ticks,
        logs_generated,
        security_events_generated,
        logs: monitor.logs_snapshot().len(),
        security_events: monitor.security_events_snapshot().len(),
        chat_messages: monitor.chat_snapshot().len(),
        metrics: monitor.metrics(),
        threat_summary: monitor.threat_summary(),
    }
}

fn report_detail(r: &SimulationReport, painter: Painter) -> String {
    let feeds = output::render_kv(&[
        ("Ticks", r.ticks.to_string()),
        ("Logs Generated", r.logs_generated.to_string()),
        ("Events Generated", r.security_events_generated.to_string()),
        ("Logs Retained", r.logs.to_string()),
        ("Events Retained", r.security_events.to_string()),
        ("Chat Retained", r.chat_messages.to_string()),
    ]);

    let t = &r.threat_summary;
    let threats = output::render_kv(&[
        ("Threat Level", painter.risk(t.level)),
        ("Total", t.total.to_string()),
        ("Unresolved", t.unresolved.to_string()),
        ("High", t.count(RiskLevel::High).to_string()),
        ("Medium", t.count(RiskLevel::Medium).to_string()),
        ("Low", t.count(RiskLevel::Low).to_string()),
    ]);

    let metrics = r
        .metrics
        .as_deref()
        .map_or_else(|| NO_DATA.to_owned(), |m| metrics_detail(m, painter));

    format!(
        "{}\n{feeds}\n\n{}\n{threats}\n\n{}\n{metrics}",
        painter.heading("Feeds"),
        painter.heading("Threats"),
        painter.heading("Metrics"),
    )
}

pub async fn handle(args: &SimulateArgs, ctx: &Ctx) -> Result<(), CliError> {
    let monitor = Monitor::new(ctx.monitor.clone());
    let report = simulate(&monitor, args.ticks, args.no_initial).await;

    let out = output::render_single(
        ctx.format,
        &report,
        |r| report_detail(r, ctx.painter),
        |r| format!("{} {} {}", r.logs, r.security_events, r.chat_messages),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
