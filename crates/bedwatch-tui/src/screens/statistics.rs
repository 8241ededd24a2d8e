//! Statistics screen — per-model performance and traffic distributions.
//!
//! Layout:
//! ┌─ Model Performance ─────────────────┐ ┌─ Regions ─────────────────────┐
//! │ Model  Requests  Avg Latency  ...   │ │ us-east-1  ██████████░░  60%   │
//! │                                     │ ├─ Operations ──────────────────┤
//! │                                     │ │ Converse   ████████████ 100%   │
//! └─────────────────────────────────────┘ └───────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Gauge, Paragraph, Row, Table};

use bedwatch_core::{AggregateMetrics, ModelStats, distribution_share};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_count, truncate};
use crate::widgets::panel::panel;

pub struct StatisticsScreen {
    focused: bool,
    metrics: Option<Arc<AggregateMetrics>>,
    model_stats: Arc<Vec<ModelStats>>,
}

impl StatisticsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            metrics: None,
            model_stats: Arc::default(),
        }
    }

    fn render_models(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Model Performance", self.focused);
        if self.model_stats.is_empty() {
            let empty = Line::from(Span::styled("  No model data available", theme::label()));
            frame.render_widget(Paragraph::new(empty).block(block), area);
            return;
        }

        let header = Row::new([
            "Model",
            "Requests",
            "Avg Latency (ms)",
            "Avg Tokens",
            "Input",
            "Output",
        ])
        .style(theme::table_header());
        let rows = self.model_stats.iter().map(|s| {
            Row::new(vec![
                Cell::from(truncate(&s.model, 46)).style(Style::default().fg(theme::CYAN)),
                Cell::from(fmt_count(s.requests)),
                Cell::from(fmt_count(s.avg_latency())),
                Cell::from(fmt_count(s.avg_tokens_per_request())),
                Cell::from(fmt_count(s.input_tokens)),
                Cell::from(fmt_count(s.output_tokens)),
            ])
            .style(theme::table_row())
        });
        let widths = [
            Constraint::Min(44),
            Constraint::Length(9),
            Constraint::Length(17),
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Length(9),
        ];
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }
}

/// One gauge row per bucket, share of `total` as the ratio.
fn render_distribution(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    buckets: &IndexMap<String, u64>,
    total: u64,
) {
    let block = panel(title, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if buckets.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("  No data available", theme::label())),
            inner,
        );
        return;
    }

    let rows = Layout::vertical(vec![Constraint::Length(1); buckets.len()]).split(inner);
    for (i, ((name, count), row)) in buckets.iter().zip(rows.iter()).enumerate() {
        let cols =
            Layout::horizontal([Constraint::Length(22), Constraint::Min(10)]).split(*row);
        let share = distribution_share(*count, total);
        let color = theme::GAUGE_SERIES[i % theme::GAUGE_SERIES.len()];

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {:<14}", truncate(name, 14)), theme::table_row()),
                Span::styled(format!("{count:>5} "), theme::value()),
            ])),
            cols[0],
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT))
                .ratio((share / 100.0).clamp(0.0, 1.0))
                .label(format!("{share:.0}%")),
            cols[1],
        );
    }
}

impl Component for StatisticsScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MetricsUpdated(metrics) => self.metrics.clone_from(metrics),
            Action::ModelStatsUpdated(stats) => self.model_stats = Arc::clone(stats),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        self.render_models(frame, cols[0]);

        let empty = IndexMap::new();
        let (regions, operations, total) = match self.metrics.as_deref() {
            Some(m) => (
                &m.region_distribution,
                &m.operation_distribution,
                m.total_requests,
            ),
            None => (&empty, &empty, 0),
        };

        let region_height = u16::try_from(regions.len().max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let right = Layout::vertical([Constraint::Length(region_height), Constraint::Min(3)])
            .split(cols[1]);
        render_distribution(frame, right[0], "Regions", regions, total);
        render_distribution(frame, right[1], "Operations", operations, total);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
