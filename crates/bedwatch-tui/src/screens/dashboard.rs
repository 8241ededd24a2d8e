//! Dashboard screen — live overview of the simulated traffic.
//!
//! Layout:
//! ┌─ Real-Time GenAI Security Monitoring ──────────── ● LIVE · N requests ┐
//! ├─ Model Information (latest request) ──────────────────────────────────┤
//! │ ┌─ Real-Time Metrics ─┐ ┌─ Overall Threat Level ─┐ ┌─ Threat Types ─┐ │
//! │ └─────────────────────┘ └────────────────────────┘ └────────────────┘ │
//! │ ┌─ Recent Chat (6) ───────────┐ ┌─ Security Events (10) ─────────────┐ │
//! │ └─────────────────────────────┘ └────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use bedwatch_core::{
    AggregateMetrics, BedrockLog, ChatMessage, MonitorState, RiskLevel, SecurityEvent, Snapshot,
    ThreatSummary,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{fmt_count, fmt_latency, truncate};
use crate::widgets::panel::{kv_line, panel};

const RECENT_CHAT: usize = 6;
const RECENT_EVENTS: usize = 10;

pub struct DashboardScreen {
    focused: bool,
    state: MonitorState,
    logs: Snapshot<BedrockLog>,
    events: Snapshot<SecurityEvent>,
    chat: Snapshot<ChatMessage>,
    metrics: Option<Arc<AggregateMetrics>>,
    threat: Arc<ThreatSummary>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: MonitorState::Idle,
            logs: Arc::default(),
            events: Arc::default(),
            chat: Arc::default(),
            metrics: None,
            threat: Arc::default(),
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status = match self.state {
            MonitorState::Running => Span::styled("● LIVE", Style::default().fg(theme::GREEN)),
            MonitorState::Stopped => Span::styled("❚❚ PAUSED", Style::default().fg(theme::YELLOW)),
            MonitorState::Idle => Span::styled("○ starting", Style::default().fg(theme::MUTED)),
        };
        let line = Line::from(vec![
            Span::styled(
                " Real-Time GenAI Security Monitoring   ",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            status,
            Span::styled(
                format!(" · {} requests monitored", self.logs.len()),
                theme::label(),
            ),
        ]);
        let block = panel("bedwatch", self.focused);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_model_info(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Model Information", false);
        let Some(latest) = self.logs.first() else {
            let waiting = Line::from(Span::styled(
                "  Waiting for the first request...",
                theme::label(),
            ));
            frame.render_widget(Paragraph::new(waiting).block(block), area);
            return;
        };

        let live_tokens = self.metrics.as_ref().map_or(0, |m| m.total_tokens);
        let cols = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(block.inner(area));
        frame.render_widget(block, area);

        let left = vec![
            kv_line(
                "Model ID",
                Span::styled(latest.model_id.as_str(), theme::value()),
            ),
            kv_line("Operation", latest.operation.as_str()),
            kv_line("User", latest.username()),
        ];
        let right = vec![
            kv_line("Region", latest.region.as_str()),
            kv_line("Inference", latest.inference_region.as_str()),
            kv_line(
                "Live Tokens",
                Span::styled(fmt_count(live_tokens), theme::value()),
            ),
        ];
        frame.render_widget(Paragraph::new(left), cols[0]);
        frame.render_widget(Paragraph::new(right), cols[1]);
    }

    fn render_metrics(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Real-Time Metrics", false);
        let lines = match self.metrics.as_deref() {
            Some(m) => vec![
                kv_line(
                    "Requests",
                    Span::styled(fmt_count(m.total_requests), theme::value()),
                ),
                kv_line(
                    "Total Tokens",
                    Span::styled(fmt_count(m.total_tokens), theme::value()),
                ),
                kv_line(
                    "Input/Output",
                    format!(
                        "{} / {}",
                        fmt_count(m.total_input_tokens),
                        fmt_count(m.total_output_tokens)
                    ),
                ),
                kv_line(
                    "Avg Latency",
                    Span::styled(fmt_latency(m.avg_latency), theme::value()),
                ),
                kv_line(
                    "Error Rate",
                    Span::styled(
                        format!("{}%", m.error_rate),
                        Style::default().fg(theme::GREEN),
                    ),
                ),
                kv_line("Active Models", m.unique_models.to_string()),
            ],
            None => vec![Line::from(Span::styled("  No data available", theme::label()))],
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_threat_level(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Overall Threat Level", false);
        let t = &self.threat;
        let verdict = match t.level {
            RiskLevel::Low => "All clear. Your application is secure.",
            RiskLevel::Medium => "Open medium-risk events need review.",
            RiskLevel::High => "High-risk threats are unresolved.",
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("  Level         ", theme::label()),
                Span::styled(t.level.to_string(), theme::risk_style(t.level)),
            ]),
            Line::from(""),
            risk_count_line(RiskLevel::High, t.high),
            risk_count_line(RiskLevel::Medium, t.medium),
            risk_count_line(RiskLevel::Low, t.low),
            kv_line("Unresolved", format!("{} of {}", t.unresolved, t.total)),
            Line::from(Span::styled(
                format!("  {verdict}"),
                Style::default().fg(theme::risk_color(t.level)),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_threat_types(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Threat Types", false);
        let mut lines: Vec<Line> = self
            .threat
            .by_threat
            .iter()
            .map(|(threat, count)| {
                Line::from(vec![
                    Span::styled(format!("  {:<24}", threat.to_string()), theme::table_row()),
                    Span::styled(count.to_string(), theme::value()),
                ])
            })
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No threats detected",
                theme::label(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_recent_chat(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Recent Chat", false);
        let width = usize::from(block.inner(area).width.saturating_sub(24)).max(10);
        let mut lines: Vec<Line> = self
            .chat
            .iter()
            .take(RECENT_CHAT)
            .map(|msg| {
                Line::from(vec![
                    Span::styled(format!("  {} ", msg.time), theme::label()),
                    Span::styled(
                        format!("{:<10}", format!("{}:", msg.role.label())),
                        theme::chat_role_style(msg.role),
                    ),
                    Span::styled(truncate(&msg.content, width), theme::table_row()),
                ])
            })
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No recent chat messages",
                theme::label(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_recent_events(&self, frame: &mut Frame, area: Rect) {
        let block = panel("Security Events", false);
        if self.events.is_empty() {
            let empty = Line::from(Span::styled("  No security events", theme::label()));
            frame.render_widget(Paragraph::new(empty).block(block), area);
            return;
        }

        let header = Row::new(["Threat Type", "Detail", "Priority", "Username", "Risk"])
            .style(theme::table_header());
        let rows = self.events.iter().take(RECENT_EVENTS).map(|event| {
            Row::new(vec![
                Cell::from(event.threat_type.to_string()),
                Cell::from(event.detail.clone()),
                Cell::from(event.priority.to_string()),
                Cell::from(event.username.clone()),
                Cell::from(event.risk.to_string()).style(theme::risk_style(event.risk)),
            ])
            .style(theme::table_row())
        });
        let widths = [
            Constraint::Length(22),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(6),
        ];
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}

fn risk_count_line(risk: RiskLevel, count: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", risk.to_string()), theme::label()),
        Span::styled(count.to_string(), theme::risk_style(risk)),
    ])
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LogsUpdated(logs) => self.logs = Arc::clone(logs),
            Action::SecurityEventsUpdated(events) => self.events = Arc::clone(events),
            Action::ChatUpdated(chat) => self.chat = Arc::clone(chat),
            Action::MetricsUpdated(metrics) => self.metrics.clone_from(metrics),
            Action::ThreatSummaryUpdated(summary) => self.threat = Arc::clone(summary),
            Action::MonitorStateChanged(state) => self.state = *state,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),  // header
            Constraint::Length(5),  // model information
            Constraint::Length(10), // metrics / threat level / threat types
            Constraint::Min(6),     // chat + events
        ])
        .split(area);

        self.render_header(frame, rows[0]);
        self.render_model_info(frame, rows[1]);

        let middle = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[2]);
        self.render_metrics(frame, middle[0]);
        self.render_threat_level(frame, middle[1]);
        self.render_threat_types(frame, middle[2]);

        let bottom = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[3]);
        self.render_recent_chat(frame, bottom[0]);
        self.render_recent_events(frame, bottom[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
