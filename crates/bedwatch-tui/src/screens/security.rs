//! Security screen — every retained security event with a risk summary.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use bedwatch_core::{RiskLevel, SecurityEvent, Snapshot, ThreatSummary};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::panel::panel;

const PAGE: isize = 10;

pub struct SecurityScreen {
    focused: bool,
    events: Snapshot<SecurityEvent>,
    summary: Arc<ThreatSummary>,
    selected: usize,
}

impl SecurityScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            events: Arc::default(),
            summary: Arc::default(),
            selected: 0,
        }
    }

    fn select_by(&mut self, delta: isize) {
        let last = self.events.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let s = &self.summary;
        let mut spans = vec![
            Span::styled(" Threat level ", theme::label()),
            Span::styled(s.level.to_string(), theme::risk_style(s.level)),
            Span::styled("   Total ", theme::label()),
            Span::styled(s.total.to_string(), theme::value()),
            Span::styled("   Unresolved ", theme::label()),
            Span::styled(s.unresolved.to_string(), theme::value()),
            Span::raw("  "),
        ];
        for risk in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
            spans.push(Span::styled(format!(" {risk} "), theme::label()));
            spans.push(Span::styled(
                s.count(risk).to_string(),
                theme::risk_style(risk),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new([
            "Time",
            "Threat Type",
            "Detail",
            "Priority",
            "Username",
            "IP",
            "Risk",
            "Status",
        ])
        .style(theme::table_header());

        let rows = self.events.iter().map(|event| {
            let (status, status_color) = if event.resolved {
                ("resolved", theme::GREEN)
            } else {
                ("open", theme::YELLOW)
            };
            Row::new(vec![
                Cell::from(event.timestamp.format("%H:%M:%S").to_string())
                    .style(Style::default().fg(theme::MUTED)),
                Cell::from(event.threat_type.to_string()),
                Cell::from(event.detail.clone()),
                Cell::from(event.priority.to_string()),
                Cell::from(event.username.clone()),
                Cell::from(event.ip.clone()).style(Style::default().fg(theme::PINK)),
                Cell::from(event.risk.to_string()).style(theme::risk_style(event.risk)),
                Cell::from(status).style(Style::default().fg(status_color)),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Length(8),
            Constraint::Length(22),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(15),
            Constraint::Length(6),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .fg(theme::ACCENT)
                    .bg(theme::BG_HIGHLIGHT),
            );
        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Component for SecurityScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => Action::ScrollDown,
            (_, KeyCode::Char('k') | KeyCode::Up) => Action::ScrollUp,
            (_, KeyCode::Char('g') | KeyCode::Home) => Action::ScrollToTop,
            (_, KeyCode::Char('G') | KeyCode::End) => Action::ScrollToBottom,
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                Action::PageDown
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => Action::PageUp,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SecurityEventsUpdated(events) => {
                self.events = Arc::clone(events);
                self.select_by(0);
            }
            Action::ThreatSummaryUpdated(summary) => self.summary = Arc::clone(summary),
            Action::ScrollDown => self.select_by(1),
            Action::ScrollUp => self.select_by(-1),
            Action::PageDown => self.select_by(PAGE),
            Action::PageUp => self.select_by(-PAGE),
            Action::ScrollToTop => self.selected = 0,
            Action::ScrollToBottom => self.selected = self.events.len().saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(
            &format!("Security Events ({})", self.events.len()),
            self.focused,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // summary
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // table
        ])
        .split(inner);

        self.render_summary(frame, layout[0]);
        if self.events.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No security events to display.",
                    theme::label(),
                )),
                layout[2],
            );
        } else {
            self.render_table(frame, layout[2]);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bedwatch_core::{Generator, threat_summary};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{render_to_string, snapshot};

    fn populated(n: usize) -> (SecurityScreen, Vec<SecurityEvent>) {
        let mut generator = Generator::from_seed(Some(4));
        let events: Vec<_> = (0..n).map(|_| generator.generate_security_event()).collect();
        let mut screen = SecurityScreen::new();
        screen
            .update(&Action::ThreatSummaryUpdated(Arc::new(threat_summary(&events))))
            .unwrap();
        screen
            .update(&Action::SecurityEventsUpdated(snapshot(events.clone())))
            .unwrap();
        (screen, events)
    }

    #[test]
    fn empty_table_has_placeholder() {
        let text = render_to_string(&SecurityScreen::new(), 140, 20);
        assert!(text.contains("Security Events (0)"));
        assert!(text.contains("No security events to display."));
        assert!(text.contains("Threat level Low"));
    }

    #[test]
    fn every_event_is_listed() {
        let (screen, events) = populated(5);
        let text = render_to_string(&screen, 160, 20);
        assert!(text.contains("Security Events (5)"));
        assert!(text.contains("Threat Type"));
        for event in &events {
            assert!(text.contains(&event.ip), "missing {}", event.ip);
        }
    }

    #[test]
    fn selection_stays_in_bounds() {
        let (mut screen, _) = populated(3);
        screen.update(&Action::PageDown).unwrap();
        assert_eq!(screen.selected, 2);
        screen.update(&Action::ScrollUp).unwrap();
        assert_eq!(screen.selected, 1);
        screen.update(&Action::PageUp).unwrap();
        assert_eq!(screen.selected, 0);

        screen.update(&Action::ScrollToBottom).unwrap();
        screen
            .update(&Action::SecurityEventsUpdated(snapshot(Vec::new())))
            .unwrap();
        assert_eq!(screen.selected, 0);
    }
}
