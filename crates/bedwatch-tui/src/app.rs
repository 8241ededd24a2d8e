//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bedwatch_core::{Monitor, MonitorState};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::BridgeCommand;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    /// Screen to return to on Esc.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    monitor_state: MonitorState,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    monitor: Monitor,
    data_cancel: CancellationToken,
    bridge: Option<JoinHandle<()>>,
    bridge_tx: mpsc::UnboundedSender<BridgeCommand>,
    /// Taken by the bridge task when `run` starts.
    bridge_rx: Option<mpsc::UnboundedReceiver<BridgeCommand>>,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (bridge_tx, bridge_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::Dashboard) {
            screen.set_focused(true);
        }

        Self {
            active_screen: ScreenId::Dashboard,
            previous_screen: None,
            screens,
            running: true,
            monitor_state: monitor.state(),
            help_visible: false,
            action_tx,
            action_rx,
            monitor,
            data_cancel: CancellationToken::new(),
            bridge: None,
            bridge_tx,
            bridge_rx: Some(bridge_rx),
            notification: None,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (w, h) = tui.size().unwrap_or((80, 24));
        debug!(width = w, height = h, "terminal ready");

        let monitor = self.monitor.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        let Some(commands) = self.bridge_rx.take() else {
            return Err(color_eyre::eyre::eyre!("event loop already ran"));
        };
        self.bridge = Some(tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(monitor, tx, commands, cancel).await;
        }));

        let mut events = EventReader::new(
            Duration::from_millis(250), // housekeeping tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Stop the bridge, which in turn stops the producer
        self.data_cancel.cancel();
        if let Some(bridge) = self.bridge.take() {
            if let Err(e) = bridge.await {
                warn!(error = %e, "data bridge task failed");
            }
        }
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }

            (KeyModifiers::NONE, KeyCode::Char('p')) => return Ok(Some(Action::TogglePause)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(screen) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::TogglePause => self.toggle_producer(),

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::Tick => {
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::Render | Action::Resize(..) => {}

            // Data updates go to ALL screens so they stay in sync
            data if data.is_data() => {
                if let Action::MonitorStateChanged(state) = data {
                    self.monitor_state = *state;
                }
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(data)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Ask the bridge to pause or resume the producer. The bridge reports
    /// the resulting state change.
    fn toggle_producer(&self) {
        if self.bridge_tx.send(BridgeCommand::TogglePause).is_err() {
            warn!("data bridge gone, toggle dropped");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match self.monitor_state {
            MonitorState::Running => Span::styled("● running", Style::default().fg(theme::GREEN)),
            MonitorState::Stopped => Span::styled("❚❚ paused", Style::default().fg(theme::YELLOW)),
            MonitorState::Idle => Span::styled("○ idle", Style::default().fg(theme::MUTED)),
        };
        let hints = Span::styled(" │ p pause  ? help  q quit", theme::key_hint());
        let line = Line::from(vec![Span::raw(" "), indicator, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast = Rect::new(area.x + x, area.y + y, width, height);

    let (color, icon) = match notification.level {
        NotificationLevel::Info => (theme::CYAN, "·"),
        NotificationLevel::Error => (theme::RED, "✗"),
    };

    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), Style::default().fg(theme::TEXT)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), toast);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 16u16.min(area.height.saturating_sub(4));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), theme::key_hint_key()),
            Span::styled(desc, theme::key_hint()),
        ])
    };
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", Style::default().fg(theme::CYAN))),
        key("1-4", "Jump to screen"),
        key("Tab/S-Tab", "Next / previous screen"),
        key("Esc", "Back to previous screen"),
        key("j/k ↑/↓", "Scroll"),
        key("g/G", "Newest / oldest"),
        Line::from(""),
        Line::from(Span::styled("  Producer", Style::default().fg(theme::CYAN))),
        key("p", "Pause / resume"),
        key("?", "This help"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}
