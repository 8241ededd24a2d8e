//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use bedwatch_core::{
    AggregateMetrics, BedrockLog, ChatMessage, ModelStats, MonitorState, SecurityEvent, Snapshot,
    ThreatSummary,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A toast shown above the status bar for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Producer control ──────────────────────────────────────────
    TogglePause,
    MonitorStateChanged(MonitorState),

    // ── Data events (from bedwatch-core feeds) ────────────────────
    LogsUpdated(Snapshot<BedrockLog>),
    SecurityEventsUpdated(Snapshot<SecurityEvent>),
    ChatUpdated(Snapshot<ChatMessage>),
    MetricsUpdated(Option<Arc<AggregateMetrics>>),
    ModelStatsUpdated(Arc<Vec<ModelStats>>),
    ThreatSummaryUpdated(Arc<ThreatSummary>),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),

    // ── Scrolling ─────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,
}

impl Action {
    /// Feed-derived actions are broadcast to every screen.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Self::LogsUpdated(_)
                | Self::SecurityEventsUpdated(_)
                | Self::ChatUpdated(_)
                | Self::MetricsUpdated(_)
                | Self::ModelStatsUpdated(_)
                | Self::ThreatSummaryUpdated(_)
                | Self::MonitorStateChanged(_)
        )
    }
}
