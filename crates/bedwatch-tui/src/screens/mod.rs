//! Screen implementations. Each screen is a top-level Component.

pub mod chat;
pub mod dashboard;
pub mod security;
pub mod statistics;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per tab.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenId::Statistics,
            Box::new(statistics::StatisticsScreen::new()),
        ),
        (ScreenId::Chat, Box::new(chat::ChatScreen::new())),
        (ScreenId::Security, Box::new(security::SecurityScreen::new())),
    ]
}
