// ── Chat transcript types ──

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Suffix appended to the request id when extracted from a log.
    pub fn id_suffix(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Local wall-clock `HH:MM:SS`, fixed at creation.
    pub time: String,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        role: ChatRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
            time: timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_clock_formatted() {
        let msg = ChatMessage::new("a", ChatRole::User, "hi", Utc::now());
        assert_eq!(msg.time.len(), 8);
        assert_eq!(msg.time.matches(':').count(), 2);
    }

    #[test]
    fn role_renders_lowercase() {
        assert_eq!(ChatRole::Assistant.to_string(), "assistant");
        assert_eq!(ChatRole::User.id_suffix(), "user");
    }
}
