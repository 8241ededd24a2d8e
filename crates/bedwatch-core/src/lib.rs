// bedwatch-core: synthetic GenAI telemetry between the generator and consumers (CLI/TUI).

pub mod aggregate;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod monitor;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{
    aggregate, distribution_share, extract_metrics_from_logs, model_stats, normalize_model_name,
    threat_summary,
};
pub use config::MonitorConfig;
pub use error::CoreError;
pub use generator::{
    EntropySource, Generator, RandomSource, ScriptedSource, extract_chat_from_log,
};
pub use monitor::{Monitor, MonitorState, TickOutcome};
pub use store::TelemetryStore;
pub use stream::{FeedStream, Snapshot};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Records
    BedrockLog, ChatMessage, ChatRole, SecurityEvent,
    // Security vocabulary
    RiskLevel, ThreatType, threat_detail,
    // Summaries
    AggregateMetrics, ModelStats, ThreatSummary,
};
