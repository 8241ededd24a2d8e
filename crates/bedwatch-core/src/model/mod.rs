// ── Telemetry domain model ──

pub mod chat;
pub mod log;
pub mod metrics;
pub mod security;

pub use chat::{ChatMessage, ChatRole};
pub use log::{
    BedrockLog, ContentBlock, Identity, InferenceConfig, InputBody, InvocationInput,
    InvocationMetrics, InvocationOutput, Message, MessageRole, OutputBody, OutputEnvelope, Usage,
};
pub use metrics::{AggregateMetrics, ModelStats, ThreatSummary};
pub use security::{RiskLevel, SecurityEvent, THREAT_TYPES, ThreatType, threat_detail};
