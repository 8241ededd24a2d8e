// ── Core error types ──
//
// Generation, extraction, and aggregation are total and never fail.
// The only fallible surface is the monitor lifecycle and the runtime
// configuration it validates before starting.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Monitor is already running")]
    AlreadyRunning,

    #[error("Producer task failed: {message}")]
    TaskFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            message: err.to_string(),
        }
    }
}
