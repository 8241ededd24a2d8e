// ── Runtime monitor configuration ──
//
// Describes *how* the synthetic producer behaves: feed capacities,
// tick cadence, per-tick probabilities, and the optional seed.
// Core never reads config files; the CLI/TUI builds a `MonitorConfig`
// (usually via `bedwatch-config`) and hands it in.

use std::ops::Range;

use crate::error::CoreError;

/// Newest log records kept in memory.
pub const DEFAULT_LOG_CAPACITY: usize = 100;
/// Newest security events kept in memory.
pub const DEFAULT_SECURITY_EVENT_CAPACITY: usize = 30;
/// Newest chat turns kept in memory.
pub const DEFAULT_CHAT_CAPACITY: usize = 50;

/// Configuration for a single [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Maximum number of log records retained (newest first).
    pub log_capacity: usize,
    /// Maximum number of security events retained (newest first).
    pub security_event_capacity: usize,
    /// Maximum number of chat messages retained (newest first).
    pub chat_capacity: usize,
    /// Lower bound (inclusive) of the producer period, in milliseconds.
    pub tick_min_ms: u64,
    /// Upper bound (exclusive) of the producer period, in milliseconds.
    pub tick_max_ms: u64,
    /// Probability that a tick generates a new log record.
    pub log_probability: f64,
    /// Probability that a tick generates a new security event.
    pub security_event_probability: f64,
    /// Log records generated when the monitor first starts.
    pub initial_logs: usize,
    /// Security events generated when the monitor first starts.
    pub initial_events: usize,
    /// Seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            security_event_capacity: DEFAULT_SECURITY_EVENT_CAPACITY,
            chat_capacity: DEFAULT_CHAT_CAPACITY,
            tick_min_ms: 3_000,
            tick_max_ms: 8_000,
            log_probability: 0.8,
            security_event_probability: 0.05,
            initial_logs: 15,
            initial_events: 3,
            seed: None,
        }
    }
}

impl MonitorConfig {
    /// Check the invariants the producer relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.log_capacity == 0 {
            return Err(CoreError::config("log_capacity must be greater than 0"));
        }
        if self.security_event_capacity == 0 {
            return Err(CoreError::config(
                "security_event_capacity must be greater than 0",
            ));
        }
        if self.chat_capacity == 0 {
            return Err(CoreError::config("chat_capacity must be greater than 0"));
        }
        if self.tick_min_ms == 0 || self.tick_min_ms >= self.tick_max_ms {
            return Err(CoreError::config(format!(
                "tick range must satisfy 0 < tick_min_ms < tick_max_ms (got {}..{})",
                self.tick_min_ms, self.tick_max_ms
            )));
        }
        for (name, p) in [
            ("log_probability", self.log_probability),
            ("security_event_probability", self.security_event_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::config(format!(
                    "{name} must be within [0, 1] (got {p})"
                )));
            }
        }
        Ok(())
    }

    /// Producer period range as milliseconds.
    pub fn tick_range_ms(&self) -> Range<u64> {
        self.tick_min_ms..self.tick_max_ms
    }
}
