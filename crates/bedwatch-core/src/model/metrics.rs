// ── Derived summaries ──
//
// Everything in this module is computed from feed snapshots by
// `crate::aggregate` and never mutated afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::security::{RiskLevel, ThreatType};

/// Summary statistics over a sequence of log records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub total_requests: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
    /// Mean latency in milliseconds, rounded half-up.
    pub avg_latency: u64,
    pub unique_models: usize,
    pub region_distribution: IndexMap<String, u64>,
    pub operation_distribution: IndexMap<String, u64>,
    /// Always 0; generated records never fail.
    pub error_rate: u64,
    /// Always 100.
    pub success_rate: u64,
}

/// Per-model usage, grouped by normalised model name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub model: String,
    pub requests: u64,
    pub total_tokens: u64,
    pub total_latency: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ModelStats {
    pub fn avg_latency(&self) -> u64 {
        round_div(self.total_latency, self.requests)
    }

    pub fn avg_tokens_per_request(&self) -> u64 {
        round_div(self.total_tokens, self.requests)
    }
}

/// Counts over the security-event feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatSummary {
    pub total: usize,
    pub unresolved: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub by_threat: IndexMap<ThreatType, usize>,
    /// Highest risk among unresolved events; `Low` when nothing is open.
    pub level: RiskLevel,
}

impl ThreatSummary {
    pub fn count(&self, risk: RiskLevel) -> usize {
        match risk {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}

/// `sum / n` rounded half-up; 0 when `n` is 0.
pub(crate) fn round_div(sum: u64, n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    (sum * 2 + n) / (n * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_div_is_half_up() {
        assert_eq!(round_div(0, 0), 0);
        assert_eq!(round_div(7, 1), 7);
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(4, 3), 1);
        assert_eq!(round_div(400, 2), 200);
    }

    #[test]
    fn single_request_average_is_exact() {
        let stats = ModelStats {
            model: "m".into(),
            requests: 1,
            total_tokens: 333,
            total_latency: 812,
            ..ModelStats::default()
        };
        assert_eq!(stats.avg_tokens_per_request(), 333);
        assert_eq!(stats.avg_latency(), 812);
    }
}
