// ── Aggregation over feed snapshots ──
//
// Pure, total functions. Missing optional numbers count as 0 and an
// empty input yields `None` (metrics) or an empty/default summary.

use std::borrow::Borrow;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::metrics::round_div;
use crate::model::{
    AggregateMetrics, BedrockLog, ModelStats, RiskLevel, SecurityEvent, ThreatSummary,
};

/// Group label for logs whose model id normalises to nothing.
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Summary metrics over `logs`, or `None` when absent or empty.
pub fn extract_metrics_from_logs(logs: Option<&[BedrockLog]>) -> Option<AggregateMetrics> {
    aggregate(logs?)
}

/// Summary metrics over any slice of log handles (e.g. a feed snapshot).
pub fn aggregate<T: Borrow<BedrockLog>>(logs: &[T]) -> Option<AggregateMetrics> {
    if logs.is_empty() {
        return None;
    }

    let mut metrics = AggregateMetrics {
        total_requests: u64::try_from(logs.len()).unwrap_or(u64::MAX),
        success_rate: 100,
        ..AggregateMetrics::default()
    };
    let mut latency_sum = 0u64;
    let mut models = HashSet::new();

    for log in logs {
        let log = log.borrow();
        metrics.total_input_tokens += u64::from(log.input_token_count());
        metrics.total_output_tokens += u64::from(log.output_token_count());
        latency_sum += log.latency_ms();
        models.insert(log.model_id.as_str());
        *metrics
            .region_distribution
            .entry(log.region.clone())
            .or_insert(0) += 1;
        *metrics
            .operation_distribution
            .entry(log.operation.clone())
            .or_insert(0) += 1;
    }

    metrics.total_tokens = metrics.total_input_tokens + metrics.total_output_tokens;
    metrics.avg_latency = round_div(latency_sum, metrics.total_requests);
    metrics.unique_models = models.len();
    Some(metrics)
}

/// Short model name: last `/` segment with any `:revision` suffix cut.
pub fn normalize_model_name(model_id: &str) -> &str {
    let tail = model_id.rsplit('/').next().unwrap_or(model_id);
    let name = tail.split(':').next().unwrap_or(tail);
    if name.is_empty() { UNKNOWN_MODEL } else { name }
}

/// Per-model usage in first-seen order.
pub fn model_stats<T: Borrow<BedrockLog>>(logs: &[T]) -> Vec<ModelStats> {
    let mut groups: IndexMap<&str, ModelStats> = IndexMap::new();
    for log in logs {
        let log = log.borrow();
        let name = normalize_model_name(&log.model_id);
        let stats = groups.entry(name).or_insert_with(|| ModelStats {
            model: name.to_owned(),
            ..ModelStats::default()
        });
        stats.requests += 1;
        stats.total_tokens += u64::from(log.usage_total_tokens());
        stats.total_latency += log.latency_ms();
        stats.input_tokens += u64::from(log.input_token_count());
        stats.output_tokens += u64::from(log.output_token_count());
    }
    groups.into_values().collect()
}

/// Percentage of `count` in `total`; 0 when `total` is 0.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn distribution_share(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Risk and threat-type counts over a security-event snapshot.
pub fn threat_summary<T: Borrow<SecurityEvent>>(events: &[T]) -> ThreatSummary {
    let mut summary = ThreatSummary {
        total: events.len(),
        ..ThreatSummary::default()
    };
    for event in events {
        let event = event.borrow();
        match event.risk {
            RiskLevel::Low => summary.low += 1,
            RiskLevel::Medium => summary.medium += 1,
            RiskLevel::High => summary.high += 1,
        }
        *summary.by_threat.entry(event.threat_type).or_insert(0) += 1;
        if !event.resolved {
            summary.unresolved += 1;
            summary.level = summary.level.max(event.risk);
        }
    }
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::model::{
        InvocationInput, InvocationMetrics, InvocationOutput, OutputBody, ThreatType, Usage,
    };

    fn log(model: &str, region: &str, input: u32, output: u32, latency: u64) -> BedrockLog {
        BedrockLog {
            model_id: model.into(),
            region: region.into(),
            operation: "Converse".into(),
            input: Some(InvocationInput {
                input_token_count: input,
                ..InvocationInput::default()
            }),
            output: Some(InvocationOutput {
                output_token_count: output,
                output_body_json: Some(OutputBody {
                    metrics: Some(InvocationMetrics { latency_ms: latency }),
                    usage: Some(Usage::new(input, output)),
                    ..OutputBody::default()
                }),
                ..InvocationOutput::default()
            }),
            ..BedrockLog::default()
        }
    }

    fn event(risk: RiskLevel, threat: ThreatType, resolved: bool) -> SecurityEvent {
        SecurityEvent {
            id: Uuid::nil(),
            timestamp: Utc::now(),
            threat_type: threat,
            detail: threat.detail().into(),
            priority: risk,
            risk,
            username: "Alice".into(),
            ip: "10.0.0.1".into(),
            resolved,
        }
    }

    #[test]
    fn empty_or_absent_input_has_no_metrics() {
        let empty: [BedrockLog; 0] = [];
        assert_eq!(extract_metrics_from_logs(None), None);
        assert_eq!(extract_metrics_from_logs(Some(&empty[..])), None);
    }

    #[test]
    fn metrics_over_two_logs() {
        let logs = [
            log("m", "us-east-1", 10, 20, 100),
            log("m", "eu-west-1", 5, 15, 300),
        ];
        let m = extract_metrics_from_logs(Some(&logs[..])).unwrap();
        assert_eq!(m.total_requests, 2);
        assert_eq!(m.total_input_tokens, 15);
        assert_eq!(m.total_output_tokens, 35);
        assert_eq!(m.total_tokens, 50);
        assert_eq!(m.avg_latency, 200);
        assert_eq!(m.unique_models, 1);
        assert_eq!(m.error_rate, 0);
        assert_eq!(m.success_rate, 100);
    }

    #[test]
    fn missing_numbers_count_as_zero() {
        let logs = [BedrockLog::default(), log("m", "r", 4, 6, 51)];
        let m = aggregate(&logs).unwrap();
        assert_eq!(m.total_requests, 2);
        assert_eq!(m.total_tokens, 10);
        // 51 / 2 = 25.5 rounds half-up
        assert_eq!(m.avg_latency, 26);
    }

    #[test]
    fn distributions_keep_first_seen_order() {
        let logs: Vec<Arc<BedrockLog>> = ["b", "a", "b", "c"]
            .into_iter()
            .map(|r| Arc::new(log("m", r, 1, 1, 1)))
            .collect();
        let m = aggregate(&logs).unwrap();
        let regions: Vec<_> = m.region_distribution.iter().collect();
        assert_eq!(
            regions,
            vec![(&"b".to_owned(), &2), (&"a".to_owned(), &1), (&"c".to_owned(), &1)]
        );
        assert_eq!(m.operation_distribution["Converse"], 4);
    }

    #[test]
    fn model_names_normalise() {
        assert_eq!(
            normalize_model_name(
                "arn:aws:bedrock:us-west-2:014498666989:inference-profile/us.anthropic.claude-3-haiku-20240307-v1:0"
            ),
            "us.anthropic.claude-3-haiku-20240307-v1"
        );
        assert_eq!(normalize_model_name("plain-model"), "plain-model");
        assert_eq!(normalize_model_name(""), UNKNOWN_MODEL);
        assert_eq!(normalize_model_name("prefix/"), UNKNOWN_MODEL);
    }

    #[test]
    fn model_stats_group_and_average() {
        let logs = [
            log("p/alpha:0", "r", 10, 20, 100),
            log("p/beta:1", "r", 1, 2, 7),
            log("p/alpha:0", "r", 5, 6, 301),
        ];
        let stats = model_stats(&logs);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].model, "alpha");
        assert_eq!(stats[0].requests, 2);
        assert_eq!(stats[0].total_tokens, 41);
        assert_eq!(stats[0].avg_tokens_per_request(), 21);
        assert_eq!(stats[0].avg_latency(), 201);
        assert_eq!(stats[1].model, "beta");
        assert_eq!(stats[1].avg_tokens_per_request(), 3);
        assert_eq!(stats[1].avg_latency(), 7);
    }

    #[test]
    fn share_handles_zero_total() {
        assert!(distribution_share(3, 0).abs() < f64::EPSILON);
        assert!((distribution_share(1, 4) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn threat_summary_levels() {
        assert_eq!(threat_summary::<SecurityEvent>(&[]).level, RiskLevel::Low);

        let events = [
            event(RiskLevel::High, ThreatType::JailbreakAttempt, true),
            event(RiskLevel::Medium, ThreatType::PiiExposure, false),
            event(RiskLevel::Low, ThreatType::PiiExposure, false),
        ];
        let summary = threat_summary(&events);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.unresolved, 2);
        assert_eq!(summary.count(RiskLevel::High), 1);
        assert_eq!(summary.count(RiskLevel::Low), 1);
        assert_eq!(summary.by_threat[&ThreatType::PiiExposure], 2);
        // resolved high-risk events do not raise the level
        assert_eq!(summary.level, RiskLevel::Medium);
    }
}
