// ── Central reactive telemetry store ──
//
// Owns every generated record. Feed mutations are broadcast through
// `watch` channels and derived summaries are recomputed on each push.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::feed::RecordFeed;
use crate::aggregate;
use crate::config::MonitorConfig;
use crate::model::{
    AggregateMetrics, BedrockLog, ChatMessage, ModelStats, SecurityEvent, ThreatSummary,
};
use crate::stream::{FeedStream, Snapshot};

/// Central store for logs, security events and chat turns.
///
/// Readers only ever see immutable `Arc` snapshots; the producer is the
/// sole writer.
pub struct TelemetryStore {
    pub(crate) logs: RecordFeed<BedrockLog>,
    pub(crate) security_events: RecordFeed<SecurityEvent>,
    pub(crate) chat: RecordFeed<ChatMessage>,
    pub(crate) metrics: watch::Sender<Option<Arc<AggregateMetrics>>>,
    pub(crate) model_stats: watch::Sender<Arc<Vec<ModelStats>>>,
    pub(crate) threat_summary: watch::Sender<Arc<ThreatSummary>>,
    pub(crate) last_tick: watch::Sender<Option<DateTime<Utc>>>,
}

impl TelemetryStore {
    pub fn new(config: &MonitorConfig) -> Self {
        Self::with_capacities(
            config.log_capacity,
            config.security_event_capacity,
            config.chat_capacity,
        )
    }

    pub fn with_capacities(logs: usize, security_events: usize, chat: usize) -> Self {
        let (metrics, _) = watch::channel(None);
        let (model_stats, _) = watch::channel(Arc::new(Vec::new()));
        let (threat_summary, _) = watch::channel(Arc::new(ThreatSummary::default()));
        let (last_tick, _) = watch::channel(None);

        Self {
            logs: RecordFeed::new(logs),
            security_events: RecordFeed::new(security_events),
            chat: RecordFeed::new(chat),
            metrics,
            model_stats,
            threat_summary,
            last_tick,
        }
    }

    // ── Mutation (producer side) ─────────────────────────────────────

    /// Prepend logs as a block and recompute log-derived summaries.
    pub fn push_logs(&self, logs: impl IntoIterator<Item = BedrockLog>) -> usize {
        let dropped = self.logs.prepend(logs);
        self.recompute_log_summaries();
        dropped
    }

    pub fn push_security_events(&self, events: impl IntoIterator<Item = SecurityEvent>) -> usize {
        let dropped = self.security_events.prepend(events);
        let snap = self.security_events.snapshot();
        let summary = aggregate::threat_summary(snap.as_slice());
        self.threat_summary
            .send_modify(|current| *current = Arc::new(summary));
        dropped
    }

    /// Prepend chat turns as a block (the first item ends up newest).
    pub fn push_chat(&self, messages: impl IntoIterator<Item = ChatMessage>) -> usize {
        self.chat.prepend(messages)
    }

    pub(crate) fn mark_tick(&self, at: DateTime<Utc>) {
        self.last_tick.send_modify(|t| *t = Some(at));
    }

    fn recompute_log_summaries(&self) {
        let snap = self.logs.snapshot();
        let metrics = aggregate::aggregate(snap.as_slice()).map(Arc::new);
        let stats = Arc::new(aggregate::model_stats(snap.as_slice()));
        self.metrics.send_modify(|m| *m = metrics);
        self.model_stats.send_modify(|s| *s = stats);
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn logs_snapshot(&self) -> Snapshot<BedrockLog> {
        self.logs.snapshot()
    }

    pub fn security_events_snapshot(&self) -> Snapshot<SecurityEvent> {
        self.security_events.snapshot()
    }

    pub fn chat_snapshot(&self) -> Snapshot<ChatMessage> {
        self.chat.snapshot()
    }

    pub fn metrics(&self) -> Option<Arc<AggregateMetrics>> {
        self.metrics.borrow().clone()
    }

    pub fn model_stats(&self) -> Arc<Vec<ModelStats>> {
        self.model_stats.borrow().clone()
    }

    pub fn threat_summary(&self) -> Arc<ThreatSummary> {
        self.threat_summary.borrow().clone()
    }

    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        *self.last_tick.borrow()
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    pub fn security_event_count(&self) -> usize {
        self.security_events.len()
    }

    pub fn chat_count(&self) -> usize {
        self.chat.len()
    }

    /// `(logs, security events, chat)` capacities.
    pub fn capacities(&self) -> (usize, usize, usize) {
        (
            self.logs.capacity(),
            self.security_events.capacity(),
            self.chat.capacity(),
        )
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_logs(&self) -> FeedStream<BedrockLog> {
        FeedStream::new(self.logs.subscribe())
    }

    pub fn subscribe_security_events(&self) -> FeedStream<SecurityEvent> {
        FeedStream::new(self.security_events.subscribe())
    }

    pub fn subscribe_chat(&self) -> FeedStream<ChatMessage> {
        FeedStream::new(self.chat.subscribe())
    }

    pub fn subscribe_metrics(&self) -> watch::Receiver<Option<Arc<AggregateMetrics>>> {
        self.metrics.subscribe()
    }

    pub fn subscribe_model_stats(&self) -> watch::Receiver<Arc<Vec<ModelStats>>> {
        self.model_stats.subscribe()
    }

    pub fn subscribe_threat_summary(&self) -> watch::Receiver<Arc<ThreatSummary>> {
        self.threat_summary.subscribe()
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn pushing_logs_recomputes_metrics() {
        let store = TelemetryStore::default();
        assert!(store.metrics().is_none());
        assert!(store.model_stats().is_empty());

        let mut generator = Generator::from_seed(Some(5));
        store.push_logs((0..3).map(|_| generator.generate_log()));

        let metrics = store.metrics().unwrap();
        assert_eq!(metrics.total_requests, 3);
        let requests: u64 = store.model_stats().iter().map(|s| s.requests).sum();
        assert_eq!(requests, 3);
    }

    #[test]
    fn pushing_events_recomputes_summary() {
        let store = TelemetryStore::default();
        let mut generator = Generator::from_seed(Some(8));
        store.push_security_events((0..4).map(|_| generator.generate_security_event()));
        assert_eq!(store.threat_summary().total, 4);
        assert_eq!(store.security_event_count(), 4);
    }

    #[test]
    fn feeds_respect_configured_capacities() {
        let store = TelemetryStore::with_capacities(2, 1, 3);
        let mut generator = Generator::from_seed(Some(1));
        for _ in 0..5 {
            store.push_logs([generator.generate_log()]);
            store.push_security_events([generator.generate_security_event()]);
            store.push_chat([generator.generate_chat_message()]);
        }
        assert_eq!(store.log_count(), 2);
        assert_eq!(store.security_event_count(), 1);
        assert_eq!(store.chat_count(), 3);
        assert_eq!(store.metrics().unwrap().total_requests, 2);
        assert_eq!(store.capacities(), (2, 1, 3));
    }

    #[tokio::test]
    async fn log_subscribers_are_notified() {
        let store = TelemetryStore::default();
        let mut stream = store.subscribe_logs();
        let mut generator = Generator::from_seed(Some(2));
        store.push_logs([generator.generate_log()]);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
    }
}
