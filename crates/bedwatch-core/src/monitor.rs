// ── Monitor ──
//
// Lifecycle management for the synthetic telemetry producer. A single
// background task ticks at a randomly drawn period and writes into the
// TelemetryStore; consumers read snapshots.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use strum::Display;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::generator::{EntropySource, Generator, RandomSource, extract_chat_from_log};
use crate::model::{
    AggregateMetrics, BedrockLog, ChatMessage, ModelStats, SecurityEvent, ThreatSummary,
};
use crate::store::TelemetryStore;
use crate::stream::{FeedStream, Snapshot};

// ── MonitorState ─────────────────────────────────────────────────

/// Producer state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum MonitorState {
    /// Created, never started.
    Idle,
    Running,
    /// Started at least once, currently stopped.
    Stopped,
}

/// What one producer step generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickOutcome {
    pub log: bool,
    pub chat_messages: usize,
    pub security_event: bool,
}

// ── Monitor ──────────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Owns the generator, the
/// store, and the producer task.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    store: Arc<TelemetryStore>,
    generator: Mutex<Generator>,
    state: watch::Sender<MonitorState>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    seeded: bool,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Create a monitor from configuration. Does NOT start producing;
    /// call [`start()`](Self::start).
    pub fn new(config: MonitorConfig) -> Self {
        let source: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(EntropySource::seeded(seed)),
            None => Box::new(EntropySource::from_os()),
        };
        Self::with_source(config, source)
    }

    /// Create a monitor drawing from an injected random source.
    pub fn with_source(config: MonitorConfig, source: Box<dyn RandomSource>) -> Self {
        let store = Arc::new(TelemetryStore::new(&config));
        let (state, _) = watch::channel(MonitorState::Idle);

        Self {
            inner: Arc::new(MonitorInner {
                config,
                store,
                generator: Mutex::new(Generator::new(source)),
                state,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<TelemetryStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the producer.
    ///
    /// Validates the configuration, seeds the initial records on the
    /// first start only, draws the tick period, and spawns the producer
    /// task. Returns the drawn period.
    pub async fn start(&self) -> Result<Duration, CoreError> {
        self.inner.config.validate()?;

        let mut lifecycle = self.inner.lifecycle.lock().await;
        if lifecycle.handle.is_some() {
            return Err(CoreError::AlreadyRunning);
        }

        if !lifecycle.seeded {
            self.seed_initial().await;
            lifecycle.seeded = true;
        }

        let period = self
            .inner
            .generator
            .lock()
            .await
            .draw_period(self.inner.config.tick_range_ms());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(producer_task(self.clone(), period, cancel.clone()));
        lifecycle.cancel = Some(cancel);
        lifecycle.handle = Some(handle);

        let _ = self.inner.state.send(MonitorState::Running);
        info!(period_ms = period.as_millis(), "monitor started");
        Ok(period)
    }

    /// Stop the producer and wait for it to finish.
    ///
    /// Idempotent. Buffers are kept, so a later `start()` resumes on
    /// top of the existing records.
    pub async fn stop(&self) -> Result<(), CoreError> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        let Some(handle) = lifecycle.handle.take() else {
            return Ok(());
        };
        if let Some(cancel) = lifecycle.cancel.take() {
            cancel.cancel();
        }

        let joined = handle.await;
        let _ = self.inner.state.send(MonitorState::Stopped);
        if let Err(ref e) = joined {
            warn!(error = %e, "producer task ended abnormally");
        }
        joined?;
        info!("monitor stopped");
        Ok(())
    }

    /// Start when stopped, stop when running. Returns the new state.
    pub async fn toggle(&self) -> Result<MonitorState, CoreError> {
        if self.state() == MonitorState::Running {
            self.stop().await?;
        } else {
            self.start().await?;
        }
        Ok(self.state())
    }

    /// Generate the initial records once. Later calls do nothing.
    ///
    /// `start()` calls this; timer-free callers (simulations) may call
    /// it directly.
    pub async fn seed(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if !lifecycle.seeded {
            self.seed_initial().await;
            lifecycle.seeded = true;
        }
    }

    async fn seed_initial(&self) {
        let config = &self.inner.config;
        let store = &self.inner.store;
        let mut generator = self.inner.generator.lock().await;

        for _ in 0..config.initial_logs {
            let log = generator.generate_log();
            store.push_chat(extract_chat_from_log(&log));
            store.push_logs([log]);
        }
        for _ in 0..config.initial_events {
            store.push_security_events([generator.generate_security_event()]);
        }
        debug!(
            logs = config.initial_logs,
            events = config.initial_events,
            "seeded initial records"
        );
    }

    /// Run one producer step without any timer.
    pub async fn tick(&self) -> TickOutcome {
        let config = &self.inner.config;
        let store = &self.inner.store;
        let mut generator = self.inner.generator.lock().await;
        let mut outcome = TickOutcome::default();

        if generator.chance(config.log_probability) {
            let log = generator.generate_log();
            let chat = extract_chat_from_log(&log);
            outcome.log = true;
            outcome.chat_messages = chat.len();
            store.push_chat(chat);
            store.push_logs([log]);
        }

        if generator.chance(config.security_event_probability) {
            store.push_security_events([generator.generate_security_event()]);
            outcome.security_event = true;
        }

        store.mark_tick(Utc::now());
        debug!(
            log = outcome.log,
            chat = outcome.chat_messages,
            event = outcome.security_event,
            "producer tick"
        );
        outcome
    }

    // ── State observation ────────────────────────────────────────

    pub fn state(&self) -> MonitorState {
        *self.inner.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<MonitorState> {
        self.inner.state.subscribe()
    }

    // ── Snapshot accessors (delegate to TelemetryStore) ──────────

    pub fn logs_snapshot(&self) -> Snapshot<BedrockLog> {
        self.inner.store.logs_snapshot()
    }

    pub fn security_events_snapshot(&self) -> Snapshot<SecurityEvent> {
        self.inner.store.security_events_snapshot()
    }

    pub fn chat_snapshot(&self) -> Snapshot<ChatMessage> {
        self.inner.store.chat_snapshot()
    }

    pub fn metrics(&self) -> Option<Arc<AggregateMetrics>> {
        self.inner.store.metrics()
    }

    pub fn model_stats(&self) -> Arc<Vec<ModelStats>> {
        self.inner.store.model_stats()
    }

    pub fn threat_summary(&self) -> Arc<ThreatSummary> {
        self.inner.store.threat_summary()
    }

    // ── Stream accessors (delegate to TelemetryStore) ────────────

    pub fn logs(&self) -> FeedStream<BedrockLog> {
        self.inner.store.subscribe_logs()
    }

    pub fn security_events(&self) -> FeedStream<SecurityEvent> {
        self.inner.store.subscribe_security_events()
    }

    pub fn chat(&self) -> FeedStream<ChatMessage> {
        self.inner.store.subscribe_chat()
    }
}

// ── Background task ──────────────────────────────────────────────

/// Tick at a fixed period until cancelled. Missed ticks are skipped.
async fn producer_task(monitor: Monitor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                monitor.tick().await;
            }
        }
    }
}
