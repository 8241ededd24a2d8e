#![allow(clippy::unwrap_used)]
// Integration tests for the `Monitor` producer lifecycle on paused time.

use std::time::Duration;

use bedwatch_core::{CoreError, Monitor, MonitorConfig, MonitorState};

// ── Helpers ─────────────────────────────────────────────────────────

fn busy_config() -> MonitorConfig {
    MonitorConfig {
        log_probability: 1.0,
        security_event_probability: 1.0,
        initial_logs: 0,
        initial_events: 0,
        seed: Some(2024),
        ..MonitorConfig::default()
    }
}

async fn run_for(period: Duration, ticks: u32) {
    tokio::time::sleep(period * ticks + Duration::from_millis(10)).await;
}

// ── Lifecycle tests ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_producer_ticks_once_per_period() {
    let monitor = Monitor::new(busy_config());
    let period = monitor.start().await.unwrap();
    assert!((3_000..8_000).contains(&period.as_millis()));

    run_for(period, 3).await;
    monitor.stop().await.unwrap();

    assert_eq!(monitor.logs_snapshot().len(), 3);
    assert_eq!(monitor.security_events_snapshot().len(), 3);
    assert_eq!(monitor.chat_snapshot().len(), 6);
    assert_eq!(monitor.metrics().unwrap().total_requests, 3);
}

#[tokio::test(start_paused = true)]
async fn test_start_seeds_initial_records() {
    let monitor = Monitor::new(MonitorConfig {
        log_probability: 0.0,
        security_event_probability: 0.0,
        seed: Some(1),
        ..MonitorConfig::default()
    });
    monitor.start().await.unwrap();

    assert_eq!(monitor.logs_snapshot().len(), 15);
    assert_eq!(monitor.security_events_snapshot().len(), 3);
    assert_eq!(monitor.chat_snapshot().len(), 30);
    monitor.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_rejected() {
    let monitor = Monitor::new(busy_config());
    monitor.start().await.unwrap();

    let result = monitor.start().await;
    assert!(
        matches!(result, Err(CoreError::AlreadyRunning)),
        "expected AlreadyRunning, got: {result:?}"
    );
    monitor.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent_and_halts_production() {
    let monitor = Monitor::new(busy_config());
    let period = monitor.start().await.unwrap();
    run_for(period, 2).await;

    monitor.stop().await.unwrap();
    monitor.stop().await.unwrap();
    assert_eq!(monitor.state(), MonitorState::Stopped);

    let frozen = monitor.logs_snapshot().len();
    run_for(period, 5).await;
    assert_eq!(monitor.logs_snapshot().len(), frozen);
}

#[tokio::test(start_paused = true)]
async fn test_restart_keeps_buffers_without_reseeding() {
    let monitor = Monitor::new(MonitorConfig {
        log_probability: 0.0,
        security_event_probability: 0.0,
        seed: Some(9),
        ..MonitorConfig::default()
    });
    let mut state = monitor.subscribe_state();
    assert_eq!(*state.borrow_and_update(), MonitorState::Idle);

    monitor.start().await.unwrap();
    assert_eq!(*state.borrow_and_update(), MonitorState::Running);
    monitor.stop().await.unwrap();
    assert_eq!(*state.borrow_and_update(), MonitorState::Stopped);

    assert_eq!(monitor.toggle().await.unwrap(), MonitorState::Running);
    assert_eq!(monitor.logs_snapshot().len(), 15);
    assert_eq!(monitor.toggle().await.unwrap(), MonitorState::Stopped);
}

// ── Bounding tests ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_feeds_stay_bounded_and_newest_first() {
    let monitor = Monitor::new(MonitorConfig {
        log_capacity: 5,
        security_event_capacity: 2,
        chat_capacity: 4,
        ..busy_config()
    });
    let period = monitor.start().await.unwrap();
    run_for(period, 20).await;
    monitor.stop().await.unwrap();

    let logs = monitor.logs_snapshot();
    let chat = monitor.chat_snapshot();
    assert_eq!(logs.len(), 5);
    assert_eq!(monitor.security_events_snapshot().len(), 2);
    assert_eq!(chat.len(), 4);

    // Each tick prepends [user, assistant] for the log it just prepended.
    assert_eq!(chat[0].id, format!("{}-user", logs[0].request_id));
    assert_eq!(chat[1].id, format!("{}-assistant", logs[0].request_id));
    assert_eq!(chat[2].id, format!("{}-user", logs[1].request_id));
    assert_eq!(chat[3].id, format!("{}-assistant", logs[1].request_id));
}

#[tokio::test]
async fn test_many_ticks_never_exceed_default_caps() {
    let monitor = Monitor::new(MonitorConfig {
        security_event_probability: 0.5,
        seed: Some(77),
        ..MonitorConfig::default()
    });
    monitor.seed().await;
    for _ in 0..400 {
        monitor.tick().await;
        let store = monitor.store();
        assert!(store.log_count() <= 100);
        assert!(store.security_event_count() <= 30);
        assert!(store.chat_count() <= 50);
    }
    assert_eq!(monitor.logs_snapshot().len(), 100);
    assert_eq!(monitor.chat_snapshot().len(), 50);
    assert_eq!(monitor.security_events_snapshot().len(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_log_stream_sees_producer_updates() {
    let monitor = Monitor::new(busy_config());
    let mut logs = monitor.logs();
    let period = monitor.start().await.unwrap();

    let snap = tokio::time::timeout(period * 2, logs.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snap.len(), 1);
    monitor.stop().await.unwrap();
}
