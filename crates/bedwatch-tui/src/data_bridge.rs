//! Data bridge — connects [`Monitor`] feeds to TUI actions.
//!
//! Runs as a background task: starts the producer, then forwards every
//! feed change, derived summary, and producer state transition as an
//! [`Action`] through the TUI's action channel. Producer commands from
//! the UI run inside the same loop, so none can outlive the final stop on
//! cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use bedwatch_core::{Monitor, MonitorState};

use crate::action::{Action, Notification};

/// Producer requests sent from the UI to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    /// Pause a running producer, or resume a paused one.
    TogglePause,
}

/// Start `monitor` and forward its feeds until `cancel` fires.
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    mut commands: mpsc::UnboundedReceiver<BridgeCommand>,
    cancel: CancellationToken,
) {
    let store = monitor.store().clone();

    let mut logs = store.subscribe_logs();
    let mut events = store.subscribe_security_events();
    let mut chat = store.subscribe_chat();
    let mut metrics = store.subscribe_metrics();
    let mut model_stats = store.subscribe_model_stats();
    let mut threat = store.subscribe_threat_summary();
    let mut state = monitor.subscribe_state();

    match monitor.start().await {
        Ok(period) => {
            let _ = action_tx.send(Action::Notify(Notification::info(format!(
                "producer ticking every {:.1}s",
                period.as_secs_f64()
            ))));
        }
        Err(e) => {
            warn!(error = %e, "failed to start monitor");
            let _ = action_tx.send(Action::Notify(Notification::error(e.to_string())));
        }
    }

    // Initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::LogsUpdated(logs.latest()));
    let _ = action_tx.send(Action::SecurityEventsUpdated(events.latest()));
    let _ = action_tx.send(Action::ChatUpdated(chat.latest()));
    let _ = action_tx.send(Action::MetricsUpdated(metrics.borrow_and_update().clone()));
    let _ = action_tx.send(Action::ModelStatsUpdated(
        model_stats.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::ThreatSummaryUpdated(
        threat.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::MonitorStateChanged(*state.borrow_and_update()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(cmd) = commands.recv() => handle_command(&monitor, cmd, &action_tx).await,

            Some(snap) = logs.changed() => {
                let _ = action_tx.send(Action::LogsUpdated(snap));
            }
            Some(snap) = events.changed() => {
                let _ = action_tx.send(Action::SecurityEventsUpdated(snap));
            }
            Some(snap) = chat.changed() => {
                let _ = action_tx.send(Action::ChatUpdated(snap));
            }
            Ok(()) = metrics.changed() => {
                let m = metrics.borrow_and_update().clone();
                let _ = action_tx.send(Action::MetricsUpdated(m));
            }
            Ok(()) = model_stats.changed() => {
                let s = model_stats.borrow_and_update().clone();
                let _ = action_tx.send(Action::ModelStatsUpdated(s));
            }
            Ok(()) = threat.changed() => {
                let t = threat.borrow_and_update().clone();
                let _ = action_tx.send(Action::ThreatSummaryUpdated(t));
            }
            Ok(()) = state.changed() => {
                let s = *state.borrow_and_update();
                debug!(state = %s, "monitor state changed");
                let _ = action_tx.send(Action::MonitorStateChanged(s));
            }
        }
    }

    if let Err(e) = monitor.stop().await {
        warn!(error = %e, "monitor did not stop cleanly");
    }
    debug!("data bridge shut down");
}

async fn handle_command(
    monitor: &Monitor,
    cmd: BridgeCommand,
    action_tx: &mpsc::UnboundedSender<Action>,
) {
    match cmd {
        BridgeCommand::TogglePause => match monitor.toggle().await {
            Ok(state) => {
                let msg = match state {
                    MonitorState::Running => "producer resumed",
                    _ => "producer paused",
                };
                let _ = action_tx.send(Action::Notify(Notification::info(msg)));
            }
            Err(e) => {
                warn!(error = %e, "toggle failed");
                let _ = action_tx.send(Action::Notify(Notification::error(e.to_string())));
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use bedwatch_core::MonitorConfig;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bridge_forwards_seed_and_stops_monitor() {
        let monitor = Monitor::new(MonitorConfig {
            seed: Some(9),
            ..MonitorConfig::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(spawn_data_bridge(
            monitor.clone(),
            tx,
            cmd_rx,
            cancel.clone(),
        ));

        let mut saw_logs = 0;
        let mut saw_running = false;
        while !(saw_logs >= 15 && saw_running) {
            match rx.recv().await.unwrap() {
                Action::LogsUpdated(snap) => saw_logs = saw_logs.max(snap.len()),
                Action::MonitorStateChanged(MonitorState::Running) => saw_running = true,
                _ => {}
            }
        }

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(monitor.state(), MonitorState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_queued_before_shutdown_leaves_monitor_stopped() {
        let monitor = Monitor::new(MonitorConfig {
            seed: Some(10),
            ..MonitorConfig::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(spawn_data_bridge(
            monitor.clone(),
            tx,
            cmd_rx,
            cancel.clone(),
        ));

        // Pause, then resume and quit straight away
        cmd_tx.send(BridgeCommand::TogglePause).unwrap();
        loop {
            if let Action::Notify(n) = rx.recv().await.unwrap() {
                if n.message == "producer paused" {
                    break;
                }
            }
        }
        assert_eq!(monitor.state(), MonitorState::Stopped);
        cmd_tx.send(BridgeCommand::TogglePause).unwrap();
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(monitor.state(), MonitorState::Stopped);
    }
}
