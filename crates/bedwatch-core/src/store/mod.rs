// ── Reactive telemetry store ──
//
// Bounded newest-first feeds with push-based change notification.

mod feed;
mod telemetry_store;

pub use telemetry_store::TelemetryStore;
