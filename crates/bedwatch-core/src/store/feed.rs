// ── Bounded newest-first record feed ──
//
// Push-based change notification via a `watch` channel carrying
// immutable snapshots. Every mutation rebuilds the snapshot.

use std::sync::Arc;

use tokio::sync::watch;

/// A capped, newest-first sequence of records of one type.
///
/// The snapshot is the only storage: readers clone the `Arc`, writers
/// replace it. Index 0 is always the most recently generated record.
pub(crate) struct RecordFeed<T: Send + Sync + 'static> {
    capacity: usize,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> RecordFeed<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { capacity, snapshot }
    }

    /// Put `items` in front, keeping their given order, then drop the
    /// oldest entries beyond capacity. Returns how many were dropped.
    pub(crate) fn prepend(&self, items: impl IntoIterator<Item = T>) -> usize {
        let mut fresh: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        if fresh.is_empty() {
            return 0;
        }

        let mut dropped = 0;
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| {
            let keep = self.capacity.saturating_sub(fresh.len()).min(snap.len());
            dropped = snap.len() - keep + fresh.len().saturating_sub(self.capacity);
            fresh.truncate(self.capacity);
            fresh.extend(snap.iter().take(keep).cloned());
            *snap = Arc::new(std::mem::take(&mut fresh));
        });
        dropped
    }

    pub(crate) fn push(&self, item: T) -> usize {
        self.prepend(std::iter::once(item))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
