// ── Reactive feed streams ──
//
// Subscription types for consuming feed changes from the TelemetryStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Snapshot type carried by every feed.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// A subscription to one bounded feed.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed`](Self::changed) or by converting to a `Stream`.
pub struct FeedStream<T: Send + Sync + 'static> {
    current: Snapshot<T>,
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> FeedStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Snapshot<T> {
        &self.current
    }

    /// Latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Snapshot<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> FeedWatchStream<T> {
        FeedWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per feed mutation.
pub struct FeedWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> Stream for FeedWatchStream<T> {
    type Item = Snapshot<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn changed_updates_current() {
        let (tx, rx) = watch::channel(Arc::new(Vec::<Arc<u8>>::new()));
        let mut stream = FeedStream::new(rx);
        assert!(stream.current().is_empty());

        tx.send_modify(|snap| *snap = Arc::new(vec![Arc::new(1)]));
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(stream.current().len(), 1);
    }

    #[tokio::test]
    async fn changed_returns_none_after_drop() {
        let (tx, rx) = watch::channel(Arc::new(Vec::<Arc<u8>>::new()));
        let mut stream = FeedStream::new(rx);
        drop(tx);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn into_stream_yields_initial_snapshot() {
        let (_tx, rx) = watch::channel(Arc::new(vec![Arc::new(9u8)]));
        let mut stream = FeedStream::new(rx).into_stream();
        let first = stream.next().await.unwrap();
        assert_eq!(*first[0], 9);
    }
}
