// ── Reactive state streams ──
//
// Async subscription to one group's snapshots, for consumers that would
// rather await changes than register a callback.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::GroupState;

/// A subscription to one device group's state.
///
/// Holds the snapshot seen at creation (or at the last `changed()`) and
/// can wait for the next committed change.
pub struct StateStream<S: GroupState> {
    current: Arc<S>,
    receiver: watch::Receiver<Arc<S>>,
}

impl<S: GroupState> StateStream<S> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<S>>) -> Self {
        let current = Arc::clone(&receiver.borrow());
        Self { current, receiver }
    }

    /// Snapshot captured at creation time or by the last `changed()`.
    pub fn current(&self) -> &Arc<S> {
        &self.current
    }

    /// Latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<S> {
        Arc::clone(&self.receiver.borrow())
    }

    /// Wait for the next change and return the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        self.receiver.changed().await.ok()?;
        let snap = Arc::clone(&self.receiver.borrow_and_update());
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` that yields the current snapshot first,
    /// then one item per change.
    pub fn into_stream(self) -> StateWatchStream<S> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateWatchStream<S: GroupState> {
    inner: WatchStream<Arc<S>>,
}

impl<S: GroupState> Stream for StateWatchStream<S> {
    type Item = Arc<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Arc<S> is Unpin, so WatchStream is too.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
