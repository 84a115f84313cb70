// ── Per-group reactive data store ──
//
// Holds the latest typed snapshot of one device group. Frames are folded
// in under the channel's write lock and committed as one swap, then
// registered listeners run synchronously.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use scadalink_api::TelemetryFrame;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::listeners::{ListenerId, ListenerRegistry};
use crate::model::{GroupState, TagUpdate};
use crate::stream::StateStream;

/// Latest known state of one device group.
///
/// Reads never block writers and always see a whole snapshot.
pub struct DataStore<S: GroupState> {
    group: String,
    state: watch::Sender<Arc<S>>,
    listeners: ListenerRegistry,
    last_frame_at: watch::Sender<Option<DateTime<Utc>>>,
}

impl<S: GroupState> DataStore<S> {
    /// Empty store at the group's default state. `group` only labels logs.
    pub fn new(group: impl Into<String>) -> Self {
        let (state, _) = watch::channel(Arc::new(S::default()));
        let (last_frame_at, _) = watch::channel(None);

        Self {
            group: group.into(),
            state,
            listeners: ListenerRegistry::new(),
            last_frame_at,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.state.borrow())
    }

    /// Channel-backed subscription to snapshot changes.
    pub fn watch(&self) -> StateStream<S> {
        StateStream::new(self.state.subscribe())
    }

    /// When the last decoded frame was applied, changed or not.
    pub fn last_frame_at(&self) -> Option<DateTime<Utc>> {
        *self.last_frame_at.borrow()
    }

    /// Time since the last applied frame.
    pub fn data_age(&self) -> Option<TimeDelta> {
        self.last_frame_at().map(|at| Utc::now() - at)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Fold a decoded frame into the state.
    ///
    /// Only the first reading per name counts. Unknown names are logged
    /// and skipped. Returns `true` (after listeners ran) when at least
    /// one field changed.
    pub fn apply_frame(&self, frame: &TelemetryFrame) -> bool {
        let group = self.group.as_str();
        let changed = self.state.send_if_modified(|slot| {
            let mut seen = HashSet::with_capacity(frame.readings.len());
            let mut next: Option<S> = None;
            let mut touched = false;

            for reading in &frame.readings {
                if !seen.insert(reading.name.as_str()) {
                    debug!(group, tag = %reading.name, "duplicate reading in frame, skipped");
                    continue;
                }
                let state = next.get_or_insert_with(|| S::clone(slot));
                let update = state.apply_reading(&reading.name, reading.value);
                if update == TagUpdate::Unknown {
                    warn!(group, tag = %reading.name, "unknown tag in frame, skipped");
                }
                touched |= update.is_changed();
            }

            match next {
                Some(state) if touched => {
                    *slot = Arc::new(state);
                    true
                }
                _ => false,
            }
        });
        self.last_frame_at.send_replace(Some(Utc::now()));

        if changed {
            debug!(group, readings = frame.len(), "snapshot updated");
            self.listeners.notify(group);
        }
        changed
    }

    /// Return every field to its default and notify, even when the
    /// state already was the default.
    pub fn reset_to_defaults(&self) {
        self.state.send_replace(Arc::new(S::default()));
        self.last_frame_at.send_replace(None);
        self.listeners.notify(&self.group);
    }

    // ── Listeners ────────────────────────────────────────────────────

    /// Register a callback run after every change.
    pub fn subscribe<F>(&self, handler: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(handler))
    }

    /// Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
