// ── Change listener registry ──
//
// Copy-on-write list of zero-argument callbacks. Notification walks a
// loaded snapshot of the list, so handlers may subscribe or unsubscribe
// while a notification is in progress.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tracing::warn;

/// Handle returned by [`DataStore::subscribe`](super::DataStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: ArcSwap<Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push((id, Arc::clone(&listener)));
            next
        });
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let previous = self.entries.rcu(|current| {
            current
                .iter()
                .filter(|(existing, _)| *existing != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|(existing, _)| *existing == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Invoke every listener in registration order. A panicking listener
    /// is logged and skipped.
    pub(crate) fn notify(&self, group: &str) {
        let entries = self.entries.load_full();
        for (id, listener) in entries.iter() {
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                warn!(group, listener = id.0, "change listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn listeners_run_in_registration_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = Arc::clone(&log);
            registry.add(Arc::new(move || log.lock().unwrap_or_else(|e| e.into_inner()).push(n)));
        }

        registry.notify("test");

        assert_eq!(*log.lock().unwrap_or_else(|e| e.into_inner()), vec![0, 1, 2]);
    }

    #[test]
    fn remove_reports_whether_the_id_was_registered() {
        let registry = ListenerRegistry::new();
        let id = registry.add(Arc::new(|| {}));
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn panicking_listener_does_not_starve_the_rest() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicU64::new(0));
        registry.add(Arc::new(|| panic!("listener bug")));
        let counter = Arc::clone(&hits);
        registry.add(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.notify("test");
        registry.notify("test");

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
