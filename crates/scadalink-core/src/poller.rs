// ── Per-group polling loop ──
//
// One background task per running poller. Each cycle reads the
// connection record, issues a single tag query and folds the decoded
// frame into the group's DataStore, then sleeps a fixed interval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scadalink_api::{TransportConfig, WebAccessClient, codec};
use strum::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ConfigProvider, ConnectionRecord, PollingConfig};
use crate::error::CoreError;
use crate::model::{GroupProfile, GroupState};
use crate::store::DataStore;

/// Life-cycle state of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PollerState {
    Idle,
    Running,
}

/// Periodically pulls one device group's tags into its [`DataStore`].
///
/// At most one request is outstanding per poller, whether it comes from
/// the background loop or from [`poll_once`](Self::poll_once).
pub struct Poller<S: GroupState> {
    inner: Arc<PollerInner<S>>,
    task: Mutex<Option<RunningTask>>,
}

struct PollerInner<S: GroupState> {
    profile: GroupProfile,
    config: Arc<dyn ConfigProvider>,
    store: Arc<DataStore<S>>,
    polling: PollingConfig,
    http: reqwest::Client,
    state: watch::Sender<PollerState>,
    /// Bumped by every `start()`; only the newest run may report `Idle`.
    epoch: AtomicU64,
    in_flight: tokio::sync::Mutex<()>,
}

struct RunningTask {
    epoch: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl<S: GroupState> Poller<S> {
    /// Build a poller with its own HTTP client, bounded by
    /// `polling.request_timeout`.
    pub fn new(
        profile: GroupProfile,
        config: Arc<dyn ConfigProvider>,
        store: Arc<DataStore<S>>,
        polling: PollingConfig,
    ) -> Result<Self, CoreError> {
        let http = TransportConfig::with_timeout(polling.request_timeout).build_client()?;
        Ok(Self::with_client(http, profile, config, store, polling))
    }

    /// Build a poller around a shared `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        profile: GroupProfile,
        config: Arc<dyn ConfigProvider>,
        store: Arc<DataStore<S>>,
        polling: PollingConfig,
    ) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            inner: Arc::new(PollerInner {
                profile,
                config,
                store,
                polling,
                http,
                state,
                epoch: AtomicU64::new(0),
                in_flight: tokio::sync::Mutex::new(()),
            }),
            task: Mutex::new(None),
        }
    }

    pub fn profile(&self) -> &GroupProfile {
        &self.inner.profile
    }

    pub fn store(&self) -> &Arc<DataStore<S>> {
        &self.inner.store
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.inner.polling
    }

    // ── Life cycle ───────────────────────────────────────────────────

    /// Start the background loop. The first cycle runs immediately.
    ///
    /// Returns `false` without doing anything when the loop is already
    /// running or no host is configured. Must be called inside a tokio
    /// runtime.
    pub fn start(&self) -> bool {
        let group = self.inner.profile.id.as_str();
        let mut slot = self.lock_task();

        if slot.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            debug!(group, "poller already running");
            return false;
        }
        if self.inner.config.connection().is_none() {
            info!(group, "no host address configured, not starting");
            return false;
        }

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        self.inner.state.send_replace(PollerState::Running);
        let handle = tokio::spawn(poll_task(Arc::clone(&self.inner), cancel.clone(), epoch));
        *slot = Some(RunningTask {
            epoch,
            cancel,
            handle,
        });
        info!(group, interval = ?self.inner.polling.interval, "polling started");
        true
    }

    /// Start only when the group is configured to start on its own.
    pub fn auto_start(&self) -> bool {
        self.inner.polling.auto_start && self.start()
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// A pending wait or in-flight request is abandoned immediately; no
    /// request is issued by the stopped run after this returns. A run
    /// started while this waits keeps running. No-op while idle.
    pub async fn stop(&self) {
        let task = self.lock_task().take();
        let Some(task) = task else {
            return;
        };

        task.cancel.cancel();
        if let Err(e) = task.handle.await {
            warn!(group = %self.inner.profile.id, error = %e, "poll task ended abnormally");
        }
        self.inner.publish_idle(task.epoch);
        info!(group = %self.inner.profile.id, "polling stopped");
    }

    pub fn is_running(&self) -> bool {
        *self.inner.state.borrow() == PollerState::Running
    }

    /// Observe life-cycle transitions.
    pub fn state(&self) -> watch::Receiver<PollerState> {
        self.inner.state.subscribe()
    }

    /// Run one cycle now, outside the loop.
    ///
    /// Returns whether the store changed. Fails with
    /// [`CoreError::ConfigurationMissing`] when no host is configured.
    pub async fn poll_once(&self) -> Result<bool, CoreError> {
        let connection =
            self.inner
                .config
                .connection()
                .ok_or_else(|| CoreError::ConfigurationMissing {
                    group: self.inner.profile.id.clone(),
                })?;
        self.inner.cycle(&connection).await
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<RunningTask>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: GroupState> Drop for Poller<S> {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.cancel.cancel();
        }
    }
}

impl<S: GroupState> PollerInner<S> {
    /// Report `Idle` on behalf of run `epoch`, unless a newer run started.
    fn publish_idle(&self, epoch: u64) {
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch || *state == PollerState::Idle {
                return false;
            }
            *state = PollerState::Idle;
            true
        });
    }

    /// One request/decode/apply round trip.
    async fn cycle(&self, connection: &ConnectionRecord) -> Result<bool, CoreError> {
        let group = self.profile.id.as_str();
        let base_url = codec::base_url(&connection.host).map_err(|e| CoreError::InvalidHost {
            host: connection.host.clone(),
            reason: e.to_string(),
        })?;

        let _guard = self.in_flight.lock().await;
        let client = WebAccessClient::with_client(
            self.http.clone(),
            base_url,
            &connection.credentials.username,
            &connection.credentials.password,
        );

        debug!(group, host = %connection.host, tags = self.profile.tags.len(), "polling");
        let frame = client
            .get_tag_values(&self.profile.query_suffix, self.profile.tags.as_slice())
            .await?;
        Ok(self.store.apply_frame(&frame))
    }
}

// ── Background task ──────────────────────────────────────────────────

async fn poll_task<S: GroupState>(
    inner: Arc<PollerInner<S>>,
    cancel: CancellationToken,
    epoch: u64,
) {
    let group = inner.profile.id.as_str();

    loop {
        if cancel.is_cancelled() {
            break;
        }
        // Re-read every cycle: the host may change or be cleared while running.
        let Some(connection) = inner.config.connection() else {
            info!(group, "host address cleared, polling stopped");
            break;
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = inner.cycle(&connection) => match result {
                Ok(changed) => debug!(group, changed, "poll cycle complete"),
                Err(e) => warn!(group, error = %e, "poll cycle failed"),
            },
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(inner.polling.interval) => {}
        }
    }

    inner.publish_idle(epoch);
}
