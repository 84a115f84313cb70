// ── Runtime connection configuration ──
//
// These types describe *where* a device group lives and *how* to poll it.
// They carry credentials but never touch disk: `scadalink-config` (or any
// other front end) builds a `ConnectionRecord` and hands it in.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use secrecy::SecretString;

/// Username and password for Basic authentication.
///
/// An empty password is a valid account on WebAccess nodes.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: SecretString::from(String::new()),
        }
    }
}

/// Host address plus credentials for one device group.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRecord {
    /// `192.168.1.31`, `scada.local:8080`, or a full URL. Empty = not configured.
    pub host: String,
    pub credentials: Credentials,
}

impl ConnectionRecord {
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            credentials,
        }
    }

    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

// ── Provider contract ────────────────────────────────────────────────

/// Source of host address and credentials, consulted at the moment a
/// poll or command is due.
///
/// Implementations do no validation; an empty host means "not configured".
pub trait ConfigProvider: Send + Sync {
    fn host_address(&self) -> String;

    fn credentials(&self) -> Credentials;

    /// Host and credentials, or `None` when no host is configured.
    fn connection(&self) -> Option<ConnectionRecord> {
        let host = self.host_address();
        if host.trim().is_empty() {
            return None;
        }
        Some(ConnectionRecord::new(host, self.credentials()))
    }
}

/// Externally mutable, lock-free configuration shared by a settings
/// front end and any number of pollers/dispatchers.
///
/// Every read sees a whole record; a host change never tears against
/// a credential change.
#[derive(Debug, Default)]
pub struct SharedConfig {
    record: ArcSwap<ConnectionRecord>,
}

impl SharedConfig {
    pub fn new(record: ConnectionRecord) -> Self {
        Self {
            record: ArcSwap::from_pointee(record),
        }
    }

    /// Shorthand for a shareable handle.
    pub fn shared(record: ConnectionRecord) -> Arc<Self> {
        Arc::new(Self::new(record))
    }

    /// Current record.
    pub fn record(&self) -> Arc<ConnectionRecord> {
        self.record.load_full()
    }

    pub fn set_host_address(&self, host: impl Into<String>) {
        let host = host.into();
        self.record.rcu(|current| ConnectionRecord {
            host: host.clone(),
            credentials: current.credentials.clone(),
        });
    }

    /// Clear the host. A running poller stops at its next loop head.
    pub fn clear_host_address(&self) {
        self.set_host_address(String::new());
    }

    pub fn set_credentials(&self, credentials: Credentials) {
        self.record.rcu(|current| ConnectionRecord {
            host: current.host.clone(),
            credentials: credentials.clone(),
        });
    }

    pub fn replace(&self, record: ConnectionRecord) {
        self.record.store(Arc::new(record));
    }
}

impl ConfigProvider for SharedConfig {
    fn host_address(&self) -> String {
        self.record.load().host.clone()
    }

    fn credentials(&self) -> Credentials {
        self.record.load().credentials.clone()
    }

    fn connection(&self) -> Option<ConnectionRecord> {
        let record = self.record.load_full();
        record.has_host().then(|| (*record).clone())
    }
}

// ── Polling tuning ───────────────────────────────────────────────────

/// Per-group cycle tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Fixed delay between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Upper bound on one request's round trip.
    pub request_timeout: Duration,
    /// Start polling as soon as the front end wires the group up.
    pub auto_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            auto_start: false,
        }
    }
}
