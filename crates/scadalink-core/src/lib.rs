// scadalink-core: Acquisition pipeline between scadalink-api and consumers (CLI).

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod poller;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::CommandDispatcher;
pub use config::{ConfigProvider, ConnectionRecord, Credentials, PollingConfig, SharedConfig};
pub use error::CoreError;
pub use poller::{Poller, PollerState};
pub use store::{DataStore, ListenerId};
pub use stream::{StateStream, StateWatchStream};

pub use model::{
    GroupKind, GroupProfile, GroupState, PUMP_TAGS, SwitchState, TagUpdate, TrainerKitState,
    WaterPumpState,
};
pub use scadalink_api::{TagReading, TelemetryFrame, TransportConfig};
