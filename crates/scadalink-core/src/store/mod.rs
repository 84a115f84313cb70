// ── Reactive state storage ──
//
// One `DataStore` per device group: the latest typed snapshot, a
// listener registry for synchronous change callbacks and a `watch`
// channel for async consumers.

mod data_store;
mod listeners;

pub use data_store::DataStore;
pub use listeners::ListenerId;
