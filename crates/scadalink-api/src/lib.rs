//! Async Rust client for the WebAccess SCADA JSON web service.
//!
//! - [`codec`]: wire shapes for the tag query, the `{ Result, Values }`
//!   response envelope, command URLs and the Basic-Auth header.
//! - [`WebAccessClient`]: one host, one set of credentials, two
//!   endpoints (`GetTagValue`, `SetTagValue`).
//! - [`TransportConfig`]: shared `reqwest::Client` construction.

pub mod client;
pub mod codec;
pub mod error;
pub mod transport;

pub use client::WebAccessClient;
pub use codec::{ResultSummary, TagReading, TelemetryFrame};
pub use error::Error;
pub use transport::TransportConfig;
