// ── Core error types ──
//
// Errors surfaced by pollers and command dispatchers. Consumers never
// see reqwest or serde errors directly: the `From<scadalink_api::Error>`
// impl folds transport-layer failures into this taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    /// No host address configured for the group. Not a fault: the
    /// poller treats it as "nothing to do".
    #[error("No host address configured for device group '{group}'")]
    ConfigurationMissing { group: String },

    #[error("Invalid host address '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot reach SCADA host at {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("SCADA request timed out")]
    Timeout,

    // ── Protocol ─────────────────────────────────────────────────────
    #[error("SCADA service answered HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    #[error("Malformed SCADA response: {message}")]
    Decode { message: String },

    // ── Operation ────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures the poll loop recovers from by
    /// retrying on the next cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout | Self::Protocol { .. } | Self::Decode { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<scadalink_api::Error> for CoreError {
    fn from(err: scadalink_api::Error) -> Self {
        match err {
            scadalink_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            scadalink_api::Error::Transport(e) => CoreError::Transport {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            scadalink_api::Error::Status { status, body } => CoreError::Protocol {
                status,
                message: if body.is_empty() {
                    "empty response body".into()
                } else {
                    body
                },
            },
            scadalink_api::Error::Decode { message, body: _ } => CoreError::Decode { message },
            scadalink_api::Error::InvalidUrl(e) => CoreError::InvalidHost {
                host: String::new(),
                reason: e.to_string(),
            },
            scadalink_api::Error::Client(message) => CoreError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_protocol() {
        let err = CoreError::from(scadalink_api::Error::Status {
            status: 503,
            body: String::new(),
        });
        assert!(matches!(err, CoreError::Protocol { status: 503, .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn decode_keeps_message_and_drops_body() {
        let err = CoreError::from(scadalink_api::Error::Decode {
            message: "response has no Values array".into(),
            body: "{}".into(),
        });
        assert_eq!(
            err.to_string(),
            "Malformed SCADA response: response has no Values array"
        );
    }

    #[test]
    fn configuration_missing_is_not_recoverable() {
        let err = CoreError::ConfigurationMissing {
            group: "water-pump".into(),
        };
        assert!(!err.is_recoverable());
    }
}
