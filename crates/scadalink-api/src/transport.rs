// Shared transport configuration for building reqwest::Client instances.
//
// Pollers and command dispatchers of every device group build their
// HTTP client through this module, so timeout and user agent settings
// live in one place.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("scadalink/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on one request's round trip.
    pub timeout: Duration,
    /// Connect phase timeout; kept shorter so an unreachable host fails fast.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    /// Transport with the given request timeout and a proportional connect timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Self::default().connect_timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Client(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_never_exceeds_request_timeout() {
        let short = TransportConfig::with_timeout(Duration::from_millis(500));
        assert_eq!(short.connect_timeout, Duration::from_millis(500));

        let long = TransportConfig::with_timeout(Duration::from_secs(60));
        assert_eq!(long.connect_timeout, Duration::from_secs(5));
    }
}
