use thiserror::Error;

/// Top-level error type for the `scadalink-api` crate.
///
/// Covers every failure mode of a single request against the WebAccess
/// JSON service: building the client, reaching the host, a non-success
/// status, and an undecodable body. `scadalink-core` maps these into
/// its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Host address could not be turned into a base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The controller answered with a non-2xx status.
    #[error("HTTP {status} from SCADA service")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The tag-value envelope was malformed or incomplete, with the raw
    /// body for debugging.
    #[error("Decode error: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure is likely to clear up on the next cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// HTTP status code, when the controller answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
