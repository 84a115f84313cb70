//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use scadalink_config::ConfigError;
use scadalink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the SCADA host at {url}")]
    #[diagnostic(
        code(scadalink::connection_failed),
        help(
            "Check that the WebAccess node is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(scadalink::timeout),
        help("Increase the timeout with --timeout or check the node's responsiveness.")
    )]
    Timeout,

    // ── Service responses ────────────────────────────────────────────
    #[error("SCADA service answered HTTP {status}: {message}")]
    #[diagnostic(
        code(scadalink::http_status),
        help("401/403 usually means wrong credentials. Run: scadalink config set-password <group>")
    )]
    HttpStatus { status: u16, message: String },

    #[error("Malformed response from the SCADA service: {message}")]
    #[diagnostic(
        code(scadalink::decode),
        help("Check that the host is a WebAccess node and the query suffix is correct.")
    )]
    Decode { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No host address configured for device group '{group}'")]
    #[diagnostic(
        code(scadalink::no_host),
        help(
            "Set one with: scadalink config set-host {group} <address>\n\
             Or pass --host / SCADALINK_HOST."
        )
    )]
    NoHost { group: String },

    #[error("Invalid host address '{host}': {reason}")]
    #[diagnostic(
        code(scadalink::invalid_host),
        help("Use an IP address, host:port, or a full http(s):// URL.")
    )]
    InvalidHost { host: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(scadalink::config),
        help("Inspect the file with: scadalink config show")
    )]
    Config(#[from] ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(scadalink::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(scadalink::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(scadalink::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NoHost { .. } | Self::InvalidHost { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigurationMissing { group } => CliError::NoHost { group },
            CoreError::InvalidHost { host, reason } => CliError::InvalidHost { host, reason },
            CoreError::Transport { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Protocol { status, message } => CliError::HttpStatus { status, message },
            CoreError::Decode { message } => CliError::Decode { message },
            CoreError::Validation { message } => CliError::Validation {
                field: "tag".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
