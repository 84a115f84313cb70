//! On-disk configuration for scadalink.
//!
//! One TOML file with global defaults and a table per device group,
//! password resolution (env + keyring + plaintext), and translation to
//! `scadalink_core` connection and polling types. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scadalink_core::{ConnectionRecord, Credentials, GroupKind, GroupProfile, PollingConfig};

/// Keyring service name; entries are keyed `{group}/password`.
pub const KEYRING_SERVICE: &str = "scadalink";

/// Fallback password variable, consulted after a group's `password_env`.
pub const PASSWORD_ENV: &str = "SCADALINK_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown device group '{group}' (expected 'trainer-kit' or 'water-pump')")]
    UnknownGroup { group: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Per-group settings keyed by group id (`trainer-kit`, `water-pump`).
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,
}

impl Config {
    pub fn group(&self, id: &str) -> Option<&GroupConfig> {
        self.groups.get(id)
    }

    /// Group entry for `id`, created with defaults when absent.
    pub fn group_mut(&mut self, id: &str) -> Result<&mut GroupConfig, ConfigError> {
        parse_group(id)?;
        Ok(self.groups.entry(id.to_owned()).or_default())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Delay between poll cycles in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    2000
}

/// Connection and polling settings for one device group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// `192.168.1.31`, `host:port` or a full URL. Empty = not configured.
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Start polling as soon as the group is wired up.
    #[serde(default)]
    pub auto_start: bool,

    /// Override `defaults.poll_interval_ms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Override `defaults.timeout`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override the query endpoint suffix (`express`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_suffix: Option<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: default_username(),
            password: None,
            password_env: None,
            auto_start: false,
            poll_interval_ms: None,
            timeout: None,
            query_suffix: None,
        }
    }
}

fn default_username() -> String {
    "admin".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "scadalink", "scadalink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("scadalink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file, still layered under `SCADALINK_*` env vars
/// (`SCADALINK_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = config_figment(path).extract()?;
    Ok(config)
}

/// Defaults, then the TOML file, then `SCADALINK_DEFAULTS__*` and
/// `SCADALINK_GROUPS__*` variables. Flag variables such as
/// `SCADALINK_PASSWORD` never enter this layer.
fn config_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("SCADALINK_")
                .filter(|key| key.starts_with("defaults__") || key.starts_with("groups__"))
                .split("__"),
        )
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to pretty TOML, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a group's password from env, keyring, then plaintext.
///
/// Never fails: an empty password is a valid WebAccess account.
pub fn resolve_password(group: &GroupConfig, group_id: &str) -> SecretString {
    resolve_password_from(
        group,
        group_id,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

/// [`resolve_password`] with injectable env and keyring lookups.
pub fn resolve_password_from<E, K>(
    group: &GroupConfig,
    group_id: &str,
    env: E,
    keyring: K,
) -> SecretString
where
    E: Fn(&str) -> Option<String>,
    K: Fn(&str) -> Option<String>,
{
    // 1. Group's password_env → env var lookup
    if let Some(pw) = group.password_env.as_deref().and_then(&env) {
        return SecretString::from(pw);
    }

    // 2. Shared env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return SecretString::from(pw);
    }

    // 3. System keyring
    if let Some(pw) = keyring(group_id) {
        return SecretString::from(pw);
    }

    // 4. Plaintext in config, else empty
    SecretString::from(group.password.clone().unwrap_or_default())
}

fn keyring_password(group_id: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{group_id}/password"))
        .ok()?
        .get_password()
        .ok()
}

/// Store a group's password in the system keyring.
pub fn store_password(group_id: &str, password: &str) -> Result<(), ConfigError> {
    parse_group(group_id)?;
    keyring::Entry::new(KEYRING_SERVICE, &format!("{group_id}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation to core types ───────────────────────────────────────

fn parse_group(group_id: &str) -> Result<GroupKind, ConfigError> {
    group_id
        .parse::<GroupKind>()
        .map_err(|_| ConfigError::UnknownGroup {
            group: group_id.into(),
        })
}

/// Profile for `group_id`, with the configured query suffix applied.
pub fn group_profile(cfg: &Config, group_id: &str) -> Result<GroupProfile, ConfigError> {
    let profile = parse_group(group_id)?.profile();
    Ok(
        match cfg.group(group_id).and_then(|g| g.query_suffix.as_deref()) {
            Some(suffix) => profile.with_query_suffix(suffix),
            None => profile,
        },
    )
}

/// Build the connection record and polling tuning for one group.
///
/// A group missing from the file yields an unconfigured record (empty
/// host) with default tuning.
pub fn group_settings(
    cfg: &Config,
    group_id: &str,
) -> Result<(ConnectionRecord, PollingConfig), ConfigError> {
    parse_group(group_id)?;
    let fallback = GroupConfig::default();
    let group = cfg.group(group_id).unwrap_or(&fallback);

    let password = resolve_password(group, group_id);
    let record = ConnectionRecord::new(
        group.host.trim(),
        Credentials {
            username: group.username.clone(),
            password,
        },
    );
    Ok((record, polling_config(&cfg.defaults, group)?))
}

/// Polling tuning from defaults + per-group overrides.
pub fn polling_config(
    defaults: &Defaults,
    group: &GroupConfig,
) -> Result<PollingConfig, ConfigError> {
    let interval_ms = group.poll_interval_ms.unwrap_or(defaults.poll_interval_ms);
    if interval_ms == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }
    let timeout = group.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be greater than zero".into(),
        });
    }

    Ok(PollingConfig {
        interval: Duration::from_millis(interval_ms),
        request_timeout: Duration::from_secs(timeout),
        auto_start: group.auto_start,
    })
}
