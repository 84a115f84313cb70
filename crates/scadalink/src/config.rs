//! CLI configuration: the shared config crate plus `GlobalOpts` overrides.
//!
//! Core never sees the TOML types; it receives a `GroupProfile`, a
//! `ConnectionRecord` and a `PollingConfig` built here.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use scadalink_config::{Config, group_profile, group_settings};
use scadalink_core::{ConnectionRecord, GroupKind, GroupProfile, PollingConfig};

use crate::cli::{GlobalOpts, Group};
use crate::error::CliError;

pub use scadalink_config::{save_config_to, store_password};

/// Everything needed to poll or command one group.
#[derive(Debug)]
pub struct GroupRuntime {
    pub kind: GroupKind,
    pub profile: GroupProfile,
    pub record: ConnectionRecord,
    pub polling: PollingConfig,
}

impl From<Group> for GroupKind {
    fn from(group: Group) -> Self {
        match group {
            Group::TrainerKit => GroupKind::TrainerKit,
            Group::WaterPump => GroupKind::WaterPump,
        }
    }
}

/// Config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(scadalink_config::config_path)
}

/// Load the config file in effect. A missing file yields defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(scadalink_config::load_config_from(&config_file(global))?)
}

/// Resolve one group from the config file, then apply CLI flag overrides.
pub fn resolve_group(
    cfg: &Config,
    kind: GroupKind,
    global: &GlobalOpts,
) -> Result<GroupRuntime, CliError> {
    let id = kind.as_str();
    let profile = group_profile(cfg, id)?;
    let (mut record, mut polling) = group_settings(cfg, id)?;

    if let Some(ref host) = global.host {
        record.host = host.trim().to_owned();
    }
    if let Some(ref username) = global.username {
        record.credentials.username.clone_from(username);
    }
    if let Some(ref password) = global.password {
        record.credentials.password = SecretString::from(password.clone());
    }
    if let Some(timeout) = global.timeout {
        if timeout == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        polling.request_timeout = Duration::from_secs(timeout);
    }
    if let Some(interval_ms) = global.interval_ms {
        if interval_ms == 0 {
            return Err(CliError::Validation {
                field: "interval-ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        polling.interval = Duration::from_millis(interval_ms);
    }

    Ok(GroupRuntime {
        kind,
        profile,
        record,
        polling,
    })
}

/// Groups marked `auto_start` in the config file, in id order.
pub fn auto_start_groups(cfg: &Config) -> Vec<GroupKind> {
    cfg.groups
        .iter()
        .filter(|(_, group)| group.auto_start)
        .filter_map(|(id, _)| id.parse::<GroupKind>().ok())
        .collect()
}
