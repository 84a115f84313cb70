// ── Actuation commands ──
//
// Fire-and-forget on/off writes to a single tag. Commands never touch
// the DataStore; the next poll reflects the device's real state.

use std::sync::Arc;

use scadalink_api::{TransportConfig, WebAccessClient, codec};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ConfigProvider;
use crate::error::CoreError;
use crate::model::{GroupProfile, SwitchState};

/// Sends on/off commands for one device group.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct CommandDispatcher {
    profile: GroupProfile,
    config: Arc<dyn ConfigProvider>,
    http: reqwest::Client,
}

impl CommandDispatcher {
    pub fn new(
        profile: GroupProfile,
        config: Arc<dyn ConfigProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        Ok(Self::with_client(transport.build_client()?, profile, config))
    }

    pub fn with_client(
        http: reqwest::Client,
        profile: GroupProfile,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            profile,
            config,
            http,
        }
    }

    pub fn profile(&self) -> &GroupProfile {
        &self.profile
    }

    /// Write `state` to `tag`. One request, no retry.
    ///
    /// Tags outside the group's allow-list and an unconfigured host are
    /// rejected before anything is sent.
    pub async fn send_command(&self, tag: &str, state: SwitchState) -> Result<(), CoreError> {
        let group = self.profile.id.as_str();

        if matches!(tag, "" | "." | "..") {
            warn!(group, tag, "command rejected: invalid tag name");
            return Err(CoreError::Validation {
                message: format!("'{tag}' is not a valid tag name"),
            });
        }
        if !self.profile.is_controllable(tag) {
            warn!(group, tag, "command rejected: tag is not controllable");
            return Err(CoreError::Validation {
                message: format!("tag '{tag}' is not controllable in device group '{group}'"),
            });
        }

        let connection = self
            .config
            .connection()
            .ok_or_else(|| CoreError::ConfigurationMissing {
                group: group.to_owned(),
            })?;
        let base_url = codec::base_url(&connection.host).map_err(|e| CoreError::InvalidHost {
            host: connection.host.clone(),
            reason: e.to_string(),
        })?;

        let client = WebAccessClient::with_client(
            self.http.clone(),
            base_url,
            &connection.credentials.username,
            &connection.credentials.password,
        );

        match client
            .set_tag_value(&self.profile.project, tag, state.wire_value())
            .await
        {
            Ok(()) => {
                info!(group, tag, %state, "command sent");
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(group, tag, %state, error = %err, "command failed");
                Err(err)
            }
        }
    }

    pub async fn turn_on(&self, tag: &str) -> Result<(), CoreError> {
        self.send_command(tag, SwitchState::On).await
    }

    pub async fn turn_off(&self, tag: &str) -> Result<(), CoreError> {
        self.send_command(tag, SwitchState::Off).await
    }

    /// Run [`send_command`](Self::send_command) as a detached task.
    ///
    /// The caller may drop the handle; the outcome is logged either way.
    pub fn spawn_command(
        &self,
        tag: impl Into<String>,
        state: SwitchState,
    ) -> JoinHandle<Result<(), CoreError>> {
        let dispatcher = self.clone();
        let tag = tag.into();
        tokio::spawn(async move { dispatcher.send_command(&tag, state).await })
    }
}
