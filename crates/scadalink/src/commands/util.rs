//! Helpers shared by the telemetry commands.

use std::sync::Arc;

use scadalink_core::{ConfigProvider, DataStore, GroupState, Poller, SharedConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::GroupRuntime;
use crate::error::CliError;
use crate::output::{self, StateReport};

/// Fresh store + poller for one group, fed by a private copy of its
/// resolved connection record.
pub fn build_poller<S: GroupState>(runtime: &GroupRuntime) -> Result<Poller<S>, CliError> {
    let store = Arc::new(DataStore::<S>::new(runtime.profile.id.clone()));
    let provider: Arc<dyn ConfigProvider> = SharedConfig::shared(runtime.record.clone());
    Ok(Poller::new(
        runtime.profile.clone(),
        provider,
        store,
        runtime.polling.clone(),
    )?)
}

/// Owned rendering settings, so spawned tasks can print.
#[derive(Debug, Clone)]
pub struct RenderOpts {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl RenderOpts {
    pub fn from_global(global: &GlobalOpts) -> Self {
        Self {
            format: global.output.clone(),
            color: output::should_color(&global.color),
            quiet: global.quiet,
        }
    }

    pub fn print_snapshot<S: GroupState>(
        &self,
        store: &DataStore<S>,
        state: &S,
    ) -> Result<(), CliError> {
        let report = StateReport {
            group: store.group(),
            updated_at: store.last_frame_at(),
            state,
        };
        let out = output::render_state(&self.format, &report, self.color)?;
        output::print_output(&out, self.quiet);
        Ok(())
    }
}
