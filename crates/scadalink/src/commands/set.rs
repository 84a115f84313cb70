//! `scadalink set <group> <tag> <on|off>`: one actuation command.

use std::sync::Arc;

use scadalink_core::{
    CommandDispatcher, ConfigProvider, SharedConfig, SwitchState, TransportConfig,
};

use crate::cli::{GlobalOpts, SetArgs, Switch};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::resolve_group(&cfg, args.group.into(), global)?;
    let group = runtime.profile.id.clone();

    let provider: Arc<dyn ConfigProvider> = SharedConfig::shared(runtime.record);
    let transport = TransportConfig::with_timeout(runtime.polling.request_timeout);
    let dispatcher = CommandDispatcher::new(runtime.profile, provider, &transport)?;

    let state = match args.state {
        Switch::On => SwitchState::On,
        Switch::Off => SwitchState::Off,
    };
    dispatcher.send_command(&args.tag, state).await?;

    if !global.quiet {
        eprintln!("✓ {group}: {} switched {state}", args.tag);
    }
    Ok(())
}
