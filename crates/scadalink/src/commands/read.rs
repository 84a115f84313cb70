//! `scadalink read <group>`: one poll, one snapshot.

use scadalink_core::{GroupKind, GroupState, TrainerKitState, WaterPumpState};

use super::util::{self, RenderOpts};
use crate::cli::{GlobalOpts, ReadArgs};
use crate::config::{self, GroupRuntime};
use crate::error::CliError;

pub async fn handle(args: &ReadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let runtime = config::resolve_group(&cfg, args.group.into(), global)?;

    match runtime.kind {
        GroupKind::TrainerKit => read::<TrainerKitState>(&runtime, global).await,
        GroupKind::WaterPump => read::<WaterPumpState>(&runtime, global).await,
    }
}

async fn read<S: GroupState>(runtime: &GroupRuntime, global: &GlobalOpts) -> Result<(), CliError> {
    let poller = util::build_poller::<S>(runtime)?;
    poller.poll_once().await?;

    let store = poller.store();
    RenderOpts::from_global(global).print_snapshot(store, &store.snapshot())
}
