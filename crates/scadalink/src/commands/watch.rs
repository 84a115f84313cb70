//! `scadalink watch [groups...]`: poll until Ctrl-C, print every change.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use scadalink_core::{GroupKind, GroupState, Poller, TrainerKitState, WaterPumpState};

use super::util::{self, RenderOpts};
use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;

    let mut kinds: Vec<GroupKind> = if args.groups.is_empty() {
        config::auto_start_groups(&cfg)
    } else {
        args.groups.iter().copied().map(GroupKind::from).collect()
    };
    let mut seen = HashSet::new();
    kinds.retain(|kind| seen.insert(*kind));
    if kinds.is_empty() {
        return Err(CliError::Validation {
            field: "groups".into(),
            reason: "no group given and none has auto_start = true in the config file".into(),
        });
    }

    let runtimes = kinds
        .into_iter()
        .map(|kind| config::resolve_group(&cfg, kind, global))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(rt) = runtimes.iter().find(|rt| !rt.record.has_host()) {
        return Err(CliError::NoHost {
            group: rt.profile.id.clone(),
        });
    }

    let render = RenderOpts::from_global(global);
    let cancel = CancellationToken::new();
    let mut tasks = JoinSet::new();

    for runtime in &runtimes {
        let (render, cancel) = (render.clone(), cancel.clone());
        match runtime.kind {
            GroupKind::TrainerKit => {
                let poller = util::build_poller::<TrainerKitState>(runtime)?;
                tasks.spawn(watch_group(poller, args.count, render, cancel));
            }
            GroupKind::WaterPump => {
                let poller = util::build_poller::<WaterPumpState>(runtime)?;
                tasks.spawn(watch_group(poller, args.count, render, cancel));
            }
        }
    }

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, stopping pollers");
            interrupt.cancel();
        }
    });

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap_or_else(|e| Err(CliError::Internal(e.to_string())));
        if let Err(err) = outcome {
            cancel.cancel();
            first_error.get_or_insert(err);
        }
    }

    first_error.map_or(Ok(()), Err)
}

/// Print an initial snapshot, then one per committed change.
///
/// Ends after `count` snapshots, on cancellation, or when the store is gone.
async fn watch_group<S: GroupState>(
    poller: Poller<S>,
    count: Option<usize>,
    render: RenderOpts,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let store = Arc::clone(poller.store());
    let group = store.group().to_owned();
    let done = |printed: usize| count.is_some_and(|n| printed >= n);
    let mut printed = 0usize;

    match poller.poll_once().await {
        Ok(_) => {
            render.print_snapshot(&store, &store.snapshot())?;
            printed += 1;
        }
        Err(e) if e.is_recoverable() => warn!(group = %group, error = %e, "initial poll failed"),
        Err(e) => return Err(e.into()),
    }
    if done(printed) {
        return Ok(());
    }

    let mut stream = store.watch();
    poller.start();
    debug!(group = %group, "watching for changes");

    let result = loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break Ok(()),
            next = stream.changed() => {
                let Some(snapshot) = next else { break Ok(()) };
                if let Err(e) = render.print_snapshot(&store, &snapshot) {
                    break Err(e);
                }
                printed += 1;
                if done(printed) {
                    break Ok(());
                }
            }
        }
    };

    poller.stop().await;
    result
}
