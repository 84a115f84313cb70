//! Command dispatch: bridges CLI args -> core pollers/dispatchers -> output.

pub mod config_cmd;
pub mod read;
pub mod set;
pub mod tags;
pub mod util;
pub mod watch;

use clap::CommandFactory;

use crate::cli::{Cli, Command, CompletionsArgs, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Watch(args) => watch::handle(args, global).await,
        Command::Read(args) => read::handle(&args, global).await,
        Command::Set(args) => set::handle(args, global).await,
        Command::Tags(args) => tags::handle(&args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }
    }
}

fn completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "scadalink", &mut std::io::stdout());
}
