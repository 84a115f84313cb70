//! Clap derive structures for the `scadalink` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Also
//! compiled by `build.rs` for man pages, so it depends on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// scadalink -- poll and switch WebAccess SCADA device groups
#[derive(Debug, Parser)]
#[command(
    name = "scadalink",
    version,
    about = "Watch, read and switch WebAccess SCADA device groups",
    long_about = "Telemetry and actuation client for the WebAccess JSON web service.\n\n\
        Polls a fixed tag set per device group (trainer kit, water pump),\n\
        reports state changes, and sends on/off commands to switchable tags.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// SCADA host address (overrides the config file for every group)
    #[arg(long, short = 'H', env = "SCADALINK_HOST", global = true)]
    pub host: Option<String>,

    /// Username for Basic authentication
    #[arg(long, short = 'u', env = "SCADALINK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for Basic authentication
    #[arg(long, env = "SCADALINK_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "SCADALINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCADALINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "SCADALINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Delay between poll cycles in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, `field=value` per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Shared value types ───────────────────────────────────────────────

/// Device group selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Group {
    /// Lamps, buttons, switches, fan, thermocouple and current injector
    #[value(alias = "kit")]
    TrainerKit,
    /// Flow, level, pressure, temperature, vibration and four pumps
    #[value(alias = "pump")]
    WaterPump,
}

/// Switch position for `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    #[value(aliases = ["1", "true"])]
    On,
    #[value(aliases = ["0", "false"])]
    Off,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll device groups and print every state change until Ctrl-C
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Poll a device group once and print its state
    #[command(alias = "r")]
    Read(ReadArgs),

    /// Switch a tag on or off
    Set(SetArgs),

    /// List a group's tags and which ones accept commands
    Tags(TagsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TELEMETRY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Groups to watch (default: every configured group with auto_start)
    pub groups: Vec<Group>,

    /// Exit after this many snapshots per group
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    pub group: Group,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub group: Group,

    /// Tag name as configured on the SCADA node (case-sensitive)
    pub tag: String,

    /// on | off | 1 | 0
    pub state: Switch,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    pub group: Group,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// Set a group's host address
    SetHost {
        group: Group,

        /// `192.168.1.31`, `host:port` or a full URL
        host: String,
    },

    /// Store a group's password in the system keyring
    SetPassword {
        group: Group,

        /// Write it to the config file instead
        #[arg(long)]
        plaintext: bool,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
