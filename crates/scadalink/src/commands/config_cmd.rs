//! Config subcommand handlers.

use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use serde_json::Value;

use scadalink_config::{Config, GroupConfig};
use scadalink_core::GroupKind;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, save_config_to, store_password};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking passwords.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval_ms = {}", cfg.defaults.poll_interval_ms);

    for (id, g) in &cfg.groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "[groups.{id}]");
        let _ = writeln!(out, "host = \"{}\"", g.host);
        let _ = writeln!(out, "username = \"{}\"", g.username);
        if g.password.is_some() {
            let _ = writeln!(out, "password = \"{MASK}\"");
        }
        if let Some(ref env) = g.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        let _ = writeln!(out, "auto_start = {}", g.auto_start);
        if let Some(interval) = g.poll_interval_ms {
            let _ = writeln!(out, "poll_interval_ms = {interval}");
        }
        if let Some(timeout) = g.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref suffix) = g.query_suffix {
            let _ = writeln!(out, "query_suffix = \"{suffix}\"");
        }
    }

    out
}

/// Structured view of the config with every stored password masked.
fn redacted_value(cfg: &Config) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(cfg).map_err(|e| CliError::Render(e.to_string()))?;
    if let Some(Value::Object(groups)) = value.get_mut("groups") {
        for group in groups.values_mut() {
            if let Some(password) = group.get_mut("password") {
                *password = Value::String(MASK.into());
            }
        }
    }
    Ok(value)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer keyring or plaintext storage for a password.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(password: &str, group_id: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_password(group_id, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

/// Interactive setup for one group. Returns `None` when the user skips it.
fn prompt_group(kind: GroupKind, existing: &GroupConfig) -> Result<Option<GroupConfig>, CliError> {
    eprintln!("── {kind} ──");

    let mut host_input = Input::<String>::new()
        .with_prompt("Host address (empty to skip)")
        .allow_empty(true);
    if !existing.host.is_empty() {
        host_input = host_input.default(existing.host.clone());
    }
    let host = host_input.interact_text().map_err(prompt_err)?;
    let host = host.trim().to_owned();
    if host.is_empty() {
        eprintln!("   skipped\n");
        return Ok(None);
    }

    let username: String = Input::new()
        .with_prompt("Username")
        .default(existing.username.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let password =
        rpassword::prompt_password("Password (empty for none): ").map_err(prompt_err)?;
    let password = if password.is_empty() {
        existing.password.clone()
    } else {
        prompt_keyring_storage(&password, kind.as_str())?
    };

    let auto_start = Confirm::new()
        .with_prompt("Poll this group when `scadalink watch` runs without arguments?")
        .default(existing.auto_start)
        .interact()
        .map_err(prompt_err)?;

    eprintln!();
    Ok(Some(GroupConfig {
        host,
        username,
        password,
        auto_start,
        ..existing.clone()
    }))
}

fn save(cfg: &Config, path: &Path) -> Result<(), CliError> {
    save_config_to(cfg, path)?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        ConfigCommand::Init => {
            eprintln!("✨ scadalink configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = config::load(global)?;
            for kind in [GroupKind::TrainerKit, GroupKind::WaterPump] {
                let existing = cfg.group(kind.as_str()).cloned().unwrap_or_default();
                if let Some(group) = prompt_group(kind, &existing)? {
                    *cfg.group_mut(kind.as_str())? = group;
                }
            }

            save(&cfg, &path)?;
            eprintln!("✓ Configuration saved to {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let value = redacted_value(&cfg)?;
            let out = output::render_single(&global.output, &value, |_| {
                format_config_redacted(&cfg)
            })?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetHost { group, host } => {
            let host = host.trim();
            if host.is_empty() {
                return Err(CliError::Validation {
                    field: "host".into(),
                    reason: "host cannot be empty".into(),
                });
            }

            let kind = GroupKind::from(group);
            let mut cfg = config::load(global)?;
            cfg.group_mut(kind.as_str())?.host = host.to_owned();
            save(&cfg, &path)?;

            if !global.quiet {
                eprintln!("✓ Host for '{kind}' set to {host}");
            }
            Ok(())
        }

        ConfigCommand::SetPassword { group, plaintext } => {
            let kind = GroupKind::from(group);
            let password = rpassword::prompt_password(format!("Password for {kind}: "))
                .map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            if plaintext {
                let mut cfg = config::load(global)?;
                cfg.group_mut(kind.as_str())?.password = Some(password);
                save(&cfg, &path)?;
                eprintln!("✓ Password for '{kind}' saved to {}", path.display());
            } else {
                store_password(kind.as_str(), &password)?;
                eprintln!("✓ Password for '{kind}' stored in system keyring");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
