// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration commands.

use serde_json::json;

use super::Context;
use super::output::emit;
use crate::cli::repo::{ConfigArgs, ConfigSubcommand};
use crate::config::Settings;
use crate::error::Result;
use crate::git::ConfigScope;

/// Reads or writes one git configuration key.
///
/// # Errors
///
/// Returns an error if the key is unset everywhere, or `git config` fails.
pub async fn run_config_command(args: &ConfigArgs, ctx: &Context) -> Result<()> {
    match &args.subcommand {
        ConfigSubcommand::Get { key } => {
            let value = ctx.client.config(&ctx.repo, key).await?;
            emit(ctx.json, &value, || {
                vec![format!("{} ({})", value.value, value.scope)]
            })
        }
        ConfigSubcommand::Set { key, value, global } => {
            let scope = if *global {
                ConfigScope::Global
            } else {
                ConfigScope::Repository
            };
            ctx.client.set_config(&ctx.repo, key, value, scope).await?;
            emit(
                ctx.json,
                &json!({ "key": key, "value": value, "scope": scope }),
                || vec![format!("{key} = {value} ({scope})")],
            )
        }
    }
}

/// Prints the configured user identity.
///
/// # Errors
///
/// Returns an error if `user.name` or `user.email` is unset.
pub async fn run_whoami_command(ctx: &Context) -> Result<()> {
    let identity = ctx.client.user_identity(&ctx.repo).await?;
    emit(ctx.json, &identity, || {
        vec![format!("{} <{}>", identity.name, identity.email)]
    })
}

/// Display current settings and the files they were loaded from.
///
/// # Errors
///
/// Returns an error if the settings cannot be serialized.
pub fn run_options_command(settings: &Settings, files: &[String], json: bool) -> Result<()> {
    emit(json, settings, || {
        let mut lines = settings.format_options();
        lines.push(String::new());
        if files.is_empty() {
            lines.push("no settings files loaded".to_string());
        } else {
            lines.extend(files.iter().cloned());
        }
        lines
    })
}
