// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stash command implementation.

use serde_json::json;

use super::Context;
use super::output::{emit, format_stash};
use crate::cli::stash::{StashArgs, StashEntryArgs, StashSubcommand};
use crate::error::{EngineResult, Result};
use crate::git::StashEntry;

/// Main handler for the stash command.
///
/// # Errors
///
/// Returns an error if the selected entry is missing or stale, or git fails.
pub async fn run_stash_command(args: &StashArgs, ctx: &Context) -> Result<()> {
    match &args.subcommand {
        StashSubcommand::List => {
            let entries = ctx.client.stash_list(&ctx.repo).await?;
            emit(ctx.json, &entries, || {
                entries.iter().map(format_stash).collect()
            })
        }
        StashSubcommand::Save(save) => {
            let created = ctx
                .client
                .stash_save(&ctx.repo, save.message.as_deref(), save.include_untracked)
                .await?;
            emit(ctx.json, &created, || {
                created.as_ref().map_or_else(
                    || vec!["no local changes to save".to_string()],
                    |entry| vec![format!("saved {}", format_stash(entry))],
                )
            })
        }
        StashSubcommand::Apply(selector) => {
            let entry = select(ctx, selector).await?;
            ctx.client.stash_apply(&ctx.repo, &entry).await?;
            report(ctx, "applied", &entry)
        }
        StashSubcommand::Pop(selector) => {
            let entry = select(ctx, selector).await?;
            ctx.client.stash_pop(&ctx.repo, &entry).await?;
            report(ctx, "popped", &entry)
        }
        StashSubcommand::Drop(selector) => {
            let entry = select(ctx, selector).await?;
            ctx.client.stash_drop(&ctx.repo, &entry).await?;
            report(ctx, "dropped", &entry)
        }
    }
}

/// Entry to act on: the caller's expectation when given, otherwise whatever
/// sits at the index now.
async fn select(ctx: &Context, selector: &StashEntryArgs) -> EngineResult<StashEntry> {
    match &selector.expect {
        Some(oid) => Ok(StashEntry {
            index: selector.index,
            oid: oid.clone(),
            message: String::new(),
        }),
        None => ctx.client.stash_at(&ctx.repo, selector.index).await,
    }
}

fn report(ctx: &Context, action: &str, entry: &StashEntry) -> Result<()> {
    emit(
        ctx.json,
        &json!({ "action": action, "entry": entry }),
        || vec![format!("{action} {} ({})", entry.reference(), entry.oid)],
    )
}
