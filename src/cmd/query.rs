// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only commands.

use super::Context;
use super::output::{emit, format_branch, format_changed_file, format_conflict_state};
use crate::cli::repo::DiffArgs;
use crate::error::Result;
use crate::git::DiffTarget;

/// Prints working-tree and index changes.
///
/// # Errors
///
/// Returns an error if `git status` fails.
pub async fn run_status_command(ctx: &Context) -> Result<()> {
    let files = ctx.client.status(&ctx.repo).await?;
    emit(ctx.json, &files, || {
        if files.is_empty() {
            vec!["nothing to commit, working tree clean".to_string()]
        } else {
            files.iter().map(format_changed_file).collect()
        }
    })
}

/// Prints local branches, the current one marked with `*`.
///
/// # Errors
///
/// Returns an error if `git branch` fails.
pub async fn run_branches_command(ctx: &Context) -> Result<()> {
    let branches = ctx.client.branches(&ctx.repo).await?;
    emit(ctx.json, &branches, || {
        branches.iter().map(format_branch).collect()
    })
}

/// Prints a per-file diff.
///
/// # Errors
///
/// Returns an error if git fails, e.g. for an unknown commit.
pub async fn run_diff_command(args: &DiffArgs, ctx: &Context) -> Result<()> {
    let target = match (&args.commit, args.staged) {
        (Some(hash), _) => DiffTarget::Commit(hash.clone()),
        (None, true) => DiffTarget::Staged,
        (None, false) => DiffTarget::WorkingTree,
    };
    let blocks = ctx
        .client
        .diff(&ctx.repo, &target, args.path.as_deref())
        .await?;
    emit(ctx.json, &blocks, || {
        blocks
            .iter()
            .map(|block| block.raw.trim_end().to_string())
            .collect()
    })
}

/// Prints whether a merge is in progress and the unmerged paths.
///
/// # Errors
///
/// Returns an error if the repository state cannot be read.
pub async fn run_merge_state_command(ctx: &Context) -> Result<()> {
    let state = ctx.client.conflict_state(&ctx.repo).await?;
    emit(ctx.json, &state, || format_conflict_state(&state))
}
