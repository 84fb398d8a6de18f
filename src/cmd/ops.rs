// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commands that change the repository.
//!
//! Tracked operations report progress through the event bus; the handlers
//! here only print the final result.

use anyhow::bail;
use serde_json::json;

use super::Context;
use super::output::emit;
use crate::cli::merge::{MergeArgs, ResolveArgs};
use crate::cli::repo::{
    BranchDeleteArgs, CheckoutArgs, CommitArgs, FetchArgs, InitArgs, PullArgs, PushArgs,
};
use crate::error::Result;
use crate::git::MergeOutcome;

fn done(ctx: &Context, action: &str, message: String) -> Result<()> {
    emit(ctx.json, &json!({ "action": action, "ok": true }), || {
        vec![message]
    })
}

/// Creates a repository.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or `git init` fails.
pub async fn run_init_command(args: &InitArgs, ctx: &Context) -> Result<()> {
    let path = args.path.as_deref().unwrap_or(&ctx.repo);
    ctx.client.init(path).await?;
    done(
        ctx,
        "init",
        format!("initialized repository in {}", path.display()),
    )
}

/// Switches branches, creating the branch first with `-b`.
///
/// # Errors
///
/// Returns an error if git refuses the checkout.
pub async fn run_checkout_command(args: &CheckoutArgs, ctx: &Context) -> Result<()> {
    if args.create {
        ctx.client
            .create_branch(&ctx.repo, &args.branch, true)
            .await?;
    } else {
        ctx.client.checkout(&ctx.repo, &args.branch).await?;
    }
    done(ctx, "checkout", format!("switched to {}", args.branch))
}

/// Deletes a local branch.
///
/// # Errors
///
/// Returns an error if the branch is unmerged (without `-f`) or missing.
pub async fn run_branch_delete_command(args: &BranchDeleteArgs, ctx: &Context) -> Result<()> {
    ctx.client
        .delete_branch(&ctx.repo, &args.name, args.force)
        .await?;
    done(ctx, "branch-delete", format!("deleted branch {}", args.name))
}

/// Commits staged changes, or every change with `-a`.
///
/// # Errors
///
/// Returns an error if there is nothing to commit or git fails.
pub async fn run_commit_command(args: &CommitArgs, ctx: &Context) -> Result<()> {
    if args.all {
        ctx.client.commit_all(&ctx.repo, &args.message).await?;
    } else {
        ctx.client.commit(&ctx.repo, &args.message).await?;
    }
    done(ctx, "commit", "committed".to_string())
}

/// Pushes the current branch.
///
/// # Errors
///
/// Returns an error if the push is rejected, times out or is interrupted.
pub async fn run_push_command(args: &PushArgs, ctx: &Context) -> Result<()> {
    ctx.client
        .push(
            &ctx.repo,
            args.remote.as_deref(),
            args.branch.as_deref(),
            args.set_upstream,
        )
        .await?;
    done(ctx, "push", "pushed".to_string())
}

/// Pulls with a merge.
///
/// # Errors
///
/// Returns an error if the pull fails or stops on conflicts.
pub async fn run_pull_command(args: &PullArgs, ctx: &Context) -> Result<()> {
    ctx.client
        .pull(&ctx.repo, args.remote.as_deref(), args.branch.as_deref())
        .await?;
    done(ctx, "pull", "pulled".to_string())
}

/// Fetches and prunes.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn run_fetch_command(args: &FetchArgs, ctx: &Context) -> Result<()> {
    ctx.client
        .fetch(&ctx.repo, args.remote.as_deref())
        .await?;
    done(ctx, "fetch", "fetched".to_string())
}

/// Merges a branch. Stopping on conflicts prints them and fails the command.
///
/// # Errors
///
/// Returns an error if git fails or the merge stopped on conflicts.
pub async fn run_merge_command(args: &MergeArgs, ctx: &Context) -> Result<()> {
    let outcome = ctx.client.merge(&ctx.repo, &args.branch).await?;
    emit(ctx.json, &outcome, || match &outcome {
        MergeOutcome::Merged => vec![format!("merged {}", args.branch)],
        MergeOutcome::Conflicted(files) => {
            let mut lines = vec![format!("conflicts merging {}:", args.branch)];
            lines.extend(files.iter().map(|f| format!("  {f}")));
            lines
        }
    })?;
    if let MergeOutcome::Conflicted(files) = outcome {
        bail!(
            "merge stopped with {} conflicted file(s); resolve them, then run `gitops merge-continue`",
            files.len()
        );
    }
    Ok(())
}

/// Concludes the merge in progress.
///
/// # Errors
///
/// Returns an error if no merge is in progress or conflicts remain.
pub async fn run_merge_continue_command(ctx: &Context) -> Result<()> {
    ctx.client.continue_merge(&ctx.repo).await?;
    done(ctx, "merge-continue", "merge concluded".to_string())
}

/// Abandons the merge in progress.
///
/// # Errors
///
/// Returns an error if no merge is in progress.
pub async fn run_merge_abort_command(ctx: &Context) -> Result<()> {
    ctx.client.abort_merge(&ctx.repo).await?;
    done(ctx, "merge-abort", "merge aborted".to_string())
}

/// Resolves files by taking one side, or stages them as edited.
///
/// # Errors
///
/// Returns an error if git fails for any file.
pub async fn run_resolve_command(args: &ResolveArgs, ctx: &Context) -> Result<()> {
    match args.take {
        Some(side) => {
            for file in &args.files {
                ctx.client.resolve(&ctx.repo, file, side.into()).await?;
            }
        }
        None => {
            let files: Vec<&str> = args.files.iter().map(String::as_str).collect();
            ctx.client.mark_resolved(&ctx.repo, &files).await?;
        }
    }
    done(
        ctx,
        "resolve",
        format!("resolved {} file(s)", args.files.len()),
    )
}
