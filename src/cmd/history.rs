// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Log command.
//!
//! ```text
//! log --skip S -n L          one stateless window
//! log -n L --pages P         LogCursor walks P pages (0 = all)
//! ```

use anyhow::bail;
use tracing::debug;

use super::Context;
use super::output::{emit, format_commit};
use crate::cli::repo::LogArgs;
use crate::config::types::HistorySettings;
use crate::error::Result;
use crate::git::LogReader;

/// Prints commit history.
///
/// # Errors
///
/// Returns an error if the page size is zero or `git log` fails.
pub async fn run_log_command(args: &LogArgs, ctx: &Context) -> Result<()> {
    let page_size = args.limit.unwrap_or(ctx.history.page_size);
    if page_size == 0 {
        bail!("--limit must be greater than zero");
    }
    let reader = LogReader::new(
        ctx.client.clone(),
        HistorySettings {
            page_size,
            ..ctx.history.clone()
        },
    );

    let mut commits = Vec::new();
    if args.working_tree
        && let Some(pending) = ctx.client.working_tree_commit(&ctx.repo).await?
    {
        commits.push(pending);
    }

    if args.pages == 1 {
        commits.extend(reader.page(&ctx.repo, args.skip, page_size).await?);
    } else {
        let mut cursor = reader.cursor();
        let mut pages = 0;
        while args.pages == 0 || pages < args.pages {
            let page = reader.load_next(&ctx.repo, &mut cursor).await?;
            if page.is_empty() {
                break;
            }
            commits.extend(page);
            pages += 1;
        }
        debug!(pages, loaded = cursor.loaded(), more = cursor.has_more(), "log read");
    }

    emit(ctx.json, &commits, || commits.iter().map(format_commit).collect())
}
