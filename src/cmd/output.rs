// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rendering of results and events.
//!
//! Results go to stdout, as text lines or one pretty-printed JSON document.
//! Events go to stderr, one line each, so `--json` stdout stays parseable.

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::Result;
use crate::git::{
    Branch, ChangedFile, Commit, ConflictState, EngineEvent, EventBus, StashEntry,
};

/// Prints `value` as JSON, or the text lines produced by `text`.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn emit<T, F>(json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Vec<String>,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        for line in text() {
            println!("{line}");
        }
    }
    Ok(())
}

#[must_use]
pub fn format_changed_file(file: &ChangedFile) -> String {
    let marker = if file.staged { '+' } else { ' ' };
    format!("{marker}{:<9}{}", file.change_type, file.name)
}

#[must_use]
pub fn format_branch(branch: &Branch) -> String {
    let marker = if branch.is_current { '*' } else { ' ' };
    let mut line = format!("{marker} {}", branch.name);
    if let Some(upstream) = &branch.upstream {
        line.push_str(&format!(" -> {upstream}"));
    }
    if let Some(hash) = &branch.latest_commit_hash {
        let short = hash.get(..7).unwrap_or(hash);
        line.push_str(&format!("  {short}"));
    }
    if let Some(message) = &branch.latest_commit_message {
        line.push_str(&format!(" {message}"));
    }
    line
}

#[must_use]
pub fn format_commit(commit: &Commit) -> String {
    let mut line = format!("{} {}", commit.short_hash(), commit.date);
    if !commit.date.is_empty() {
        line.push(' ');
    }
    line.push_str(&format!("{}: {}", commit.author, commit.subject));
    let decorations: Vec<&str> = commit
        .refs
        .iter()
        .map(String::as_str)
        .chain(commit.tags.iter().map(String::as_str))
        .collect();
    if !decorations.is_empty() {
        line.push_str(&format!(" ({})", decorations.join(", ")));
    }
    line
}

#[must_use]
pub fn format_stash(entry: &StashEntry) -> String {
    format!("{} {} {}", entry.reference(), entry.oid, entry.message)
}

#[must_use]
pub fn format_conflict_state(state: &ConflictState) -> Vec<String> {
    if !state.is_merging && state.conflicted_files.is_empty() {
        return vec!["no merge in progress".to_string()];
    }
    let mut lines = vec![if state.is_merging {
        format!(
            "merge in progress, {} conflicted file(s)",
            state.conflicted_files.len()
        )
    } else {
        format!(
            "not merging, {} unmerged file(s)",
            state.conflicted_files.len()
        )
    }];
    lines.extend(state.conflicted_files.iter().map(|f| format!("  {f}")));
    lines
}

fn print_event(event: &EngineEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => eprintln!("{line}"),
            Err(e) => warn!(error = %e, event = %event, "failed to serialize event"),
        }
    } else {
        eprintln!("{event}");
    }
}

/// Prints bus events on stderr as they arrive, from its own task.
#[derive(Debug)]
pub struct EventPrinter {
    done: CancellationToken,
    handle: JoinHandle<()>,
}

impl EventPrinter {
    /// Subscribes to `bus` and starts printing. Must be called inside a runtime.
    #[must_use]
    pub fn spawn(bus: &EventBus, json: bool) -> Self {
        let subscription = bus.subscribe();
        let done = CancellationToken::new();
        let stop = done.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    event = subscription.recv() => match event {
                        Some(event) => print_event(&event, json),
                        None => return,
                    },
                    () = stop.cancelled() => break,
                }
            }
            for event in subscription.drain() {
                print_event(&event, json);
            }
        });
        Self { done, handle }
    }

    /// Prints whatever is still queued, then stops.
    pub async fn finish(self) {
        self.done.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "event printer task failed");
        }
    }
}
