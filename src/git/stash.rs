// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stash stack operations.
//!
//! Entries are addressed by position, and positions shift whenever the
//! stack changes: after dropping `stash@{0}` the former `stash@{1}` is
//! `stash@{0}`. Mutating operations therefore take the [`StashEntry`] the
//! caller listed, re-list the stack and refuse to act if that position now
//! holds a different stash commit.

use std::path::Path;
use tracing::debug;

use super::client::GitClient;
use super::parse;
use super::repo;
use super::types::StashEntry;
use crate::core::process::CommandRunner;
use crate::error::{EngineResult, StashError};

impl<R: CommandRunner> GitClient<R> {
    /// Current stash stack, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if `git stash list` fails.
    pub async fn stash_list(&self, repo: &Path) -> EngineResult<Vec<StashEntry>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let output = self
            .query(repo, ["stash", "list", parse::STASH_FORMAT])
            .await?;
        Ok(parse::parse_stash_list(&output))
    }

    /// Entry currently at `index`.
    ///
    /// # Errors
    ///
    /// Returns `StashError::OutOfRange` if the stack is shorter.
    pub async fn stash_at(&self, repo: &Path, index: usize) -> EngineResult<StashEntry> {
        let entries = self.stash_list(repo).await?;
        let len = entries.len();
        entries
            .into_iter()
            .find(|e| e.index == index)
            .ok_or_else(|| StashError::OutOfRange { index, len }.into())
    }

    /// Stashes local changes. Returns the new entry, or `None` when there
    /// was nothing to stash.
    ///
    /// # Errors
    ///
    /// Returns an error if `git stash push` fails.
    pub async fn stash_save(
        &self,
        repo: &Path,
        message: Option<&str>,
        include_untracked: bool,
    ) -> EngineResult<Option<StashEntry>> {
        let before = self.stash_list(repo).await?.into_iter().next();

        let mut args = vec!["stash", "push", "--quiet"];
        if include_untracked {
            args.push("--include-untracked");
        }
        if let Some(message) = message {
            args.extend(["--message", message]);
        }
        self.git(repo, args).await?;

        let after = self.stash_list(repo).await?.into_iter().next();
        let created = match (before, after) {
            (Some(old), Some(new)) if old.oid == new.oid => None,
            (_, new) => new,
        };
        debug!(repo = %repo.display(), created = created.is_some(), "stash saved");
        Ok(created)
    }

    /// Applies `entry` and keeps it on the stack.
    ///
    /// # Errors
    ///
    /// Returns a `StashError` if `entry` is stale, or the git error.
    pub async fn stash_apply(&self, repo: &Path, entry: &StashEntry) -> EngineResult<()> {
        self.stash_command(repo, "apply", entry).await
    }

    /// Applies `entry` and removes it. On conflicts git keeps the entry.
    ///
    /// # Errors
    ///
    /// Returns a `StashError` if `entry` is stale, or the git error.
    pub async fn stash_pop(&self, repo: &Path, entry: &StashEntry) -> EngineResult<()> {
        self.stash_command(repo, "pop", entry).await
    }

    /// Removes `entry` without applying it. Entries below it move up by one.
    ///
    /// # Errors
    ///
    /// Returns a `StashError` if `entry` is stale, or the git error.
    pub async fn stash_drop(&self, repo: &Path, entry: &StashEntry) -> EngineResult<()> {
        self.stash_command(repo, "drop", entry).await
    }

    async fn stash_command(&self, repo: &Path, action: &str, entry: &StashEntry) -> EngineResult<()> {
        self.verify_stash(repo, entry).await?;
        let reference = entry.reference();
        self.git(repo, ["stash", action, "--quiet", reference.as_str()])
            .await?;
        Ok(())
    }

    /// Checks that `entry.index` still holds `entry.oid`.
    async fn verify_stash(&self, repo: &Path, entry: &StashEntry) -> EngineResult<()> {
        let current = self.stash_at(repo, entry.index).await?;
        if current.oid != entry.oid {
            return Err(StashError::Stale {
                index: entry.index,
                expected: entry.oid.clone(),
                found: current.oid,
            }
            .into());
        }
        Ok(())
    }
}
