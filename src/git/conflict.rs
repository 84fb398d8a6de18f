// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge conflict coordination.
//!
//! ```text
//! NotMerging --merge (conflicts)--> Merging
//! Merging --resolve/mark_resolved, continue_merge--> NotMerging (merge commit)
//! Merging --abort_merge--> NotMerging (merge undone)
//! ```
//!
//! Nothing is cached: merge state is read from the repository (gix) and
//! unmerged paths from porcelain status on every call.

use std::path::Path;
use tracing::{info, warn};

use super::client::{GitClient, operand};
use super::events::Operation;
use super::parse;
use super::repo;
use super::types::{ConflictSide, ConflictState, MergeOutcome};
use crate::core::process::CommandRunner;
use crate::error::{EngineResult, GitError, ProcessError};

impl<R: CommandRunner> GitClient<R> {
    /// Current merge state. Outside a repository this is "not merging".
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or its status cannot be read.
    pub async fn conflict_state(&self, repo: &Path) -> EngineResult<ConflictState> {
        if !repo::is_git_project(repo) {
            return Ok(ConflictState::default());
        }
        Ok(ConflictState {
            is_merging: repo::merge_in_progress(repo)?,
            conflicted_files: self.conflicted_files(repo).await?,
        })
    }

    /// Paths git reports as unmerged.
    ///
    /// # Errors
    ///
    /// Returns an error if `git status` fails.
    pub async fn conflicted_files(&self, repo: &Path) -> EngineResult<Vec<String>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let output = self
            .query(repo, ["status", "--porcelain", "-z", "--untracked-files=no"])
            .await?;
        Ok(parse::parse_conflicted_paths(&output))
    }

    /// Merges `branch` into the current branch.
    ///
    /// A merge that stops on conflicts is not an error: it returns
    /// [`MergeOutcome::Conflicted`] and leaves the repository merging. The
    /// tracked operation still reports `Failed`, since no merge commit exists.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails for any reason other than conflicts.
    pub async fn merge(&self, repo: &Path, branch: &str) -> EngineResult<MergeOutcome> {
        let scope = self.events().begin(Operation::Merge, repo);
        let result = match operand("branch", branch) {
            Ok(branch) => self.git(repo, ["merge", "--no-edit", branch]).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                scope.succeed();
                Ok(MergeOutcome::Merged)
            }
            Err(e) if matches!(e.as_process(), Some(ProcessError::NonZeroExit { .. })) => {
                let conflicts = match self.conflicted_files(repo).await {
                    Ok(files) => files,
                    Err(status_err) => {
                        scope.fail(status_err.to_string());
                        return Err(status_err);
                    }
                };
                if conflicts.is_empty() {
                    scope.fail(e.to_string());
                    return Err(e);
                }
                warn!(
                    repo = %repo.display(),
                    branch,
                    conflicts = conflicts.len(),
                    "merge stopped on conflicts"
                );
                scope.fail(format!(
                    "merge of {branch} stopped with {} conflicted file(s)",
                    conflicts.len()
                ));
                Ok(MergeOutcome::Conflicted(conflicts))
            }
            Err(e) => {
                scope.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Concludes a merge once every conflict is resolved.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NoMergeInProgress` when not merging,
    /// `GitError::UnresolvedConflicts` while unmerged paths remain, or the
    /// commit error.
    pub async fn continue_merge(&self, repo: &Path) -> EngineResult<()> {
        self.tracked(Operation::Merge, repo, async {
            Self::require_merge(repo)?;
            let remaining = self.conflicted_files(repo).await?;
            if !remaining.is_empty() {
                return Err(GitError::UnresolvedConflicts { files: remaining }.into());
            }
            self.git(repo, ["commit", "--no-edit", "--quiet"]).await?;
            info!(repo = %repo.display(), "merge concluded");
            Ok(())
        })
        .await
    }

    /// Abandons the merge and restores the pre-merge state.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NoMergeInProgress` when not merging, or the git error.
    pub async fn abort_merge(&self, repo: &Path) -> EngineResult<()> {
        self.tracked(Operation::Merge, repo, async {
            Self::require_merge(repo)?;
            self.git(repo, ["merge", "--abort"]).await?;
            info!(repo = %repo.display(), "merge aborted");
            Ok(())
        })
        .await
    }

    /// Keeps one side of a conflicted file and stages the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no such side or git fails.
    pub async fn resolve(&self, repo: &Path, file: &str, side: ConflictSide) -> EngineResult<()> {
        self.git(repo, ["checkout", side.checkout_flag(), "--", file])
            .await?;
        self.git(repo, ["add", "--", file]).await?;
        Ok(())
    }

    /// Stages manually edited files, marking their conflicts resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if `git add` fails.
    pub async fn mark_resolved(&self, repo: &Path, files: &[&str]) -> EngineResult<()> {
        self.stage(repo, files).await
    }

    fn require_merge(repo: &Path) -> EngineResult<()> {
        if repo::is_git_project(repo) && repo::merge_in_progress(repo)? {
            return Ok(());
        }
        Err(GitError::NoMergeInProgress {
            path: repo.display().to_string(),
        }
        .into())
    }
}
