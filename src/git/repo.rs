// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository queries using gix.
//!
//! ```text
//! repo.rs --> gix::open --> .git/ (no subprocess)
//!   is_git_project   .git entry exists
//!   current_branch   HEAD symbolic name
//!   has_commits      HEAD born
//!   merge_in_progress  state() == Merge
//! ```

use std::path::Path;

use crate::error::{EngineResult, GitError, GixError};

/// Precondition for every repository query: a `.git` entry exists.
///
/// Worktrees and submodules keep a `.git` file rather than a directory;
/// both count.
#[must_use]
pub fn is_git_project(path: &Path) -> bool {
    path.join(".git").exists()
}

fn open(path: &Path) -> EngineResult<gix::Repository> {
    if !is_git_project(path) {
        return Err(GitError::NotARepository {
            path: path.display().to_string(),
        }
        .into());
    }
    gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))).into())
}

/// Current branch name, `None` when HEAD is detached.
///
/// # Errors
///
/// Returns a `GitError` if the path is not a repository or HEAD cannot be read.
pub fn current_branch(path: &Path) -> EngineResult<Option<String>> {
    let repo = open(path)?;
    let head = repo
        .head_name()
        .map_err(|e| GitError::Gix(GixError::Head(e)))?;
    Ok(head.map(|name| name.shorten().to_string()))
}

/// Whether HEAD points at a commit. A freshly initialized repository has none.
///
/// # Errors
///
/// Returns a `GitError` if the path is not a repository or HEAD cannot be read.
pub fn has_commits(path: &Path) -> EngineResult<bool> {
    let repo = open(path)?;
    let head = repo
        .head()
        .map_err(|e| GitError::Gix(GixError::Head(e)))?;
    Ok(!head.is_unborn())
}

/// Whether a merge is waiting to be concluded or aborted.
///
/// # Errors
///
/// Returns a `GitError` if the path is not a repository.
pub fn merge_in_progress(path: &Path) -> EngineResult<bool> {
    let repo = open(path)?;
    Ok(matches!(repo.state(), Some(gix::state::InProgress::Merge)))
}
