// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed projections of on-disk git state.
//!
//! Nothing here is authoritative. Every value is a read of the repository at
//! one point in time and goes stale as soon as git changes it; re-query to
//! refresh.

use serde::Serialize;
use std::fmt;

/// Hash used for the synthesized working-tree pseudo-commit.
pub const WORKING_TREE_HASH: &str = "HEAD";

/// A commit as read from `git log`. Identity is the full hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Decorations such as `HEAD -> main` or `origin/main`, tags excluded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Commit {
    /// Pseudo-commit standing for uncommitted working-tree changes.
    #[must_use]
    pub fn working_tree(author: impl Into<String>, changed_files: usize) -> Self {
        let noun = if changed_files == 1 { "file" } else { "files" };
        Self {
            hash: WORKING_TREE_HASH.to_string(),
            author: author.into(),
            date: String::new(),
            subject: format!("Uncommitted changes ({changed_files} {noun})"),
            body: None,
            refs: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_working_tree(&self) -> bool {
        self.hash == WORKING_TREE_HASH
    }

    /// Abbreviated hash for display.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// A local branch. `is_current` is recomputed on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_commit_message: Option<String>,
}

impl Branch {
    #[must_use]
    pub fn new(name: impl Into<String>, is_current: bool) -> Self {
        Self {
            name: name.into(),
            is_current,
            upstream: None,
            latest_commit_hash: None,
            latest_commit_message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Modified,
    Added,
    Deleted,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
        };
        f.pad(label)
    }
}

/// A changed file. Identity is `project_path` plus `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    /// Repository root the file belongs to.
    pub project_path: String,
    /// Path relative to the repository root, `/`-separated.
    pub name: String,
    pub change_type: ChangeType,
    /// Whether the index holds a change for this file.
    pub staged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Addition,
    Deletion,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// Unified diff text for one file plus per-line classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffBlock {
    /// File the block belongs to, when a `diff --git` header was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub raw: String,
    pub lines: Vec<DiffLine>,
}

impl DiffBlock {
    #[must_use]
    pub fn additions(&self) -> usize {
        self.count(LineKind::Addition)
    }

    #[must_use]
    pub fn deletions(&self) -> usize {
        self.count(LineKind::Deletion)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

/// What a diff compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTarget {
    /// Working tree against the index.
    WorkingTree,
    /// Index against `HEAD`.
    Staged,
    /// A commit against its first parent.
    Commit(String),
}

/// One stash stack entry.
///
/// `index` is positional and shifts when entries above it are popped or
/// dropped. `oid` identifies the stash commit and is what mutating stash
/// operations check before acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashEntry {
    pub index: usize,
    pub oid: String,
    pub message: String,
}

impl StashEntry {
    /// Reference name such as `stash@{0}`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

/// Merge state derived from the repository on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictState {
    pub is_merging: bool,
    pub conflicted_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    Repository,
    Global,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository => f.write_str("repository"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// A resolved configuration value with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigValue {
    pub value: String,
    pub scope: ConfigScope,
}

/// `user.name` and `user.email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "files", rename_all = "lowercase")]
pub enum MergeOutcome {
    Merged,
    /// The merge stopped with these unmerged paths.
    Conflicted(Vec<String>),
}

/// Which side of a conflict to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSide {
    Ours,
    Theirs,
}

impl ConflictSide {
    pub(crate) const fn checkout_flag(self) -> &'static str {
        match self {
            Self::Ours => "--ours",
            Self::Theirs => "--theirs",
        }
    }
}
