// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge command arguments.

use clap::{Args, ValueEnum};

use crate::git::ConflictSide;

/// Arguments for the `merge` command.
#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Branch to merge into the current branch.
    pub branch: String,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Conflicted files.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Keeps one side of each file. Without it the files are staged as edited.
    #[arg(long, value_enum)]
    pub take: Option<Side>,
}

/// Side of a conflict to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    /// The current branch.
    Ours,
    /// The branch being merged.
    Theirs,
}

impl From<Side> for ConflictSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Ours => Self::Ours,
            Side::Theirs => Self::Theirs,
        }
    }
}
