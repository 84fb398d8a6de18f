// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stash command arguments.
//!
//! # Subcommands
//!
//! ```text
//! stash list
//! stash save [-m MSG] [-u]
//! stash apply|pop|drop INDEX [--expect OID]
//!   → refused if stash@{INDEX} no longer holds OID
//! ```

use clap::{Args, Subcommand};

/// Arguments for the `stash` command.
#[derive(Debug, Clone, Args)]
pub struct StashArgs {
    /// Stash subcommand.
    #[command(subcommand)]
    pub subcommand: StashSubcommand,
}

/// Stash subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum StashSubcommand {
    /// Lists stash entries, newest first.
    List,

    /// Stashes local changes.
    Save(StashSaveArgs),

    /// Applies an entry and keeps it.
    Apply(StashEntryArgs),

    /// Applies an entry and removes it.
    Pop(StashEntryArgs),

    /// Removes an entry without applying it.
    Drop(StashEntryArgs),
}

/// Arguments for `stash save`.
#[derive(Debug, Clone, Default, Args)]
pub struct StashSaveArgs {
    /// Stash message.
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Includes untracked files.
    #[arg(short = 'u', long = "include-untracked")]
    pub include_untracked: bool,
}

/// Selects one stash entry.
#[derive(Debug, Clone, Args)]
pub struct StashEntryArgs {
    /// Position in the stash stack.
    #[arg(default_value_t = 0)]
    pub index: usize,

    /// Stash commit the entry must still point at, as printed by `stash list`.
    #[arg(long, value_name = "OID")]
    pub expect: Option<String>,
}
