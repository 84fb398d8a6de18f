// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitops using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitops [global options] <command>
//! init [DIR]
//! status | branches | diff | log
//! checkout | branch-delete
//! commit | push | pull | fetch
//! merge | merge-state | merge-continue | merge-abort | resolve
//! stash {list|save|apply|pop|drop}
//! config {get|set} | whoami | options
//! ```

pub mod global;
pub mod merge;
pub mod repo;
pub mod stash;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::merge::{MergeArgs, ResolveArgs};
use crate::cli::repo::{
    BranchDeleteArgs, CheckoutArgs, CommitArgs, ConfigArgs, DiffArgs, FetchArgs, InitArgs,
    LogArgs, PullArgs, PushArgs,
};
use crate::cli::stash::StashArgs;
use clap::{Parser, Subcommand};

/// Git Operations Engine
///
/// Drives git through its command line with typed results and operation events.
#[derive(Debug, Parser)]
#[command(
    name = "gitops",
    author,
    version,
    about = "Git Operations Engine",
    long_about = "gitops-engine Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs git operations against one repository and reports typed\n\
                  results. Mutating commands print operation events to stderr\n\
                  as they happen. See `gitops <command> --help` for more\n\
                  information about a command.",
    after_help = "SETTINGS:\n\n\
                  gitops reads `gitops.toml` from the current directory when it\n\
                  exists, then every file given with --config, then GITOPS_*\n\
                  environment variables (e.g. GITOPS_GIT__TIMEOUT_SECS=10), then\n\
                  --set overrides. Use `gitops options` to print the result."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all settings and the files they were loaded from.
    Options,

    /// Creates a repository.
    Init(InitArgs),

    /// Lists working-tree and index changes.
    Status,

    /// Lists local branches.
    Branches,

    /// Shows a diff of the working tree, the index or a commit.
    Diff(DiffArgs),

    /// Shows commit history page by page.
    Log(LogArgs),

    /// Switches branches.
    Checkout(CheckoutArgs),

    /// Deletes a local branch.
    #[command(name = "branch-delete")]
    BranchDelete(BranchDeleteArgs),

    /// Records staged changes.
    Commit(CommitArgs),

    /// Pushes to a remote.
    Push(PushArgs),

    /// Fetches from a remote and merges.
    Pull(PullArgs),

    /// Fetches from a remote.
    Fetch(FetchArgs),

    /// Merges a branch into the current branch.
    Merge(MergeArgs),

    /// Shows whether a merge is in progress and which files conflict.
    #[command(name = "merge-state")]
    MergeState,

    /// Concludes a merge once all conflicts are resolved.
    #[command(name = "merge-continue")]
    MergeContinue,

    /// Abandons the merge in progress.
    #[command(name = "merge-abort")]
    MergeAbort,

    /// Resolves conflicted files.
    Resolve(ResolveArgs),

    /// Manages the stash stack.
    Stash(StashArgs),

    /// Reads or writes git configuration.
    Config(ConfigArgs),

    /// Shows the configured user identity.
    Whoami,
}

impl Command {
    /// Whether the command may publish operation events.
    #[must_use]
    pub const fn publishes_events(&self) -> bool {
        matches!(
            self,
            Self::Checkout(_)
                | Self::Commit(_)
                | Self::Push(_)
                | Self::Pull(_)
                | Self::Fetch(_)
                | Self::Merge(_)
                | Self::MergeContinue
                | Self::MergeAbort
        )
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
