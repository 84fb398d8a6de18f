// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository command arguments.
//!
//! ```text
//! init [DIR]
//! diff [--staged | --commit HASH] [PATH]
//! log [-n N] [--skip N | --pages N] [--working-tree]
//! checkout [-b] BRANCH
//! branch-delete [-f] NAME
//! commit -m MSG [-a]
//! push [-u] [REMOTE [BRANCH]]
//! pull [REMOTE [BRANCH]]
//! fetch [REMOTE]
//! config get KEY | config set [--global] KEY VALUE
//! ```

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the `init` command.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Directory to initialize; defaults to the `-C` repository.
    #[arg(value_name = "DIR")]
    pub path: Option<PathBuf>,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, Default, Args)]
pub struct DiffArgs {
    /// Diffs the index against HEAD instead of the working tree.
    #[arg(long, conflicts_with = "commit")]
    pub staged: bool,

    /// Shows the changes introduced by a commit.
    #[arg(long, value_name = "HASH")]
    pub commit: Option<String>,

    /// Limits the diff to one file.
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

/// Arguments for the `log` command.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Commits to skip from HEAD. Reads a single page.
    #[arg(long, default_value_t = 0, conflicts_with = "pages")]
    pub skip: usize,

    /// Commits per page; defaults to `history.page_size`.
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Pages to read before stopping (0 = until history ends).
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Lists uncommitted changes as a first pseudo-commit.
    #[arg(long = "working-tree")]
    pub working_tree: bool,
}

/// Arguments for the `checkout` command.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Branch to switch to.
    pub branch: String,

    /// Creates the branch first.
    #[arg(short = 'b', long = "create")]
    pub create: bool,
}

/// Arguments for the `branch-delete` command.
#[derive(Debug, Clone, Args)]
pub struct BranchDeleteArgs {
    /// Branch to delete.
    pub name: String,

    /// Deletes even if the branch is not merged.
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Arguments for the `commit` command.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long, required = true)]
    pub message: String,

    /// Stages every change before committing.
    #[arg(short = 'a', long)]
    pub all: bool,
}

/// Arguments for the `push` command.
#[derive(Debug, Clone, Default, Args)]
pub struct PushArgs {
    /// Remote name; defaults to the upstream.
    pub remote: Option<String>,

    /// Branch to push.
    #[arg(requires = "remote")]
    pub branch: Option<String>,

    /// Records the pushed branch as upstream.
    #[arg(short = 'u', long = "set-upstream")]
    pub set_upstream: bool,
}

/// Arguments for the `pull` command.
#[derive(Debug, Clone, Default, Args)]
pub struct PullArgs {
    /// Remote name; defaults to the upstream.
    pub remote: Option<String>,

    /// Branch to merge.
    #[arg(requires = "remote")]
    pub branch: Option<String>,
}

/// Arguments for the `fetch` command.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Remote name; defaults to the upstream.
    pub remote: Option<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub subcommand: ConfigSubcommand,
}

/// Config subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigSubcommand {
    /// Resolves a key from repository, then global configuration.
    Get {
        /// Key such as `user.email`.
        key: String,
    },

    /// Writes a key.
    Set {
        /// Key such as `user.email`.
        key: String,

        /// New value.
        value: String,

        /// Writes to the global configuration instead of the repository.
        #[arg(long)]
        global: bool,
    },
}
