// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args + Context --> cmd::run_* handlers --> GitClient
//!   query    status, branches, diff, merge-state
//!   history  log
//!   ops      init, checkout, branch-delete, commit, push, pull, fetch,
//!            merge, merge-continue, merge-abort, resolve
//!   stash    list/save/apply/pop/drop
//!   config   get/set, whoami, options
//!
//! output   text or JSON on stdout, EventPrinter on stderr
//! ```

pub mod config;
pub mod history;
pub mod ops;
pub mod output;
pub mod query;
pub mod stash;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use crate::config::Settings;
use crate::config::types::HistorySettings;
use crate::git::GitClient;

/// Everything a handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: GitClient,
    pub repo: PathBuf,
    pub json: bool,
    pub history: HistorySettings,
}

impl Context {
    #[must_use]
    pub fn new(client: GitClient, repo: PathBuf, json: bool, settings: &Settings) -> Self {
        Self {
            client,
            repo,
            json,
            history: settings.history.clone(),
        }
    }
}
