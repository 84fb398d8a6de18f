// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration reads through libgit2.
//!
//! ```text
//! lookup(key, repo)
//!   Repository::open --> config() --> open_level(Local) --> snapshot() --> get_string
//!        | any step fails or key missing
//!        v
//!   Config::open(global_config) | Config::open_default() --> snapshot() --> get_string
//!        | missing
//!        v
//!   GitError::ConfigKeyNotFound
//! ```
//!
//! Every handle is an owned git2 value released on drop, so all exit paths
//! free them, innermost (snapshot) first. Lookups never spawn `git`.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::types::{ConfigScope, ConfigValue, Identity};
use crate::error::{EngineError, EngineResult, GitError};

/// Reads git configuration with repository-then-global fallback.
#[derive(Debug, Clone, Default)]
pub struct NativeConfig {
    /// Replaces the user's global configuration when set.
    global_config: Option<PathBuf>,
}

impl NativeConfig {
    #[must_use]
    pub const fn new(global_config: Option<PathBuf>) -> Self {
        Self { global_config }
    }

    /// Resolves `key`, preferring the repository's own configuration.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ConfigKeyNotFound` if neither the repository nor the
    /// global configuration defines `key`.
    pub fn lookup(&self, key: &str, repo_path: &Path) -> EngineResult<ConfigValue> {
        if let Some(value) = lookup_repository(key, repo_path) {
            trace!(key, scope = "repository", "config resolved");
            return Ok(ConfigValue {
                value,
                scope: ConfigScope::Repository,
            });
        }
        if let Some(value) = self.lookup_global(key) {
            trace!(key, scope = "global", "config resolved");
            return Ok(ConfigValue {
                value,
                scope: ConfigScope::Global,
            });
        }
        Err(GitError::ConfigKeyNotFound {
            key: key.to_string(),
        }
        .into())
    }

    /// Async form of [`NativeConfig::lookup`]; libgit2 runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// Same as [`NativeConfig::lookup`].
    pub async fn get(&self, key: &str, repo_path: &Path) -> EngineResult<ConfigValue> {
        let native = self.clone();
        let key = key.to_string();
        let repo_path = repo_path.to_path_buf();
        tokio::task::spawn_blocking(move || native.lookup(&key, &repo_path))
            .await
            .map_err(|e| EngineError::other(format!("config lookup task failed: {e}")))?
    }

    /// Reads `user.name` and `user.email`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ConfigKeyNotFound` for the first key that is unset.
    pub async fn identity(&self, repo_path: &Path) -> EngineResult<Identity> {
        let name = self.get("user.name", repo_path).await?;
        let email = self.get("user.email", repo_path).await?;
        Ok(Identity {
            name: name.value,
            email: email.value,
        })
    }

    fn lookup_global(&self, key: &str) -> Option<String> {
        let opened = match &self.global_config {
            Some(path) => git2::Config::open(path),
            None => git2::Config::open_default(),
        };
        let mut config = match opened {
            Ok(config) => config,
            Err(e) => {
                debug!(error = %e, "global config unavailable");
                return None;
            }
        };
        let snapshot = config.snapshot().ok()?;
        snapshot.get_string(key).ok()
    }
}

/// Looks `key` up in the repository's local configuration only, so global
/// values are never misreported as repository values.
fn lookup_repository(key: &str, repo_path: &Path) -> Option<String> {
    let repo = match git2::Repository::open(repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!(path = %repo_path.display(), error = %e, "repository config unavailable");
            return None;
        }
    };
    let config = repo.config().ok()?;
    let mut local = config.open_level(git2::ConfigLevel::Local).ok()?;
    let snapshot = local.snapshot().ok()?;
    snapshot.get_string(key).ok()
}
