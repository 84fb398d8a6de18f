// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Engine settings.
//!
//! # Settings Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitops.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITOPS_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITOPS_GIT__TIMEOUT_SECS=10      → git.timeout_secs = 10
//! GITOPS_LOG__CONSOLE_LEVEL=4      → log.console_level = 4
//! GITOPS_HISTORY__PAGE_SIZE=100    → history.page_size = 100
//! ```
//!
//! Sections and keys are separated by a double underscore because keys
//! themselves contain underscores.

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EngineResult;

use loader::SettingsLoader;
use types::{GitSettings, HistorySettings, LogSettings};

/// File name picked up from the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "gitops.toml";

/// Complete engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Git invocation.
    pub git: GitSettings,
    /// Logging.
    pub log: LogSettings,
    /// History paging.
    pub history: HistorySettings,
}

impl Settings {
    /// Create a new settings loader.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitops_engine::config::Settings;
    ///
    /// let settings = Settings::builder()
    ///     .add_toml_file_optional("gitops.toml")
    ///     .with_env_prefix("GITOPS")
    ///     .build()?;
    /// # Ok::<(), gitops_engine::error::EngineError>(())
    /// ```
    #[must_use]
    pub fn builder() -> SettingsLoader {
        SettingsLoader::new()
    }

    /// Load settings from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Settings` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Settings` structure.
    pub fn parse(content: &str) -> EngineResult<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.git.binary.trim().is_empty() {
            return Err(crate::error::ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "binary".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        self.history.validate()?;
        Ok(())
    }

    /// Format settings for display, one `key = value` per line, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let fmt_path = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        let mut options = BTreeMap::new();
        options.insert("git.binary", self.git.binary.clone());
        options.insert("git.timeout_secs", self.git.timeout_secs.to_string());
        options.insert(
            "git.network_timeout_secs",
            self.git.network_timeout_secs.to_string(),
        );
        options.insert("git.global_config", fmt_path(&self.git.global_config));
        options.insert(
            "log.console_level",
            self.log.console_level.as_u8().to_string(),
        );
        options.insert("log.file_level", self.log.file_level.as_u8().to_string());
        options.insert("log.file", fmt_path(&self.log.file));
        options.insert("history.page_size", self.history.page_size.to_string());
        options.insert(
            "history.prefetch_percent",
            self.history.prefetch_percent.to_string(),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
