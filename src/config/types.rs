// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings section types.
//!
//! ```text
//! Settings: GitSettings, LogSettings, HistorySettings
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// `[git]` section: how the git executable is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Executable name or path; bare names are resolved through PATH.
    pub binary: String,
    /// Timeout for local commands in seconds (0 = none).
    pub timeout_secs: u64,
    /// Timeout for push/pull/fetch in seconds (0 = none).
    pub network_timeout_secs: u64,
    /// Explicit global git config file for native lookups.
    /// When unset, libgit2's default global/XDG/system search applies.
    pub global_config: Option<PathBuf>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            timeout_secs: 60,
            network_timeout_secs: 300,
            global_config: None,
        }
    }
}

impl GitSettings {
    #[must_use]
    pub const fn local_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.timeout_secs)
    }

    #[must_use]
    pub const fn network_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.network_timeout_secs)
    }
}

const fn secs_to_timeout(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Log level for stderr output (0-6).
    pub console_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_level: LogLevel,
    /// Path to log file.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: None,
        }
    }
}

/// `[history]` section: paging of the commit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    /// Commits fetched per page.
    pub page_size: usize,
    /// Percentage of loaded rows after which the next page is requested.
    pub prefetch_percent: u8,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            prefetch_percent: 80,
        }
    }
}

impl HistorySettings {
    /// Validate page size and prefetch percentage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `page_size` is zero or
    /// `prefetch_percent` is outside `1..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                section: "history".to_string(),
                key: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !(1..=100).contains(&self.prefetch_percent) {
            return Err(ConfigError::InvalidValue {
                section: "history".to_string(),
                key: "prefetch_percent".to_string(),
                message: format!("must be in 1..=100, got {}", self.prefetch_percent),
            });
        }
        Ok(())
    }
}
