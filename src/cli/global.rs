// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! -C DIR            ← repository to operate on
//! -c FILE           ← additional settings files (can repeat)
//! -l N              ← console verbosity (0-6)
//! --file-log-level  ← file verbosity (falls back to -l)
//! --log-file FILE   ← log.file override
//! --timeout SECS    ← git.timeout_secs override
//! -s KEY=VAL        ← direct settings override
//!
//! Precedence: CLI flags > -s > GITOPS_* > -c > gitops.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::SettingsLoader;
use crate::config::{DEFAULT_SETTINGS_FILE, Settings};
use crate::error::EngineResult;

/// Prefix of settings environment variables.
pub const ENV_PREFIX: &str = "GITOPS";

/// Global options available for all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Repository to operate on.
    #[arg(short = 'C', long = "repo", value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Path to additional TOML settings file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Timeout for local git commands in seconds (0 = none).
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Sets a setting, such as 'history.page_size=100'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, action = clap::ArgAction::Append)]
    pub options: Vec<(String, String)>,

    /// Prints results and events as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            configs: Vec::new(),
            log_level: None,
            file_log_level: None,
            log_file: None,
            timeout_secs: None,
            options: Vec::new(),
            json: false,
        }
    }
}

impl GlobalOptions {
    /// Converts command-line options to settings overrides, lowest priority first.
    #[must_use]
    pub fn to_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(("log.console_level".to_string(), level.to_string()));
        }

        // file level falls back to the console level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("log.file_level".to_string(), level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("log.file".to_string(), path.display().to_string()));
        }

        if let Some(secs) = self.timeout_secs {
            overrides.push(("git.timeout_secs".to_string(), secs.to_string()));
        }

        overrides
    }

    /// Loader over `gitops.toml`, every `-c` file, `GITOPS_*` variables and
    /// the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override key is not a valid settings path.
    pub fn settings_loader(&self) -> EngineResult<SettingsLoader> {
        let mut loader = Settings::builder().add_toml_file_optional(DEFAULT_SETTINGS_FILE);
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }
        loader = loader.with_env_prefix(ENV_PREFIX);
        for (key, value) in self.to_overrides() {
            loader = loader.set(&key, value)?;
        }
        Ok(loader)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
