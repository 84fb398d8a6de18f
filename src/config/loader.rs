// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! SettingsLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix()
//!   .set()
//!        |
//!        v
//!    build() --> Settings (validated)
//! ```

use std::path::{Path, PathBuf};

use super::Settings;
use crate::error::{ConfigError, EngineResult};

/// Builder for loading settings from multiple sources.
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(&'static str, PathBuf)>,
}

impl SettingsLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a required TOML file. A missing or malformed file fails `build()`.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file", p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional", p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files.push(("string", PathBuf::from("<string>")));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets an override such as `git.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be parsed as a settings path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> EngineResult<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;
        Ok(self)
    }

    /// Builds the settings from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required files are missing or contain invalid TOML.
    /// - The merged settings do not match the `Settings` structure.
    /// - A value fails validation.
    pub fn build(self) -> EngineResult<Settings> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let parse_error = |e: config::ConfigError| ConfigError::ParseError {
            message: e.to_string(),
        };
        let settings: Settings = builder
            .build()
            .map_err(parse_error)?
            .try_deserialize()
            .map_err(parse_error)?;
        settings.validate()?;
        Ok(settings)
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
