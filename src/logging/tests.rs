// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};
use crate::config::types::LogSettings;
use std::path::PathBuf;

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'level' in section '[log]': log level must be 0-6, got 7"
    );
}

#[test]
fn test_filter_strings_scope_engine_crates() {
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert_eq!(LogLevel::WARN.to_filter_string(), "warn");
    assert!(LogLevel::DEBUG.to_filter_string().contains("gitops_engine=debug"));
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
}

#[test]
fn test_log_level_serde_as_integer() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&LogLevel::TRACE).unwrap(), "5");
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
}

#[test]
fn test_log_config_from_settings() {
    let settings = LogSettings {
        console_level: LogLevel::WARN,
        file_level: LogLevel::DEBUG,
        file: Some(PathBuf::from("logs/gitops.log")),
    };
    let config = LogConfig::from_settings(&settings);
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some("logs/gitops.log"));
    assert!(!config.show_target());
}
