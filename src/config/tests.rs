// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Settings, SettingsLoader};
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.git.binary, "git");
    assert_eq!(settings.git.local_timeout(), Some(Duration::from_secs(60)));
    assert_eq!(
        settings.git.network_timeout(),
        Some(Duration::from_secs(300))
    );
    assert_eq!(settings.log.console_level, LogLevel::INFO);
    assert_eq!(settings.history.page_size, 50);
    assert_eq!(settings.history.prefetch_percent, 80);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_parse_partial_sections_keep_defaults() {
    let settings = Settings::parse(
        r#"
[git]
timeout_secs = 0
global_config = "/etc/gitops/gitconfig"

[history]
page_size = 20
"#,
    )
    .unwrap();

    assert_eq!(settings.git.binary, "git");
    assert_eq!(settings.git.local_timeout(), None);
    assert_eq!(
        settings.git.global_config,
        Some(PathBuf::from("/etc/gitops/gitconfig"))
    );
    assert_eq!(settings.history.page_size, 20);
    assert_eq!(settings.history.prefetch_percent, 80);
}

#[test]
fn test_unknown_field_rejected() {
    let result = Settings::parse(
        r"
[git]
timeout = 10
",
    );
    assert!(result.is_err(), "unknown keys must be rejected");
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Settings::parse(
        r"
[log]
console_level = 9
",
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_history_values_rejected() {
    let zero_page = Settings::parse("[history]\npage_size = 0\n").unwrap_err();
    insta::assert_snapshot!(
        zero_page.to_string(),
        @"config error: invalid value for 'page_size' in section '[history]': must be greater than zero"
    );

    let percent = Settings::parse("[history]\nprefetch_percent = 150\n").unwrap_err();
    assert!(percent.to_string().contains("prefetch_percent"));
}

#[test]
fn test_set_override_wins_over_file() {
    let settings = SettingsLoader::new()
        .add_toml_str("[git]\nnetwork_timeout_secs = 30\n")
        .set("git.network_timeout_secs", 5)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(settings.git.network_timeout(), Some(Duration::from_secs(5)));
}

#[test]
fn test_missing_required_file_fails() {
    let result = Settings::from_file("/nonexistent/gitops.toml");
    assert!(result.is_err());
}

#[test]
fn test_optional_file_missing_is_ignored() {
    let loader = SettingsLoader::new().add_toml_file_optional("/nonexistent/gitops.toml");
    assert!(loader.format_loaded_files().is_empty());
    let settings = loader.build().unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_format_options_sorted_and_aligned() {
    let options = Settings::default().format_options();
    let keys: Vec<_> = options
        .iter()
        .map(|line| line.split('=').next().unwrap().trim().to_string())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(options.iter().any(|l| l.starts_with("git.binary") && l.ends_with("= git")));
    let eq_columns: Vec<_> = options.iter().map(|l| l.find('=').unwrap()).collect();
    assert!(eq_columns.windows(2).all(|w| w[0] == w[1]));
}
