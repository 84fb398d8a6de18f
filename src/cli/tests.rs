// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use crate::cli::merge::Side;
use crate::cli::repo::ConfigSubcommand;
use crate::cli::stash::StashSubcommand;
use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "gitops",
        "-C",
        "/work/repo",
        "-c",
        "a.toml",
        "-c",
        "b.toml",
        "-l",
        "4",
        "--json",
        "status",
    ])
    .unwrap();

    assert_eq!(cli.global.repo, PathBuf::from("/work/repo"));
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert_eq!(cli.global.log_level, Some(4));
    assert!(cli.global.json);
    assert!(matches!(cli.command, Some(Command::Status)));
}

#[test]
fn test_repo_defaults_to_current_dir() {
    let cli = Cli::try_parse_from(["gitops", "branches"]).unwrap();
    assert_eq!(cli.global.repo, PathBuf::from("."));
    assert!(!cli.global.json);
}

#[test]
fn test_log_level_out_of_range_rejected() {
    assert!(Cli::try_parse_from(["gitops", "-l", "9", "status"]).is_err());
}

#[test]
fn test_overrides_from_flags() {
    let cli = Cli::try_parse_from([
        "gitops",
        "-s",
        "history.page_size=10",
        "-l",
        "2",
        "--log-file",
        "out.log",
        "--timeout",
        "5",
        "status",
    ])
    .unwrap();

    let overrides = cli.global.to_overrides();
    let keys: Vec<_> = overrides.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        [
            "history.page_size",
            "log.console_level",
            "log.file_level",
            "log.file",
            "git.timeout_secs"
        ]
    );
    assert_eq!(overrides[2].1, "2", "file level falls back to console level");
    assert_eq!(overrides[4].1, "5");
}

#[test]
fn test_set_requires_key_value() {
    assert!(Cli::try_parse_from(["gitops", "-s", "history.page_size", "status"]).is_err());
    assert!(Cli::try_parse_from(["gitops", "-s", "=3", "status"]).is_err());
}

#[test]
fn test_settings_loader_applies_overrides() {
    let cli = Cli::try_parse_from([
        "gitops",
        "-s",
        "history.page_size=7",
        "--timeout",
        "0",
        "status",
    ])
    .unwrap();

    let settings = cli.global.settings_loader().unwrap().build().unwrap();
    assert_eq!(settings.history.page_size, 7);
    assert_eq!(settings.git.local_timeout(), None);
}

#[test]
fn test_parse_commit_message_kept_verbatim() {
    let cli = Cli::try_parse_from(["gitops", "commit", "-a", "-m", "fix: a | b + \"c\""]).unwrap();
    let Some(Command::Commit(args)) = cli.command else {
        panic!("expected commit");
    };
    assert!(args.all);
    assert_eq!(args.message, "fix: a | b + \"c\"");
}

#[test]
fn test_commit_requires_message() {
    assert!(Cli::try_parse_from(["gitops", "commit"]).is_err());
}

#[test]
fn test_parse_push() {
    let cli = Cli::try_parse_from(["gitops", "push", "-u", "origin", "main"]).unwrap();
    let Some(Command::Push(args)) = cli.command else {
        panic!("expected push");
    };
    assert!(args.set_upstream);
    assert_eq!(args.remote.as_deref(), Some("origin"));
    assert_eq!(args.branch.as_deref(), Some("main"));
}

#[test]
fn test_parse_log_pages() {
    let cli = Cli::try_parse_from(["gitops", "log", "-n", "10", "--pages", "0"]).unwrap();
    let Some(Command::Log(args)) = cli.command else {
        panic!("expected log");
    };
    assert_eq!((args.skip, args.limit, args.pages), (0, Some(10), 0));
}

#[test]
fn test_log_skip_reads_one_window() {
    let cli = Cli::try_parse_from(["gitops", "log", "--skip", "20"]).unwrap();
    let Some(Command::Log(args)) = cli.command else {
        panic!("expected log");
    };
    assert_eq!((args.skip, args.pages), (20, 1));
    assert!(Cli::try_parse_from(["gitops", "log", "--skip", "20", "--pages", "2"]).is_err());
}

#[test]
fn test_diff_staged_conflicts_with_commit() {
    assert!(Cli::try_parse_from(["gitops", "diff", "--staged", "--commit", "abc"]).is_err());
}

#[test]
fn test_parse_resolve() {
    let cli = Cli::try_parse_from(["gitops", "resolve", "a.txt", "b.txt", "--take", "theirs"])
        .unwrap();
    let Some(Command::Resolve(args)) = cli.command else {
        panic!("expected resolve");
    };
    assert_eq!(args.files, ["a.txt", "b.txt"]);
    assert_eq!(args.take, Some(Side::Theirs));
}

#[test]
fn test_parse_stash_drop_with_expectation() {
    let cli = Cli::try_parse_from(["gitops", "stash", "drop", "2", "--expect", "abc123"]).unwrap();
    let Some(Command::Stash(args)) = cli.command else {
        panic!("expected stash");
    };
    let StashSubcommand::Drop(entry) = args.subcommand else {
        panic!("expected drop");
    };
    assert_eq!(entry.index, 2);
    assert_eq!(entry.expect.as_deref(), Some("abc123"));
}

#[test]
fn test_parse_config_set_global() {
    let cli = Cli::try_parse_from([
        "gitops", "config", "set", "--global", "user.name", "Jane Doe",
    ])
    .unwrap();
    let Some(Command::Config(args)) = cli.command else {
        panic!("expected config");
    };
    assert!(matches!(
        args.subcommand,
        ConfigSubcommand::Set { ref key, ref value, global: true } if key == "user.name" && value == "Jane Doe"
    ));
}

#[test]
fn test_publishes_events() {
    let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command.unwrap();
    assert!(parse(&["gitops", "fetch"]).publishes_events());
    assert!(parse(&["gitops", "merge-abort"]).publishes_events());
    assert!(!parse(&["gitops", "status"]).publishes_events());
    assert!(!parse(&["gitops", "stash", "list"]).publishes_events());
}
