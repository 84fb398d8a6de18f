// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the `gitops` binary.
//!
//! Runs the built executable against temporary repositories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn run_git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo(dir: &Path) -> std::path::PathBuf {
    let repo = dir.join("repo");
    fs::create_dir_all(&repo).unwrap();
    run_git(&repo, &["init", "--quiet"]);
    run_git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(&repo, &["config", "user.name", "Test User"]);
    run_git(&repo, &["config", "user.email", "test@example.com"]);
    run_git(&repo, &["config", "commit.gpgsign", "false"]);
    repo
}

/// Runs `gitops` from `cwd` with logging silenced.
fn gitops(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitops"))
        .args(["-l", "0"])
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run gitops")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn cli_version_command() {
    let dir = temp_dir();
    let output = gitops(dir.path(), &["version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn cli_no_command_fails() {
    let dir = temp_dir();
    let output = gitops(dir.path(), &[]);
    assert!(!output.status.success());
}

#[test]
fn cli_options_reflect_overrides() {
    let dir = temp_dir();
    fs::write(dir.path().join("gitops.toml"), "[history]\npage_size = 25\n").unwrap();

    let output = gitops(dir.path(), &["-s", "git.timeout_secs=9", "options"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.lines().any(|l| l.starts_with("history.page_size") && l.ends_with("= 25")));
    assert!(text.lines().any(|l| l.starts_with("git.timeout_secs") && l.ends_with("= 9")));
    assert!(text.contains("[optional] gitops.toml"));
}

#[test]
fn cli_invalid_settings_fail_early() {
    let dir = temp_dir();
    let output = gitops(dir.path(), &["-s", "history.page_size=0", "status"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("page_size"));
}

// =============================================================================
// Repository commands
// =============================================================================

#[test]
fn cli_status_outside_repository_is_empty() {
    let dir = temp_dir();
    let output = gitops(dir.path(), &["--json", "status"]);
    assert!(output.status.success());
    assert_eq!(json(&output), serde_json::json!([]));
}

#[test]
fn cli_commit_prints_events_and_log_shows_it() {
    let dir = temp_dir();
    let repo = init_repo(dir.path());
    fs::write(repo.join("a.txt"), "a").unwrap();
    let repo_arg = repo.to_str().unwrap();

    let status = gitops(dir.path(), &["-C", repo_arg, "--json", "status"]);
    let files = json(&status);
    assert_eq!(files[0]["name"], "a.txt");
    assert_eq!(files[0]["change_type"], "modified");

    let commit = gitops(dir.path(), &["-C", repo_arg, "commit", "-a", "-m", "first | commit"]);
    assert!(commit.status.success(), "{}", stderr(&commit));
    let events = stderr(&commit);
    assert!(events.contains("gitCommitStart ("));
    assert!(events.contains("gitCommitSuccess ("));

    let log = gitops(dir.path(), &["-C", repo_arg, "--json", "log"]);
    let commits = json(&log);
    assert_eq!(commits.as_array().map(Vec::len), Some(1));
    assert_eq!(commits[0]["subject"], "first | commit");
    assert_eq!(commits[0]["author"], "Test User");
}

#[test]
fn cli_json_events_are_ndjson_on_stderr() {
    let dir = temp_dir();
    let repo = init_repo(dir.path());
    fs::write(repo.join("a.txt"), "a").unwrap();

    let output = gitops(
        dir.path(),
        &["-C", repo.to_str().unwrap(), "--json", "commit", "-a", "-m", "m"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let events: Vec<serde_json::Value> = stderr(&output)
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "started");
    assert_eq!(events[0]["op"], "commit");
    assert_eq!(events[1]["event"], "succeeded");
    assert_eq!(json(&output)["action"], "commit");
}

#[test]
fn cli_stash_drop_refuses_unexpected_oid() {
    let dir = temp_dir();
    let repo = init_repo(dir.path());
    fs::write(repo.join("a.txt"), "a").unwrap();
    run_git(&repo, &["add", "a.txt"]);
    run_git(&repo, &["commit", "--quiet", "-m", "initial"]);
    fs::write(repo.join("a.txt"), "b").unwrap();
    let repo_arg = repo.to_str().unwrap();

    let save = gitops(dir.path(), &["-C", repo_arg, "stash", "save", "-m", "wip"]);
    assert!(save.status.success(), "{}", stderr(&save));

    let drop = gitops(
        dir.path(),
        &["-C", repo_arg, "stash", "drop", "0", "--expect", "0000000"],
    );
    assert!(!drop.status.success());
    assert!(stderr(&drop).contains("stale"));

    let list = gitops(dir.path(), &["-C", repo_arg, "--json", "stash", "list"]);
    assert_eq!(json(&list).as_array().map(Vec::len), Some(1));
}

#[test]
fn cli_merge_conflict_fails_and_lists_files() {
    let dir = temp_dir();
    let repo = init_repo(dir.path());
    let commit = |content: &str, message: &str| {
        fs::write(repo.join("a.txt"), content).unwrap();
        run_git(&repo, &["add", "a.txt"]);
        run_git(&repo, &["commit", "--quiet", "-m", message]);
    };
    commit("base\n", "base");
    run_git(&repo, &["checkout", "--quiet", "-b", "feature"]);
    commit("theirs\n", "theirs");
    run_git(&repo, &["checkout", "--quiet", "main"]);
    commit("ours\n", "ours");
    let repo_arg = repo.to_str().unwrap();

    let merge = gitops(dir.path(), &["-C", repo_arg, "merge", "feature"]);
    assert!(!merge.status.success());
    assert!(stdout(&merge).contains("  a.txt"));
    assert!(stderr(&merge).contains("gitMergeFailed"));

    let state = gitops(dir.path(), &["-C", repo_arg, "--json", "merge-state"]);
    assert_eq!(json(&state)["is_merging"], true);

    let abort = gitops(dir.path(), &["-C", repo_arg, "merge-abort"]);
    assert!(abort.status.success(), "{}", stderr(&abort));
    assert_eq!(fs::read_to_string(repo.join("a.txt")).unwrap(), "ours\n");
}
