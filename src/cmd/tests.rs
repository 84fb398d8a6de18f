// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::output::{
    EventPrinter, format_branch, format_changed_file, format_commit, format_conflict_state,
    format_stash,
};
use crate::git::{
    Branch, ChangeType, ChangedFile, Commit, ConflictState, EventBus, Operation, StashEntry,
};

#[test]
fn test_format_changed_file() {
    let file = ChangedFile {
        project_path: "/repo".to_string(),
        name: "src/lib.rs".to_string(),
        change_type: ChangeType::Added,
        staged: true,
    };
    insta::assert_snapshot!(format_changed_file(&file), @"+added    src/lib.rs");
}

#[test]
fn test_format_branch_with_upstream() {
    let branch = Branch {
        upstream: Some("origin/main".to_string()),
        latest_commit_hash: Some("0123456789abcdef".to_string()),
        latest_commit_message: Some("Fix parser".to_string()),
        ..Branch::new("main", true)
    };
    insta::assert_snapshot!(format_branch(&branch), @"* main -> origin/main  0123456 Fix parser");
    insta::assert_snapshot!(format_branch(&Branch::new("topic", false)), @"  topic");
}

#[test]
fn test_format_commit_with_decorations() {
    let commit = Commit {
        hash: "abcdef0123456789".to_string(),
        author: "Jane Doe".to_string(),
        date: "2024-01-02 03:04:05".to_string(),
        subject: "Release".to_string(),
        body: None,
        refs: vec!["HEAD -> main".to_string()],
        tags: vec!["v1.0".to_string()],
    };
    insta::assert_snapshot!(
        format_commit(&commit),
        @"abcdef0 2024-01-02 03:04:05 Jane Doe: Release (HEAD -> main, v1.0)"
    );
}

#[test]
fn test_format_working_tree_commit() {
    let commit = Commit::working_tree("Jane", 2);
    insta::assert_snapshot!(format_commit(&commit), @"HEAD Jane: Uncommitted changes (2 files)");
}

#[test]
fn test_format_stash() {
    let entry = StashEntry {
        index: 1,
        oid: "abc123".to_string(),
        message: "On main: wip".to_string(),
    };
    insta::assert_snapshot!(format_stash(&entry), @"stash@{1} abc123 On main: wip");
}

#[test]
fn test_format_conflict_state() {
    assert_eq!(
        format_conflict_state(&ConflictState::default()),
        ["no merge in progress"]
    );
    let state = ConflictState {
        is_merging: true,
        conflicted_files: vec!["a.txt".to_string()],
    };
    assert_eq!(
        format_conflict_state(&state),
        ["merge in progress, 1 conflicted file(s)", "  a.txt"]
    );
}

#[tokio::test]
async fn test_event_printer_consumes_queued_events() {
    let bus = EventBus::new();
    let printer = EventPrinter::spawn(&bus, true);
    assert_eq!(bus.subscriber_count(), 1);

    bus.begin(Operation::Fetch, Path::new("/repo")).succeed();
    printer.finish().await;

    assert_eq!(bus.subscriber_count(), 0, "subscription released on finish");
}
