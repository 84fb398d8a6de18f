// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;

fn record(fields: &[&str]) -> String {
    let mut out = fields.join("\x1f");
    out.push('\x1e');
    out.push('\n');
    out
}

#[test]
fn test_branch_line_current_marker() {
    let branch = parse_branch_line("* main").unwrap();
    assert_eq!(branch.name, "main");
    assert!(branch.is_current);

    let branch = parse_branch_line("  feature/x").unwrap();
    assert_eq!(branch.name, "feature/x");
    assert!(!branch.is_current);
}

#[test]
fn test_branch_line_rejects_blank_and_detached() {
    assert!(parse_branch_line("").is_none());
    assert!(parse_branch_line("   ").is_none());
    assert!(parse_branch_line("* (HEAD detached at 1a2b3c4)").is_none());
}

#[test]
fn test_parse_formatted_branches() {
    let output = "*\x1fmain\x1forigin/main\x1fabc123\x1fInitial commit\n \x1ffeature/x\x1f\x1fdef456\x1fWIP: a + b\n";
    let branches = parse_branches(output);

    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0].name, "main");
    assert!(branches[0].is_current);
    assert_eq!(branches[0].upstream.as_deref(), Some("origin/main"));
    assert_eq!(branches[0].latest_commit_hash.as_deref(), Some("abc123"));
    assert_eq!(
        branches[0].latest_commit_message.as_deref(),
        Some("Initial commit")
    );

    assert_eq!(branches[1].name, "feature/x");
    assert!(!branches[1].is_current);
    assert_eq!(branches[1].upstream, None);
    assert_eq!(
        branches[1].latest_commit_message.as_deref(),
        Some("WIP: a + b")
    );
}

#[test]
fn test_parse_plain_branch_listing() {
    let branches = parse_branches("  develop\n* main\n  feature/login\n");
    let names: Vec<_> = branches
        .iter()
        .map(|b| (b.name.as_str(), b.is_current))
        .collect();
    assert_eq!(
        names,
        [("develop", false), ("main", true), ("feature/login", false)]
    );
}

#[test]
fn test_parse_commits_with_plus_and_pipe_in_subject() {
    let mut output = record(&[
        "a1b2c3d4e5f6a7b8c9d0a1b2c3d4e5f6a7b8c9d0",
        "Jane Doe",
        "2024-03-01 10:20:30",
        "Add a+b | c support",
        "HEAD -> main, tag: v1.0, origin/main",
        "Longer body\n\nwith paragraphs\n",
    ]);
    output.push_str(&record(&[
        "0000000000000000000000000000000000000001",
        "John",
        "2024-02-29 08:00:00",
        "Initial",
        "",
        "",
    ]));

    let commits = parse_commits(&output);
    assert_eq!(commits.len(), 2);

    let first = &commits[0];
    assert_eq!(first.hash, "a1b2c3d4e5f6a7b8c9d0a1b2c3d4e5f6a7b8c9d0");
    assert_eq!(first.short_hash(), "a1b2c3d");
    assert_eq!(first.author, "Jane Doe");
    assert_eq!(first.date, "2024-03-01 10:20:30");
    assert_eq!(first.subject, "Add a+b | c support");
    assert_eq!(first.refs, ["HEAD -> main", "origin/main"]);
    assert_eq!(first.tags, ["v1.0"]);
    assert_eq!(first.body.as_deref(), Some("Longer body\n\nwith paragraphs"));

    let second = &commits[1];
    assert_eq!(second.subject, "Initial");
    assert!(second.refs.is_empty());
    assert!(second.tags.is_empty());
    assert_eq!(second.body, None);
}

#[test]
fn test_parse_commit_four_fields_only() {
    let commit = parse_commit("abc\x1fAuthor\x1f2024-01-01 00:00:00\x1fSubject").unwrap();
    assert_eq!(commit.subject, "Subject");
    assert!(commit.refs.is_empty());
    assert_eq!(commit.body, None);
}

#[test]
fn test_parse_commit_skips_short_records() {
    assert!(parse_commit("abc\x1fAuthor\x1fdate").is_none());
    assert!(parse_commit("\n").is_none());
}

#[test]
fn test_status_code_mapping() {
    assert_eq!(change_type_from_code("A "), ChangeType::Added);
    assert_eq!(change_type_from_code(" M"), ChangeType::Modified);
    assert_eq!(change_type_from_code("M "), ChangeType::Modified);
    assert_eq!(change_type_from_code("??"), ChangeType::Modified);
    assert_eq!(change_type_from_code(" D"), ChangeType::Modified);
    assert_eq!(change_type_from_code("AM"), ChangeType::Added);
}

#[test]
fn test_parse_status_porcelain_z() {
    let output = "A  added.txt\0 M src/lib.rs\0?? notes with spaces.md\0R  renamed.txt\0original.txt\0 D gone.txt\0";
    let files = parse_status(output, "/work/repo");

    let summary: Vec<_> = files
        .iter()
        .map(|f| (f.name.as_str(), f.change_type, f.staged))
        .collect();
    assert_eq!(
        summary,
        [
            ("added.txt", ChangeType::Added, true),
            ("src/lib.rs", ChangeType::Modified, false),
            ("notes with spaces.md", ChangeType::Modified, false),
            ("renamed.txt", ChangeType::Modified, true),
            ("gone.txt", ChangeType::Modified, false),
        ]
    );
    assert!(files.iter().all(|f| f.project_path == "/work/repo"));
}

#[test]
fn test_parse_conflicted_paths() {
    let output = "UU both.txt\0M  clean.txt\0AA added-twice.txt\0DU deleted-by-us.txt\0";
    assert_eq!(
        parse_conflicted_paths(output),
        ["both.txt", "added-twice.txt", "deleted-by-us.txt"]
    );
}

#[test]
fn test_parse_name_status_reports_deletions() {
    let output = "M\tsrc/main.rs\nA\tsrc/new.rs\nD\tsrc/old.rs\nR100\tfrom.rs\tto.rs\n";
    let files = parse_name_status(output, "/repo");
    let summary: Vec<_> = files
        .iter()
        .map(|f| (f.name.as_str(), f.change_type))
        .collect();
    assert_eq!(
        summary,
        [
            ("src/main.rs", ChangeType::Modified),
            ("src/new.rs", ChangeType::Added),
            ("src/old.rs", ChangeType::Deleted),
            ("to.rs", ChangeType::Modified),
        ]
    );
}

#[test]
fn test_classify_line() {
    assert_eq!(classify_line("+added"), LineKind::Addition);
    assert_eq!(classify_line("-removed"), LineKind::Deletion);
    assert_eq!(classify_line(" context"), LineKind::Context);
    assert_eq!(classify_line("+++ b/file.rs"), LineKind::Context);
    assert_eq!(classify_line("--- a/file.rs"), LineKind::Context);
    assert_eq!(classify_line("@@ -1,2 +1,3 @@"), LineKind::Context);
    assert_eq!(classify_line(""), LineKind::Context);
}

#[test]
fn test_parse_diff_splits_per_file() {
    let output = "\
diff --git a/a.txt b/a.txt
index 1111111..2222222 100644
--- a/a.txt
+++ b/a.txt
@@ -1,2 +1,2 @@
 keep
-old
+new
diff --git a/dir/b.txt b/dir/b.txt
new file mode 100644
--- /dev/null
+++ b/dir/b.txt
@@ -0,0 +1 @@
+hello
";
    let blocks = parse_diff(output);
    assert_eq!(blocks.len(), 2);

    assert_eq!(blocks[0].path.as_deref(), Some("a.txt"));
    assert_eq!(blocks[0].additions(), 1);
    assert_eq!(blocks[0].deletions(), 1);
    assert!(blocks[0].raw.starts_with("diff --git a/a.txt"));

    assert_eq!(blocks[1].path.as_deref(), Some("dir/b.txt"));
    assert_eq!(blocks[1].additions(), 1);
    assert_eq!(blocks[1].deletions(), 0);
}

#[test]
fn test_parse_diff_block_without_header() {
    let block = parse_diff_block("@@ -1 +1 @@\n-a\n+b\n");
    assert_eq!(block.path, None);
    let kinds: Vec<_> = block.lines.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        [LineKind::Context, LineKind::Deletion, LineKind::Addition]
    );
}

#[test]
fn test_parse_stash_list() {
    let output = "stash@{0}\x1faaaa\x1fOn main: second\nstash@{1}\x1fbbbb\x1fWIP on main: 1234567 first\nnot-a-stash\x1fcccc\x1fignored\n";
    let entries = parse_stash_list(output);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].index, 0);
    assert_eq!(entries[0].oid, "aaaa");
    assert_eq!(entries[0].message, "On main: second");
    assert_eq!(entries[1].index, 1);
    assert_eq!(entries[1].reference(), "stash@{1}");
}

#[test]
fn test_parsers_accept_empty_input() {
    assert!(parse_commits("").is_empty());
    assert!(parse_branches("").is_empty());
    assert!(parse_status("", "/repo").is_empty());
    assert!(parse_conflicted_paths("").is_empty());
    assert!(parse_name_status("", "/repo").is_empty());
    assert!(parse_diff("").is_empty());
    assert!(parse_stash_list("").is_empty());
}
