// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parsers for git's textual output.
//!
//! ```text
//! git log     %H 1f %an 1f %ad 1f %s 1f %D 1f %b 1e   --> Vec<Commit>
//! git branch  %(HEAD) 1f name 1f upstream 1f oid 1f subject --> Vec<Branch>
//! git status  --porcelain -z                          --> Vec<ChangedFile>
//! git show    --name-status                           --> Vec<ChangedFile>
//! git diff                                            --> Vec<DiffBlock>
//! git stash   list %gd 1f %H 1f %gs                   --> Vec<StashEntry>
//! ```
//!
//! Log and branch formats use the ASCII unit separator (0x1f) between fields
//! and the record separator (0x1e) between commits. Neither can appear in a
//! name, date or subject.
//!
//! Every parser accepts empty input and returns an empty collection.

#[cfg(test)]
mod tests;

use regex::Regex;
use std::sync::LazyLock;

use super::types::{
    Branch, ChangeType, ChangedFile, Commit, DiffBlock, DiffLine, LineKind, StashEntry,
};

pub const FIELD_SEP: char = '\x1f';
pub const RECORD_SEP: char = '\x1e';

/// `git log` format consumed by [`parse_commits`].
pub const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ad%x1f%s%x1f%D%x1f%b%x1e";
/// Date format paired with [`LOG_FORMAT`].
pub const LOG_DATE_FORMAT: &str = "--date=format:%Y-%m-%d %H:%M:%S";
/// `git branch` format consumed by [`parse_branches`].
pub const BRANCH_FORMAT: &str = "--format=%(HEAD)%1f%(refname:short)%1f%(upstream:short)%1f%(objectname)%1f%(contents:subject)";
/// `git stash list` format consumed by [`parse_stash_list`].
pub const STASH_FORMAT: &str = "--format=%gd%x1f%H%x1f%gs";

/// Porcelain codes for unmerged paths.
pub const UNMERGED_CODES: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

static STASH_REF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^stash@\{(\d+)\}$").ok());

// --- Commits ---

/// Parses `git log` output produced with [`LOG_FORMAT`].
///
/// Records with fewer than four fields are skipped.
#[must_use]
pub fn parse_commits(output: &str) -> Vec<Commit> {
    output.split(RECORD_SEP).filter_map(parse_commit).collect()
}

/// Parses one record: hash, author, date and subject in that order, then
/// optional decorations and body.
#[must_use]
pub fn parse_commit(record: &str) -> Option<Commit> {
    let record = record.trim_start_matches(['\n', '\r']);
    if record.trim().is_empty() {
        return None;
    }

    let mut fields = record.splitn(6, FIELD_SEP);
    let hash = fields.next()?.trim();
    let author = fields.next()?;
    let date = fields.next()?;
    let subject = fields.next()?;
    if hash.is_empty() {
        return None;
    }

    let (refs, tags) = parse_decorations(fields.next().unwrap_or_default());
    let body = fields
        .next()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(String::from);

    Some(Commit {
        hash: hash.to_string(),
        author: author.to_string(),
        date: date.to_string(),
        subject: subject.to_string(),
        body,
        refs,
        tags,
    })
}

/// Splits `%D` output into plain refs and tag names.
fn parse_decorations(decorations: &str) -> (Vec<String>, Vec<String>) {
    let mut refs = Vec::new();
    let mut tags = Vec::new();
    for decoration in decorations.split(", ").map(str::trim).filter(|d| !d.is_empty()) {
        match decoration.strip_prefix("tag: ") {
            Some(tag) => tags.push(tag.to_string()),
            None => refs.push(decoration.to_string()),
        }
    }
    (refs, tags)
}

// --- Branches ---

/// Parses one line of plain `git branch` output.
///
/// A leading `* ` marks the current branch; the marker is not part of the name.
#[must_use]
pub fn parse_branch_line(line: &str) -> Option<Branch> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (name, is_current) = match trimmed.strip_prefix('*') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    };
    // "(HEAD detached at ...)" is not a branch.
    if name.is_empty() || name.starts_with('(') {
        return None;
    }
    Some(Branch::new(name, is_current))
}

/// Parses `git branch` output, either [`BRANCH_FORMAT`] records or plain lines.
#[must_use]
pub fn parse_branches(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            if line.contains(FIELD_SEP) {
                parse_formatted_branch(line)
            } else {
                parse_branch_line(line)
            }
        })
        .collect()
}

fn parse_formatted_branch(line: &str) -> Option<Branch> {
    let mut fields = line.splitn(5, FIELD_SEP);
    let head = fields.next()?;
    let name = fields.next()?.trim();
    if name.is_empty() || name.starts_with('(') {
        return None;
    }
    let non_empty = |s: Option<&str>| {
        s.map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    Some(Branch {
        name: name.to_string(),
        is_current: head.trim() == "*",
        upstream: non_empty(fields.next()),
        latest_commit_hash: non_empty(fields.next()),
        latest_commit_message: non_empty(fields.next()),
    })
}

// --- Status ---

/// Maps a two-character porcelain code to a change type.
///
/// The first non-space character decides: `A` is added, `M` is modified and
/// everything else, including `D` and `??`, reads as modified. Deletions are
/// only reported for commit file lists, see [`parse_name_status`].
#[must_use]
pub fn change_type_from_code(code: &str) -> ChangeType {
    match code.trim_start().chars().next() {
        Some('A') => ChangeType::Added,
        _ => ChangeType::Modified,
    }
}

/// Parses `git status --porcelain -z` output.
#[must_use]
pub fn parse_status(output: &str, project_path: &str) -> Vec<ChangedFile> {
    porcelain_entries(output)
        .map(|(code, name)| changed_file(code, name, project_path))
        .collect()
}

/// Paths whose porcelain code marks them as unmerged.
#[must_use]
pub fn parse_conflicted_paths(output: &str) -> Vec<String> {
    porcelain_entries(output)
        .filter(|(code, _)| UNMERGED_CODES.contains(code))
        .map(|(_, name)| name.to_string())
        .collect()
}

fn changed_file(code: &str, name: &str, project_path: &str) -> ChangedFile {
    let index_code = code.chars().next().unwrap_or(' ');
    ChangedFile {
        project_path: project_path.to_string(),
        name: name.to_string(),
        change_type: change_type_from_code(code),
        staged: !matches!(index_code, ' ' | '?' | '!'),
    }
}

/// Yields `(code, path)` pairs from NUL separated porcelain output.
///
/// Rename and copy entries are followed by their source path, which is skipped.
fn porcelain_entries(output: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut tokens = output.split('\0');
    std::iter::from_fn(move || {
        loop {
            let token = tokens.next()?;
            if token.len() < 4 || !token.is_char_boundary(2) {
                continue;
            }
            let (code, rest) = token.split_at(2);
            let Some(path) = rest.strip_prefix(' ') else {
                continue;
            };
            if code.contains(['R', 'C']) {
                tokens.next();
            }
            return Some((code, path));
        }
    })
}

/// Parses `git show --name-status --format=` output for one commit.
///
/// Unlike working-tree status, a `D` here is reported as deleted.
#[must_use]
pub fn parse_name_status(output: &str, project_path: &str) -> Vec<ChangedFile> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let code = parts.next()?.trim();
            let name = parts.next_back()?;
            if code.is_empty() || name.is_empty() {
                return None;
            }
            let change_type = if code.starts_with('D') {
                ChangeType::Deleted
            } else {
                change_type_from_code(code)
            };
            Some(ChangedFile {
                project_path: project_path.to_string(),
                name: name.to_string(),
                change_type,
                staged: false,
            })
        })
        .collect()
}

// --- Diff ---

/// Classifies one unified-diff line by its first character.
///
/// `+++` and `---` file headers are context, not changes.
#[must_use]
pub fn classify_line(line: &str) -> LineKind {
    if line.starts_with('+') && !line.starts_with("+++") {
        LineKind::Addition
    } else if line.starts_with('-') && !line.starts_with("---") {
        LineKind::Deletion
    } else {
        LineKind::Context
    }
}

/// Classifies every line of a diff as one block.
#[must_use]
pub fn parse_diff_block(raw: &str) -> DiffBlock {
    let lines = raw
        .lines()
        .map(|line| DiffLine {
            kind: classify_line(line),
            text: line.to_string(),
        })
        .collect();
    DiffBlock {
        path: diff_header_path(raw.lines().next().unwrap_or_default()),
        raw: raw.to_string(),
        lines,
    }
}

/// Splits `git diff` output into one block per `diff --git` header.
#[must_use]
pub fn parse_diff(output: &str) -> Vec<DiffBlock> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in output.lines() {
        if line.starts_with("diff --git ") && !current.is_empty() {
            blocks.push(parse_diff_block(&current));
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        blocks.push(parse_diff_block(&current));
    }
    blocks
}

/// Extracts `path` from `diff --git a/path b/path`.
fn diff_header_path(header: &str) -> Option<String> {
    let rest = header.strip_prefix("diff --git ")?;
    let target = rest.rsplit(" b/").next()?;
    (target != rest).then(|| target.to_string())
}

// --- Stash ---

/// Parses `git stash list` output produced with [`STASH_FORMAT`].
#[must_use]
pub fn parse_stash_list(output: &str) -> Vec<StashEntry> {
    output.lines().filter_map(parse_stash_line).collect()
}

fn parse_stash_line(line: &str) -> Option<StashEntry> {
    let mut fields = line.splitn(3, FIELD_SEP);
    let reference = fields.next()?.trim();
    let oid = fields.next()?.trim();
    let message = fields.next().unwrap_or_default().trim();

    let captures = STASH_REF.as_ref()?.captures(reference)?;
    let index = captures.get(1)?.as_str().parse().ok()?;

    Some(StashEntry {
        index,
        oid: oid.to_string(),
        message: message.to_string(),
    })
}
