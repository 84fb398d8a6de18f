// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations engine.
//!
//! ```text
//!               GitClient<R: CommandRunner>
//!   client.rs   status/branches/diff/commit/push/pull/fetch/checkout
//!   log.rs      logs(skip, limit), LogCursor, LogReader
//!   conflict.rs merge, continue/abort, resolve
//!   stash.rs    list/save/apply/pop/drop (stale entries rejected)
//!        |                 |                  |
//!        v                 v                  v
//!   core::process      parse.rs          events.rs
//!   git argv, no shell  text --> types    EventBus, OperationScope
//!
//!   repo.rs    gix: .git probe, HEAD, merge state   (no subprocess)
//!   native.rs  git2: config repo --> global          (no subprocess)
//! ```
//!
//! **`GitClient`** shells out to `git` for everything that changes state or
//! parses porcelain output. **gix** answers cheap repository questions and
//! **libgit2** resolves configuration.

pub mod client;
mod conflict;
pub mod events;
pub mod log;
pub mod native;
pub mod parse;
pub mod repo;
mod stash;
pub mod types;


pub use client::GitClient;
pub use events::{EngineEvent, EventBus, Operation, OperationScope, Subscription};
pub use log::{LogCursor, LogReader, LogWindow};
pub use native::NativeConfig;
pub use types::{
    Branch, ChangeType, ChangedFile, Commit, ConfigScope, ConfigValue, ConflictSide,
    ConflictState, DiffBlock, DiffLine, DiffTarget, Identity, LineKind, MergeOutcome, StashEntry,
};
