// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             EngineError (~24 bytes)
//!                     |
//!   +--------+--------+--------+--------+
//!   |        |        |        |        |
//!   v        v        v        v        v
//! Process   Git     Stash    Config   Io/Other
//!   Box     Box      Box      Box     Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Process  SpawnFailed, NonZeroExit, Timeout, Cancelled
//!   Git      NotARepository, ConfigKeyNotFound, UnresolvedConflicts,
//!            OptionLikeArgument
//!   Stash    OutOfRange, Stale
//!   Config   ParseError, InvalidValue
//! ```
//!
//! Nothing in the engine retries. Every error reaches the caller as-is.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`, used at the binary edge.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`EngineError`].
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Top-level engine error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Subprocess execution failed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Stash operation rejected.
    #[error("stash error: {0}")]
    Stash(#[from] Box<StashError>),

    /// Settings error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl EngineError {
    /// Create an [`EngineError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }

    /// Returns the process error if this is one.
    #[must_use]
    pub fn as_process(&self) -> Option<&ProcessError> {
        match self {
            Self::Process(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the git error if this is one.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the stash error if this is one.
    #[must_use]
    pub fn as_stash(&self) -> Option<&StashError> {
        match self {
            Self::Stash(e) => Some(e),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for EngineError {
                fn from(err: $error) -> Self {
                    EngineError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    GitError => Git,
    StashError => Stash,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    ///
    /// `output` is the combined stdout+stderr transcript in arrival order.
    #[error("process '{command}' exited with code {code}: {output}")]
    NonZeroExit {
        command: String,
        code: i32,
        output: String,
    },

    /// Process timed out and was killed.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was killed because its cancellation token fired.
    #[error("process '{command}' was cancelled")]
    Cancelled { command: String },

    /// I/O failure while waiting on the process.
    #[error("i/o failure while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Combined output of a failed process, if it ran to completion.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { output, .. } => Some(output),
            _ => None,
        }
    }
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path has no `.git` entry.
    #[error("not a git repository: {path}")]
    NotARepository { path: String },

    /// Configuration key absent from both repository and global configuration.
    #[error("config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    /// Operation requires a merge in progress.
    #[error("no merge in progress in {path}")]
    NoMergeInProgress { path: String },

    /// Merge cannot be finalized while unmerged paths remain.
    #[error("unresolved conflicts remain: {}", .files.join(", "))]
    UnresolvedConflicts { files: Vec<String> },

    /// Revision, branch, remote or key that git would read as an option.
    #[error("refusing {kind} '{value}': it starts with '-'")]
    OptionLikeArgument { kind: &'static str, value: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Stash Errors ---

/// Stash stack addressing errors.
///
/// Stash entries are addressed by position, which shifts whenever the stack
/// changes. Operations re-list the stack and refuse entries that moved.
#[derive(Debug, Error)]
pub enum StashError {
    /// Index is past the end of the current stack.
    #[error("stash@{{{index}}} does not exist (stack has {len} entries)")]
    OutOfRange { index: usize, len: usize },

    /// Entry at this index is no longer the one the caller listed.
    #[error("stash@{{{index}}} is stale: expected {expected}, found {found}; reload the stash list")]
    Stale {
        index: usize,
        expected: String,
        found: String,
    },
}

// --- Config Errors ---

/// Settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load or deserialize settings.
    #[error("failed to load settings: {message}")]
    ParseError { message: String },

    /// Invalid settings value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
