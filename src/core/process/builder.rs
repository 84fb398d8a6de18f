// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/find
//!  • arg/args/cwd/env/flag/timeout/name
//!  • capture_output (keep, don't trace)
//!
//! ProcessFlags: ALLOW_FAILURE
//! StreamFlags: FORWARD_TO_LOG, KEEP_IN_STRING (default: both)
//! ```
//!
//! There is deliberately no shell entry point: every argument reaches the
//! child verbatim, so quotes, spaces and metacharacters in commit messages,
//! branch names or paths are never interpreted.

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use std::time::Duration;


/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Don't fail if the process exits with a non-zero status
        const ALLOW_FAILURE = 0x01;
    }
}

bitflags! {
    /// Flags controlling stream handling for stdout/stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Forward output lines to tracing at TRACE level
        const FORWARD_TO_LOG = 0x01;
        /// Keep output in a string for later retrieval
        const KEEP_IN_STRING = 0x02;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG | Self::KEEP_IN_STRING
    }
}

/// Output from a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
    combined: String,
}

impl ProcessOutput {
    #[must_use]
    pub const fn new(exit_code: i32, stdout: String, stderr: String, combined: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            combined,
        }
    }

    /// Successful output with only stdout, as produced by scripted runners.
    #[must_use]
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        let stdout = stdout.into();
        Self {
            exit_code: 0,
            combined: stdout.clone(),
            stdout,
            stderr: String::new(),
        }
    }

    /// Returns the process exit code (0 = success, -1 = killed by signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns stdout and stderr interleaved in arrival order.
    #[must_use]
    pub fn combined(&self) -> &str {
        &self.combined
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Consumes the output, returning stdout.
    #[must_use]
    pub fn into_stdout(self) -> String {
        self.stdout
    }
}

/// Builder for configuring and running a process.
///
/// Doubles as the request type handed to a [`super::CommandRunner`].
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Variables added on top of the inherited environment
    env: BTreeMap<String, String>,
    flags: ProcessFlags,
    stdout: StreamFlags,
    stderr: StreamFlags,
    /// Display name for logging
    name: Option<String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// Bare names are resolved through PATH by the OS at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            name: None,
            timeout: None,
        }
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Results are cached for subsequent lookups.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        which::which(program).map_or(None, |path| {
            let mut cache = exe_cache()
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            cache.insert(program.to_string(), path.clone());
            Some(path)
        })
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Convenience: capture both streams without logging them.
    #[must_use]
    pub const fn capture_output(mut self) -> Self {
        self.stdout = StreamFlags::KEEP_IN_STRING;
        self.stderr = StreamFlags::KEEP_IN_STRING;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a timeout for the process; `None` waits indefinitely.
    #[must_use]
    pub const fn timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout = duration;
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    #[must_use]
    pub const fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    #[must_use]
    pub const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    #[must_use]
    pub const fn stdout_config(&self) -> StreamFlags {
        self.stdout
    }

    pub(super) const fn stderr_config(&self) -> StreamFlags {
        self.stderr
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the full command line as a string (for logging and errors).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = self
            .program
            .file_stem()
            .map_or_else(|| self.program.display().to_string(), |s| {
                s.to_string_lossy().into_owned()
            });
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                let _ = write!(cmd, " {arg:?}");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }
}
