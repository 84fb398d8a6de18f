// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdio
//!              |
//!              v
//!          spawn() --> run_child()
//!                          |
//!         +----------------+----------------+
//!         v                v                v
//!      Exited          TimedOut         Cancelled
//!   validate code    ProcessError     ProcessError
//!  (skip if ALLOW_FAILURE)
//!         |
//!         v
//!   ProcessOutput { exit_code, stdout, stderr, combined }
//! ```

use std::future::Future;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use super::io::Ending;
use crate::error::ProcessError;

/// Executes external commands on behalf of the engine.
///
/// The git layer only talks to this trait, so tests can substitute a
/// scripted runner for the real process spawner.
pub trait CommandRunner: Send + Sync + 'static {
    /// Runs `process` to completion.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` when the command cannot be spawned, exits
    /// non-zero without `ALLOW_FAILURE`, times out, or is cancelled.
    fn run(
        &self,
        process: ProcessBuilder,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ProcessOutput, ProcessError>> + Send;
}

/// Spawns real child processes through tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        process: ProcessBuilder,
        cancel: CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        process.run_with_cancellation(&cancel).await
    }
}

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The executable cannot be found or spawned.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` is not set).
    /// - The configured timeout elapses.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        self.run_with_cancellation(&CancellationToken::new()).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token fires the child is killed and `ProcessError::Cancelled`
    /// is returned. A token that is already cancelled prevents the spawn.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessBuilder::run`], plus `ProcessError::Cancelled`.
    pub async fn run_with_cancellation(
        self,
        token: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Err(ProcessError::Cancelled { command: cmd_line });
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program().display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                }
            }
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let completion = self.run_child(&name, &mut child, token).await?;
        let output = completion.output;

        match completion.ending {
            Ending::TimedOut(limit) => {
                return Err(ProcessError::Timeout {
                    command: cmd_line,
                    timeout_secs: limit.as_secs(),
                });
            }
            Ending::Cancelled => return Err(ProcessError::Cancelled { command: cmd_line }),
            Ending::Exited(_) => {}
        }

        if !output.success() && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) {
            if !output.stderr().is_empty() {
                debug!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
                output: output.combined().trim_end().to_string(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.arguments());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.envs(self.environment());

        // Nothing ever reads from the terminal.
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        command.kill_on_drop(true);

        command
    }
}
