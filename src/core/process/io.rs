// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout reader task --\
//!                         >-- unbounded channel --> collector task
//!   stderr reader task --/                          stdout / stderr / combined
//!   wait | timeout | cancel
//!   --> Completion { output, ending }
//! ```
//!
//! Both pipes are drained while the child runs. A child that fills a pipe
//! buffer never blocks on a reader that is waiting for exit.

use std::process::ExitStatus;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// How the child stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Ending {
    Exited(i32),
    TimedOut(Duration),
    Cancelled,
}

#[derive(Debug)]
pub(super) struct Completion {
    pub(super) output: ProcessOutput,
    pub(super) ending: Ending,
}

#[derive(Debug, Default)]
struct Transcript {
    stdout: String,
    stderr: String,
    combined: String,
}

impl Transcript {
    fn push(&mut self, stream: Stream, line: &str) {
        let target = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        append_line(target, line);
        append_line(&mut self.combined, line);
    }
}

fn append_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(line);
}

fn spawn_reader<R>(
    reader: Option<R>,
    stream: Stream,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<(Stream, String)>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let name = process_name.to_string();
    reader.map(|reader| {
        tokio::spawn(async move {
            read_stream(reader, stream, flags, &name, &tx).await;
        })
    })
}

/// Reads a stream line by line, decoding each line lossily as UTF-8.
async fn read_stream<R>(
    reader: R,
    stream: Stream,
    flags: StreamFlags,
    process_name: &str,
    tx: &mpsc::UnboundedSender<(Stream, String)>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = stream.as_str(), line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    let _ = tx.send((stream, line));
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = stream.as_str(),
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}

/// Resolves after `timeout`, or never.
async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Runs the child process, draining its output until exit, timeout or cancellation.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: &CancellationToken,
    ) -> Result<Completion, ProcessError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<(Stream, String)>();

        let stdout_handle = spawn_reader(
            child.stdout.take(),
            Stream::Stdout,
            self.stdout_config(),
            name,
            tx.clone(),
        );
        let stderr_handle = spawn_reader(
            child.stderr.take(),
            Stream::Stderr,
            self.stderr_config(),
            name,
            tx,
        );

        let collector = tokio::spawn(async move {
            let mut transcript = Transcript::default();
            while let Some((stream, line)) = rx.recv().await {
                transcript.push(stream, &line);
            }
            transcript
        });

        let timeout = self.timeout_duration();
        let io_error = |source: std::io::Error| ProcessError::Io {
            command: self.command_line(),
            source,
        };

        let ending = tokio::select! {
            status = child.wait() => Ending::Exited(exit_code(status.map_err(io_error)?)),
            () = expire(timeout) => {
                let limit = timeout.unwrap_or_default();
                warn!(process = %name, timeout = ?limit, "process timed out, killing");
                terminate(child).await;
                Ending::TimedOut(limit)
            }
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, killing process");
                terminate(child).await;
                Ending::Cancelled
            }
        };

        for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
            if matches!(ending, Ending::Exited(_)) {
                let _ = handle.await;
            } else {
                // A killed child's descendants may still hold the pipes open.
                handle.abort();
            }
        }

        let transcript = collector.await.unwrap_or_default();

        let code = match ending {
            Ending::Exited(code) => code,
            Ending::TimedOut(_) | Ending::Cancelled => -1,
        };
        Ok(Completion {
            output: ProcessOutput::new(
                code,
                transcript.stdout,
                transcript.stderr,
                transcript.combined,
            ),
            ending,
        })
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(error = %e, "failed to kill child process");
    }
}
