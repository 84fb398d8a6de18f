// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .timeout() .capture_output()
//!       |
//!       v
//! CommandRunner::run(process, cancel)
//!   SystemRunner --> tokio::process::Command
//!                    drain stdout/stderr concurrently
//!                    kill on timeout / cancel
//!       --> ProcessOutput { exit_code, stdout, stderr, combined }
//! ```

pub mod builder;
mod io;
mod runner;

pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
pub use runner::{CommandRunner, SystemRunner};
