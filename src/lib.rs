// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          query / ops / stash / log
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!   +-----------------------------------------------+
//!   |  git   GitClient, parse, log, conflict, stash |
//!   |        events (EventBus), repo (gix),         |
//!   |        native (libgit2 config)                |
//!   +-----------------------------------------------+
//!   |  core   process (CommandRunner, timeouts)     |
//!   +-----------------------------------------------+
//!   |  foundation   error, logging                  |
//!   +-----------------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
