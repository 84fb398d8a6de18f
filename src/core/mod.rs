// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core execution primitives.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!   ProcessBuilder  CommandRunner
//!   ProcessOutput   SystemRunner
//! ```

pub mod process;
