// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Paginated commit history.
//!
//! ```text
//! GitClient::logs(repo, skip, limit)    stateless window
//!     git log --skip=S -n L
//!
//! LogCursor (owned by the caller)
//!   next_window() --> Some(LogWindow) | None while loading / at end
//!   finish(count) --> page recorded, count == 0 ends history
//!   fail()        --> loading guard cleared, retry allowed
//!   should_prefetch(row) --> row crossed prefetch_percent of loaded rows
//!
//! LogReader::load_next(repo, &mut cursor) ties the two together.
//! ```

use std::path::Path;
use tracing::debug;

use super::client::GitClient;
use super::parse;
use super::repo;
use super::types::Commit;
use crate::config::types::HistorySettings;
use crate::core::process::{CommandRunner, SystemRunner};
use crate::error::{EngineResult, ProcessError};

impl<R: CommandRunner> GitClient<R> {
    /// Up to `limit` commits reachable from HEAD after skipping `skip`.
    ///
    /// Returns an empty list outside a repository, in a repository without
    /// commits, and past the end of history.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails for another reason.
    pub async fn logs(&self, repo: &Path, skip: usize, limit: usize) -> EngineResult<Vec<Commit>> {
        if !repo::is_git_project(repo) || limit == 0 {
            return Ok(Vec::new());
        }
        let args = [
            "log".to_string(),
            parse::LOG_FORMAT.to_string(),
            parse::LOG_DATE_FORMAT.to_string(),
            format!("--skip={skip}"),
            format!("--max-count={limit}"),
        ];
        match self.query(repo, &args).await {
            Ok(output) => Ok(parse::parse_commits(&output)),
            Err(e)
                if matches!(e.as_process(), Some(ProcessError::NonZeroExit { .. }))
                    && matches!(repo::has_commits(repo), Ok(false)) =>
            {
                debug!(repo = %repo.display(), "no commits yet");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// One page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogWindow {
    pub skip: usize,
    pub limit: usize,
}

/// Caller-owned pagination state for incremental history loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LogCursor {
    page_size: usize,
    prefetch_percent: u8,
    current_page: usize,
    loaded: usize,
    has_more: bool,
    loading: bool,
}

impl LogCursor {
    #[must_use]
    pub const fn new(page_size: usize, prefetch_percent: u8) -> Self {
        Self {
            page_size,
            prefetch_percent,
            current_page: 0,
            loaded: 0,
            has_more: true,
            loading: false,
        }
    }

    #[must_use]
    pub const fn from_settings(settings: &HistorySettings) -> Self {
        Self::new(settings.page_size, settings.prefetch_percent)
    }

    /// Claims the next page. `None` while a page is outstanding or once
    /// history is exhausted.
    pub const fn next_window(&mut self) -> Option<LogWindow> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(LogWindow {
            skip: self.current_page * self.page_size,
            limit: self.page_size,
        })
    }

    /// Records a fetched page of `count` commits. Zero ends history.
    pub const fn finish(&mut self, count: usize) {
        self.loading = false;
        if count == 0 {
            self.has_more = false;
        } else {
            self.current_page += 1;
            self.loaded += count;
        }
    }

    /// Releases the loading guard after a failed fetch; the same page is retried.
    pub const fn fail(&mut self) {
        self.loading = false;
    }

    /// Whether showing row `row` (zero-based) should trigger the next page.
    #[must_use]
    pub fn should_prefetch(&self, row: usize) -> bool {
        if self.loading || !self.has_more {
            return false;
        }
        if self.loaded == 0 {
            return true;
        }
        (row + 1) * 100 >= self.loaded * usize::from(self.prefetch_percent)
    }

    /// Starts over from the newest commit.
    pub const fn reset(&mut self) {
        self.current_page = 0;
        self.loaded = 0;
        self.has_more = true;
        self.loading = false;
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Loads history page by page for one repository view.
#[derive(Debug, Clone)]
pub struct LogReader<R = SystemRunner> {
    client: GitClient<R>,
    history: HistorySettings,
}

impl<R: CommandRunner> LogReader<R> {
    #[must_use]
    pub const fn new(client: GitClient<R>, history: HistorySettings) -> Self {
        Self { client, history }
    }

    /// Fresh cursor using the configured page size and prefetch percentage.
    #[must_use]
    pub const fn cursor(&self) -> LogCursor {
        LogCursor::from_settings(&self.history)
    }

    /// Stateless window query, see [`GitClient::logs`].
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails.
    pub async fn page(&self, repo: &Path, skip: usize, limit: usize) -> EngineResult<Vec<Commit>> {
        self.client.logs(repo, skip, limit).await
    }

    /// Fetches the cursor's next page and records the result in it.
    ///
    /// Returns an empty list without querying while a page is outstanding
    /// or after history ended.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails; the cursor stays on the same page.
    pub async fn load_next(&self, repo: &Path, cursor: &mut LogCursor) -> EngineResult<Vec<Commit>> {
        let Some(window) = cursor.next_window() else {
            return Ok(Vec::new());
        };
        match self.page(repo, window.skip, window.limit).await {
            Ok(commits) => {
                cursor.finish(commits.len());
                Ok(commits)
            }
            Err(e) => {
                cursor.fail();
                Err(e)
            }
        }
    }
}
