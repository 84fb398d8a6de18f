// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command layer: one method per git operation.
//!
//! ```text
//! GitClient<R: CommandRunner>
//!   read-only   status, branches, diff, show_files, rev_list_count, remote_url
//!               (no .git entry --> empty result, no subprocess)
//!   tracked     commit, commit_all, push, pull, fetch
//!               Started --> git --> Succeeded | Failed
//!   untracked   init, stage, unstage, checkout, create/delete_branch, set_config
//!   native      config, user_identity (libgit2, no subprocess)
//!       |
//!       v
//!   ProcessBuilder(git, argv, cwd=repo, GIT_TERMINAL_PROMPT=0, ...)
//!       --> R::run(process, cancel)
//! ```
//!
//! Network operations use `network_timeout_secs`, everything else
//! `timeout_secs`. Arguments always travel as an argument vector, and
//! caller-supplied revisions, branches, remotes and config keys must not
//! start with `-`, so they can never be read as git options.

use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::events::{EngineEvent, EventBus, Operation};
use super::native::NativeConfig;
use super::parse;
use super::repo;
use super::types::{
    Branch, ChangedFile, Commit, ConfigScope, ConfigValue, DiffBlock, DiffTarget, Identity,
};
use crate::config::types::GitSettings;
use crate::core::process::{
    CommandRunner, ProcessBuilder, ProcessFlags, ProcessOutput, SystemRunner,
};
use crate::error::{EngineError, EngineResult, GitError};

/// Environment applied to every git invocation.
const GIT_ENV: [(&str, &str); 3] = [
    ("GIT_TERMINAL_PROMPT", "0"),
    ("GCM_INTERACTIVE", "never"),
    ("LC_ALL", "C"),
];

/// Returns `value` if git cannot mistake it for an option.
///
/// # Errors
///
/// Returns `GitError::OptionLikeArgument` when `value` starts with `-`.
pub(crate) fn operand<'a>(kind: &'static str, value: &'a str) -> EngineResult<&'a str> {
    if value.starts_with('-') {
        return Err(GitError::OptionLikeArgument {
            kind,
            value: value.to_string(),
        }
        .into());
    }
    Ok(value)
}

/// Executes git operations through an injectable [`CommandRunner`].
///
/// Cloning is cheap; clones share the runner, event bus and cancellation token.
pub struct GitClient<R = SystemRunner> {
    runner: Arc<R>,
    git: PathBuf,
    local_timeout: Option<Duration>,
    network_timeout: Option<Duration>,
    global_config: Option<PathBuf>,
    native: NativeConfig,
    events: EventBus,
    cancel: CancellationToken,
}

impl<R> Clone for GitClient<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            git: self.git.clone(),
            local_timeout: self.local_timeout,
            network_timeout: self.network_timeout,
            global_config: self.global_config.clone(),
            native: self.native.clone(),
            events: self.events.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<R> std::fmt::Debug for GitClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitClient")
            .field("git", &self.git)
            .field("local_timeout", &self.local_timeout)
            .field("network_timeout", &self.network_timeout)
            .field("global_config", &self.global_config)
            .finish_non_exhaustive()
    }
}

impl GitClient<SystemRunner> {
    /// Client spawning the configured git binary.
    #[must_use]
    pub fn new(settings: &GitSettings) -> Self {
        Self::with_runner(SystemRunner, settings)
    }
}

impl<R: CommandRunner> GitClient<R> {
    /// Client executing through `runner`.
    #[must_use]
    pub fn with_runner(runner: R, settings: &GitSettings) -> Self {
        let git = ProcessBuilder::find(&settings.binary)
            .unwrap_or_else(|| PathBuf::from(&settings.binary));
        Self {
            runner: Arc::new(runner),
            git,
            local_timeout: settings.local_timeout(),
            network_timeout: settings.network_timeout(),
            global_config: settings.global_config.clone(),
            native: NativeConfig::new(settings.global_config.clone()),
            events: EventBus::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Publishes to `events` instead of a private bus.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Kills in-flight git processes when `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    // --- Execution ---

    fn command<I, S>(&self, repo: &Path, args: I, timeout: Option<Duration>) -> ProcessBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        GIT_ENV
            .iter()
            .fold(ProcessBuilder::new(&self.git), |builder, (key, value)| {
                builder.env(*key, *value)
            })
            .args(args)
            .cwd(repo)
            .name("git")
            .timeout(timeout)
    }

    async fn execute(&self, process: ProcessBuilder) -> EngineResult<ProcessOutput> {
        Ok(self.runner.run(process, self.cancel.clone()).await?)
    }

    /// Runs a local git command and returns its stdout.
    pub(crate) async fn git<I, S>(&self, repo: &Path, args: I) -> EngineResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let process = self.command(repo, args, self.local_timeout);
        Ok(self.execute(process).await?.into_stdout())
    }

    /// Runs a read-only local git command. Output is kept but not traced.
    pub(crate) async fn query<I, S>(&self, repo: &Path, args: I) -> EngineResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let process = self.command(repo, args, self.local_timeout).capture_output();
        Ok(self.execute(process).await?.into_stdout())
    }

    /// Runs a git command that talks to a remote.
    pub(crate) async fn git_network<I, S>(&self, repo: &Path, args: I) -> EngineResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let process = self.command(repo, args, self.network_timeout);
        Ok(self.execute(process).await?.into_stdout())
    }

    /// Wraps `work` in `Started` and exactly one terminal event.
    pub(crate) async fn tracked<T, F>(&self, op: Operation, repo: &Path, work: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        let scope = self.events.begin(op, repo);
        let result = work.await;
        scope.settle(&result);
        result
    }

    // --- Read-only queries ---

    /// Working-tree and index changes, including untracked files.
    ///
    /// # Errors
    ///
    /// Returns an error if `git status` fails.
    pub async fn status(&self, repo: &Path) -> EngineResult<Vec<ChangedFile>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let output = self
            .query(
                repo,
                ["status", "--porcelain", "-z", "--untracked-files=all"],
            )
            .await?;
        Ok(parse::parse_status(&output, &repo.display().to_string()))
    }

    /// Local branches with upstream and tip commit.
    ///
    /// # Errors
    ///
    /// Returns an error if `git branch` fails.
    pub async fn branches(&self, repo: &Path) -> EngineResult<Vec<Branch>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let output = self
            .query(repo, ["branch", "--no-color", parse::BRANCH_FORMAT])
            .await?;
        Ok(parse::parse_branches(&output))
    }

    /// Branch HEAD points at, `None` when detached or outside a repository.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read.
    pub fn current_branch(&self, repo: &Path) -> EngineResult<Option<String>> {
        if !repo::is_git_project(repo) {
            return Ok(None);
        }
        repo::current_branch(repo)
    }

    /// Unified diff split per file. `path` limits the diff to one file.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails, e.g. for an unknown commit.
    pub async fn diff(
        &self,
        repo: &Path,
        target: &DiffTarget,
        path: Option<&str>,
    ) -> EngineResult<Vec<DiffBlock>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let mut args: Vec<&str> = match target {
            DiffTarget::WorkingTree => vec!["diff", "--no-color", "--no-ext-diff"],
            DiffTarget::Staged => vec!["diff", "--cached", "--no-color", "--no-ext-diff"],
            DiffTarget::Commit(hash) => vec![
                "show",
                "--format=",
                "--patch",
                "--no-color",
                "--no-ext-diff",
                operand("revision", hash)?,
            ],
        };
        if let Some(path) = path {
            args.extend(["--", path]);
        }
        let output = self.query(repo, args).await?;
        Ok(parse::parse_diff(&output))
    }

    /// Files touched by one commit. Deletions are reported as such.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit does not exist.
    pub async fn show_files(&self, repo: &Path, hash: &str) -> EngineResult<Vec<ChangedFile>> {
        if !repo::is_git_project(repo) {
            return Ok(Vec::new());
        }
        let hash = operand("revision", hash)?;
        let output = self
            .query(repo, ["show", "--name-status", "--format=", hash])
            .await?;
        Ok(parse::parse_name_status(
            &output,
            &repo.display().to_string(),
        ))
    }

    /// Number of commits reachable from `range` (e.g. `HEAD` or `main..dev`).
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid or the output is not a number.
    pub async fn rev_list_count(&self, repo: &Path, range: &str) -> EngineResult<usize> {
        if !repo::is_git_project(repo) {
            return Ok(0);
        }
        let range = operand("revision range", range)?;
        let output = self.query(repo, ["rev-list", "--count", range]).await?;
        output.trim().parse().map_err(|e| {
            EngineError::other(format!(
                "unexpected rev-list output '{}': {e}",
                output.trim()
            ))
        })
    }

    /// URL of `remote`, `None` if the remote does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be executed.
    pub async fn remote_url(&self, repo: &Path, remote: &str) -> EngineResult<Option<String>> {
        if !repo::is_git_project(repo) {
            return Ok(None);
        }
        let remote = operand("remote", remote)?;
        let process = self
            .command(repo, ["remote", "get-url", remote], self.local_timeout)
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE);
        let output = self.execute(process).await?;
        if !output.success() {
            debug!(remote, code = output.exit_code(), "no such remote");
            return Ok(None);
        }
        Ok(Some(output.stdout().trim().to_string()).filter(|url| !url.is_empty()))
    }

    /// Pseudo-commit for uncommitted changes, `None` when the tree is clean.
    ///
    /// # Errors
    ///
    /// Returns an error if `git status` fails.
    pub async fn working_tree_commit(&self, repo: &Path) -> EngineResult<Option<Commit>> {
        let changes = self.status(repo).await?;
        if changes.is_empty() {
            return Ok(None);
        }
        let author = self
            .native
            .get("user.name", repo)
            .await
            .map(|v| v.value)
            .unwrap_or_default();
        Ok(Some(Commit::working_tree(author, changes.len())))
    }

    // --- Configuration ---

    /// Resolves `key` from repository, then global configuration.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ConfigKeyNotFound` if the key is unset everywhere.
    pub async fn config(&self, repo: &Path, key: &str) -> EngineResult<ConfigValue> {
        self.native.get(key, repo).await
    }

    /// Configured `user.name` and `user.email`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ConfigKeyNotFound` if either is unset.
    pub async fn user_identity(&self, repo: &Path) -> EngineResult<Identity> {
        self.native.identity(repo).await
    }

    /// Writes `key` at `scope`. Global writes go to `git.global_config` when set.
    ///
    /// # Errors
    ///
    /// Returns an error if `git config` fails.
    pub async fn set_config(
        &self,
        repo: &Path,
        key: &str,
        value: &str,
        scope: ConfigScope,
    ) -> EngineResult<()> {
        let mut args: Vec<&OsStr> = vec!["config".as_ref()];
        match (scope, &self.global_config) {
            (ConfigScope::Repository, _) => args.push("--local".as_ref()),
            (ConfigScope::Global, Some(file)) => {
                args.push("--file".as_ref());
                args.push(file.as_os_str());
            }
            (ConfigScope::Global, None) => args.push("--global".as_ref()),
        }
        args.push(operand("config key", key)?.as_ref());
        args.push(value.as_ref());
        self.git(repo, args).await?;
        Ok(())
    }

    // --- Working tree and branches ---

    /// Creates `path` if needed and initializes a repository in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or `git init` fails.
    pub async fn init(&self, path: &Path) -> EngineResult<()> {
        tokio::fs::create_dir_all(path).await?;
        self.git(path, ["init", "--quiet"]).await?;
        info!(path = %path.display(), "initialized repository");
        Ok(())
    }

    /// Stages `paths`. An empty list is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `git add` fails.
    pub async fn stage(&self, repo: &Path, paths: &[&str]) -> EngineResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.git(repo, ["add", "--"].iter().chain(paths)).await?;
        Ok(())
    }

    /// Stages every change, including deletions and untracked files.
    ///
    /// # Errors
    ///
    /// Returns an error if `git add` fails.
    pub async fn stage_all(&self, repo: &Path) -> EngineResult<()> {
        self.git(repo, ["add", "--all"]).await?;
        Ok(())
    }

    /// Removes `paths` from the index, keeping working-tree content.
    ///
    /// # Errors
    ///
    /// Returns an error if `git reset` fails.
    pub async fn unstage(&self, repo: &Path, paths: &[&str]) -> EngineResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.git(repo, ["reset", "--quiet", "--"].iter().chain(paths))
            .await?;
        Ok(())
    }

    /// Switches to `branch` and announces it on the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if `git checkout` fails.
    pub async fn checkout(&self, repo: &Path, branch: &str) -> EngineResult<()> {
        let branch = operand("branch", branch)?;
        self.git(repo, ["checkout", "--quiet", branch]).await?;
        self.announce_branch(repo, branch);
        Ok(())
    }

    /// Creates `name` at HEAD, switching to it when `checkout` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch exists or git fails.
    pub async fn create_branch(&self, repo: &Path, name: &str, checkout: bool) -> EngineResult<()> {
        let name = operand("branch", name)?;
        if checkout {
            self.git(repo, ["checkout", "--quiet", "-b", name]).await?;
            self.announce_branch(repo, name);
        } else {
            self.git(repo, ["branch", name]).await?;
        }
        Ok(())
    }

    /// Deletes `name`. Without `force`, unmerged branches are refused by git.
    ///
    /// # Errors
    ///
    /// Returns an error if `git branch -d` fails.
    pub async fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> EngineResult<()> {
        let flag = if force { "-D" } else { "-d" };
        let name = operand("branch", name)?;
        self.git(repo, ["branch", flag, name]).await?;
        Ok(())
    }

    fn announce_branch(&self, repo: &Path, branch: &str) {
        debug!(repo = %repo.display(), branch, "branch changed");
        self.events.publish(EngineEvent::BranchChanged {
            repo: repo.to_path_buf(),
            branch: branch.to_string(),
        });
    }

    // --- Tracked operations ---

    /// Commits the index with `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if `git commit` fails, e.g. with nothing to commit.
    pub async fn commit(&self, repo: &Path, message: &str) -> EngineResult<()> {
        self.tracked(Operation::Commit, repo, self.commit_index(repo, message))
            .await
    }

    /// Stages everything, then commits, as one tracked operation.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails. A failed commit
    /// leaves the staged changes in place.
    pub async fn commit_all(&self, repo: &Path, message: &str) -> EngineResult<()> {
        self.tracked(Operation::Commit, repo, async {
            self.stage_all(repo).await?;
            self.commit_index(repo, message).await
        })
        .await
    }

    async fn commit_index(&self, repo: &Path, message: &str) -> EngineResult<()> {
        self.git(repo, ["commit", "--quiet", "-m", message]).await?;
        Ok(())
    }

    /// Pushes to `remote`/`branch`, or the configured upstream when omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the push is rejected, times out or is cancelled.
    pub async fn push(
        &self,
        repo: &Path,
        remote: Option<&str>,
        branch: Option<&str>,
        set_upstream: bool,
    ) -> EngineResult<()> {
        self.tracked(Operation::Push, repo, async {
            let mut args = vec!["push", "--quiet"];
            if set_upstream {
                args.push("--set-upstream");
            }
            args.extend(remote.map(|r| operand("remote", r)).transpose()?);
            args.extend(branch.map(|b| operand("branch", b)).transpose()?);
            self.git_network(repo, args).await.map(drop)
        })
        .await
    }

    /// Fetches and merges from `remote`/`branch`, or the upstream when omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull fails, including when it stops on conflicts.
    pub async fn pull(
        &self,
        repo: &Path,
        remote: Option<&str>,
        branch: Option<&str>,
    ) -> EngineResult<()> {
        self.tracked(Operation::Pull, repo, async {
            let mut args = vec!["pull", "--quiet", "--no-rebase", "--no-edit"];
            args.extend(remote.map(|r| operand("remote", r)).transpose()?);
            args.extend(branch.map(|b| operand("branch", b)).transpose()?);
            self.git_network(repo, args).await.map(drop)
        })
        .await
    }

    /// Fetches from `remote`, or the default remote when omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, times out or is cancelled.
    pub async fn fetch(&self, repo: &Path, remote: Option<&str>) -> EngineResult<()> {
        self.tracked(Operation::Fetch, repo, async {
            let mut args = vec!["fetch", "--quiet", "--prune"];
            args.extend(remote.map(|r| operand("remote", r)).transpose()?);
            self.git_network(repo, args).await.map(drop)
        })
        .await
    }
}
