// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings --> Logging --> Command Dispatch
//!                                 Ctrl-C --> cancel token --> git killed
//! ```

use std::process::ExitCode;

use gitops_engine::cli::global::GlobalOptions;
use gitops_engine::cli::{self, Command};
use gitops_engine::cmd::Context;
use gitops_engine::cmd::config::{run_config_command, run_options_command, run_whoami_command};
use gitops_engine::cmd::history::run_log_command;
use gitops_engine::cmd::ops::{
    run_branch_delete_command, run_checkout_command, run_commit_command, run_fetch_command,
    run_init_command, run_merge_abort_command, run_merge_command, run_merge_continue_command,
    run_pull_command, run_push_command, run_resolve_command,
};
use gitops_engine::cmd::output::EventPrinter;
use gitops_engine::cmd::query::{
    run_branches_command, run_diff_command, run_merge_state_command, run_status_command,
};
use gitops_engine::cmd::stash::run_stash_command;
use gitops_engine::config::Settings;
use gitops_engine::error::EngineResult;
use gitops_engine::git::GitClient;
use gitops_engine::logging::{LogConfig, init_logging};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let (settings, files) = match load_settings(&cli.global) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&LogConfig::from_settings(&settings.log)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &settings, &files).await
}

fn load_settings(global: &GlobalOptions) -> EngineResult<(Settings, Vec<String>)> {
    let loader = global.settings_loader()?;
    let files = loader.format_loaded_files();
    Ok((loader.build()?, files))
}

/// Cancels `token` on the first Ctrl-C so running git processes are killed.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupted, cancelling running git commands");
                token.cancel();
            }
            Err(e) => debug!(error = %e, "cannot listen for Ctrl-C"),
        }
    });
}

async fn dispatch_command(cli: &cli::Cli, settings: &Settings, files: &[String]) -> ExitCode {
    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());
    let client = GitClient::new(&settings.git).with_cancel_token(cancel);
    let ctx = Context::new(client, cli.global.repo.clone(), cli.global.json, settings);

    let printer = command
        .publishes_events()
        .then(|| EventPrinter::spawn(ctx.client.events(), ctx.json));

    let result = match command {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Options => run_options_command(settings, files, ctx.json),
        Command::Init(args) => run_init_command(args, &ctx).await,
        Command::Status => run_status_command(&ctx).await,
        Command::Branches => run_branches_command(&ctx).await,
        Command::Diff(args) => run_diff_command(args, &ctx).await,
        Command::Log(args) => run_log_command(args, &ctx).await,
        Command::Checkout(args) => run_checkout_command(args, &ctx).await,
        Command::BranchDelete(args) => run_branch_delete_command(args, &ctx).await,
        Command::Commit(args) => run_commit_command(args, &ctx).await,
        Command::Push(args) => run_push_command(args, &ctx).await,
        Command::Pull(args) => run_pull_command(args, &ctx).await,
        Command::Fetch(args) => run_fetch_command(args, &ctx).await,
        Command::Merge(args) => run_merge_command(args, &ctx).await,
        Command::MergeState => run_merge_state_command(&ctx).await,
        Command::MergeContinue => run_merge_continue_command(&ctx).await,
        Command::MergeAbort => run_merge_abort_command(&ctx).await,
        Command::Resolve(args) => run_resolve_command(args, &ctx).await,
        Command::Stash(args) => run_stash_command(args, &ctx).await,
        Command::Config(args) => run_config_command(args, &ctx).await,
        Command::Whoami => run_whoami_command(&ctx).await,
    };

    if let Some(printer) = printer {
        printer.finish().await;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
