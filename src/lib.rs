// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod scan;
pub mod types;

use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, WatchConfig};
use crate::engine::{shutdown_signal, WatchContext, WatchLoop};
use crate::errors::Result;
use crate::types::slash_path;

/// Resolve the effective configuration from the CLI / environment and the
/// optional config file.
pub fn load_config(args: &CliArgs) -> Result<WatchConfig> {
    load_and_validate(args.config.as_deref(), args.overrides())
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the shared watch context (filesystem, exclusion rules, command runner)
/// - `--dry-run` / `--once` short paths
/// - the watch loop
/// - SIGINT / SIGTERM / SIGHUP handling
///
/// Returns once a termination signal has been received.
pub async fn run(args: &CliArgs, config: WatchConfig) -> Result<()> {
    let ctx = Arc::new(WatchContext::production(config));

    if args.dry_run {
        print_dry_run(&ctx).await?;
        return Ok(());
    }

    let watch_loop = WatchLoop::new(Arc::clone(&ctx));

    if args.once {
        let report = watch_loop.run_once().await?;
        debug!(?report, "single scan cycle finished");
        return Ok(());
    }

    let shutdown = shutdown_signal()?;
    watch_loop.run(shutdown).await
}

/// Simple dry-run output: print the effective settings and the files the
/// next scan would look at.
async fn print_dry_run(ctx: &Arc<WatchContext>) -> Result<()> {
    let config = ctx.config();
    println!("watcher-daemon dry-run");
    println!("  base_path   = {}", slash_path(&config.base_path));
    println!("  extension   = {}", config.extension);
    println!("  excluded    = {:?}", config.exclusions);
    println!("  frequency   = {:?}", config.frequency);
    println!("  command     = {}", config.command);
    if config.command.is_shell() {
        println!("  shell       = true");
    }
    if !config.check_delay.is_zero() {
        println!("  check_delay = {:?}", config.check_delay);
    }
    println!();

    let files = ctx.collect_files_blocking().await?;
    println!("watched files ({}):", files.len());
    for file in &files {
        println!("  - {}", file.path_str());
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
