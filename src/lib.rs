// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Manifest, load_and_validate};
use crate::engine::{DispatchOptions, Dispatcher, RunSummary};
use crate::exec::{Console, ProcessRunner};
use crate::types::RunOptions;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading (fatal on failure)
/// - the process runner and its labeled console sinks
/// - the worker pool and result aggregation
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let manifest = load_and_validate(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    let options = args.run_options();

    if args.dry_run {
        print_dry_run(&manifest, &options);
        return Ok(RunSummary::empty());
    }

    Ok(run_manifest(manifest, &options, Console::stdio()).await)
}

/// Run every command of an already-loaded manifest, logging to `console`.
pub async fn run_manifest(
    manifest: Manifest,
    options: &RunOptions,
    console: Console,
) -> RunSummary {
    info!(
        commands = manifest.len(),
        concurrency = options.concurrency.get(),
        timeout_secs = options.timeout.as_secs_f64(),
        "starting run"
    );

    let runner = ProcessRunner::new(console, options.timeout);
    let dispatcher = Dispatcher::new(runner, DispatchOptions::from(options));
    dispatcher.run(manifest.into_commands()).await
}

/// Simple dry-run output: the resolved commands, in dispatch order.
fn print_dry_run(manifest: &Manifest, options: &RunOptions) {
    println!("prun dry-run");
    println!("  concurrency = {}", options.concurrency);
    println!("  timeout = {}s", options.timeout.as_secs_f64());
    println!();

    println!("commands ({}):", manifest.len());
    for cmd in manifest.commands() {
        let resolved = cmd.clone().with_extra_args(&options.extra_args);
        println!("  - {resolved}");
    }

    debug!("dry-run complete (no execution)");
}
