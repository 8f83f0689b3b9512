// src/cli.rs

//! CLI argument parsing using `clap`.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::config::default_manifest_path;
use crate::types::RunOptions;

/// Command-line arguments for `prun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prun",
    version,
    about = "Run the commands listed in a manifest, a few at a time.",
    long_about = None
)]
pub struct CliArgs {
    /// Number of commands to run at a time.
    #[arg(short = 'n', long, value_name = "N", default_value = "4")]
    pub concurrency: NonZeroUsize,

    /// Path to the command manifest (JSON, or TOML if it ends in `.toml`).
    #[arg(long, value_name = "PATH", default_value_os_t = default_manifest_path())]
    pub manifest: PathBuf,

    /// Per-command timeout, e.g. `90s`, `30m`, `2h`, or bare seconds.
    #[arg(
        long,
        value_name = "DURATION",
        default_value = "30m",
        value_parser = parse_duration
    )]
    pub timeout: Duration,

    /// Logging level for prun's own diagnostics (error, warn, info, debug, trace).
    ///
    /// If omitted, `PRUN_LOG` directives apply, falling back to `warn`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load the manifest and print the commands, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Extra arguments appended to every command.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra_args: Vec<String>,
}

impl CliArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            concurrency: self.concurrency,
            timeout: self.timeout,
            extra_args: self.extra_args.clone(),
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Parse `<number><unit>` with unit `ms`, `s`, `m` or `h`; a bare number is
/// taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let dur = match unit.as_str() {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    if dur.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(dur)
}
