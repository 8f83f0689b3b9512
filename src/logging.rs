// src/logging.rs

//! Diagnostics for prun itself, via `tracing`.
//!
//! `--log-level` wins when given. Otherwise `PRUN_LOG` is read as a filter
//! directive string, so both `debug` and `prun::exec=trace,info` work. With
//! neither set, only warnings and errors are shown.
//!
//! Command output never goes through here; workers write it as labeled
//! records (see `exec::sink`).

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "PRUN_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Install the global subscriber, writing to stderr.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli_level.is_some_and(|lvl| LevelFilter::from(lvl) >= LevelFilter::DEBUG))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

/// Unparsable `PRUN_LOG` directives are dropped rather than failing startup.
fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    let (default, directives) = match cli_level {
        Some(lvl) => (LevelFilter::from(lvl), ""),
        None => (DEFAULT_LEVEL, env.unwrap_or_default().trim()),
    };

    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives)
}
