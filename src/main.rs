// src/main.rs

use prun::engine::FATAL_EXIT_CODE;
use prun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("prun error: {err:?}");
            std::process::exit(FATAL_EXIT_CODE);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    println!("prun v{}", env!("CARGO_PKG_VERSION"));

    let summary = run(args).await?;
    if !summary.is_success() {
        for failed in &summary.failed {
            eprintln!("  failed: {} ({})", failed.command, failed.failure);
        }
        println!("error: {} command(s) failed", summary.failure_count());
    }
    Ok(summary.exit_code())
}
