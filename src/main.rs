//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `rip_unwrap` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use rip_unwrap::config::{Cli, Command};
use rip_unwrap::initialization::init_logger_with;
use rip_unwrap::server::{start_server, AppState};
use rip_unwrap::{
    open_store, print_unwrap_statistics, run_all_batches, run_batch, summarize_batches, test_url,
    unwrap_record, BatchCursor, Config, HttpResolver, ProcessingStats,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();
    if let Err(e) = config.validate() {
        eprintln!("rip_unwrap: {e}");
        process::exit(2);
    }

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli.command, config).await {
        eprintln!("rip_unwrap error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

async fn run(command: Command, config: Config) -> Result<()> {
    let resolver = HttpResolver::from_config(&config).context("Failed to build HTTP client")?;

    match command {
        Command::Serve { .. } => {
            let pool = open_store(&config.db_path).await?;
            start_server(config.port, AppState::new(pool, resolver, config.page_size)).await
        }
        Command::Batch {
            page_size,
            last_email_id,
            last_sms_id,
            all,
        } => {
            let pool = open_store(&config.db_path).await?;
            let stats = ProcessingStats::new();
            if all {
                let results = run_all_batches(&pool, &resolver, &stats, page_size).await?;
                print_unwrap_statistics(&stats);
                println!("✅ {}", summarize_batches(&results));
            } else {
                let cursor = BatchCursor {
                    last_processed_email_id: last_email_id,
                    last_processed_sms_id: last_sms_id,
                };
                let result = run_batch(&pool, &resolver, &stats, &cursor, page_size).await?;
                print_unwrap_statistics(&stats);
                print_json(&result)?;
            }
            Ok(())
        }
        Command::TestUrl { url } => {
            let report = test_url(&resolver, &ProcessingStats::new(), &url).await?;
            print_json(&report)
        }
        Command::UnwrapRecord { id } => {
            let pool = open_store(&config.db_path).await?;
            let report = unwrap_record(&pool, &resolver, &ProcessingStats::new(), &id).await?;
            print_json(&report)
        }
    }
}
