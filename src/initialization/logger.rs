//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// `RUST_LOG` is read first; the provided `level` then overrides it for this
/// crate and as the global default.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=rip_unwrap=debug,reqwest=info rip_unwrap batch
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("sqlx", LevelFilter::Warn);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rip_unwrap", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let (tag, label) = match level {
                    log::Level::Error => ("❌", "ERROR".red().bold()),
                    log::Level::Warn => ("⚠️", "WARN".yellow()),
                    log::Level::Info => ("✔️", "INFO".green()),
                    log::Level::Debug => ("🔍", "DEBUG".blue()),
                    log::Level::Trace => ("🔬", "TRACE".purple()),
                };
                writeln!(
                    buf,
                    "{} {} {} {} {}",
                    tag,
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    label,
                    short_target(record.target()).cyan(),
                    record.args()
                )
            });
        }
    }

    // try_init: tests may initialize more than once per process
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Drops the crate prefix so `rip_unwrap::fetch::redirects` logs as
/// `fetch::redirects`. Dependency targets are left alone.
fn short_target(target: &str) -> &str {
    target.strip_prefix("rip_unwrap::").unwrap_or(target)
}

fn json_line(record: &log::Record<'_>) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}
