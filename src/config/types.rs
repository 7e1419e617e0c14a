//! Configuration types.
//!
//! This module defines the library configuration and the enums shared with
//! command-line parsing.

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

use crate::config::constants::{
    DB_PATH, DEFAULT_PAGE_SIZE, DEFAULT_SERVER_PORT, DEFAULT_USER_AGENT, MAX_PAGE_SIZE,
    MAX_REDIRECT_HOPS, PER_HOP_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line for log shippers
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration.
///
/// Built from CLI flags by the binary, or constructed directly when the crate
/// is embedded.
///
/// # Examples
///
/// ```no_run
/// use rip_unwrap::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("campaigns.db"),
///     max_redirects: 5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Per-hop request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum number of hops followed per link
    pub max_redirects: usize,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Records loaded per content type in one batch
    pub page_size: usize,

    /// Port for the HTTP API
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            timeout_seconds: PER_HOP_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECT_HOPS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is accepted instead
    pub message: String,
}

impl Config {
    /// Checks value ranges before any resource is initialized.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.max_redirects == 0 {
            return Err(ConfigValidationError {
                field: "max_redirects",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigValidationError {
                field: "page_size",
                message: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "user_agent",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.db_path, PathBuf::from("./rip_unwrap.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "timeout_seconds");
        assert!(err.message.contains("greater than 0"));
    }

    #[test]
    fn test_validate_rejects_zero_max_redirects() {
        let config = Config {
            max_redirects: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "max_redirects");
    }

    #[test]
    fn test_validate_page_size_bounds() {
        for page_size in [0, MAX_PAGE_SIZE + 1] {
            let config = Config {
                page_size,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.field, "page_size");
            assert!(err.message.contains("between 1 and"));
        }

        let config = Config {
            page_size: MAX_PAGE_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "user_agent",
            message: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid user_agent: must not be empty");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
