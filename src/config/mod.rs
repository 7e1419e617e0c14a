//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, batch defaults)
//! - Library configuration with validation
//! - CLI option parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, GlobalOpts};
pub use constants::*;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel};
