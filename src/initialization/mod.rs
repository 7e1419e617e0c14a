//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The redirect-less HTTP client
//! - The logger
//!
//! The database pool lives in `storage`.

mod client;
mod logger;

pub use client::init_redirect_client;
pub use logger::init_logger_with;
