//! Error handling and unwrap statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, database, resolver, unwrap)
//! - Categorization of transport errors into the resolver taxonomy
//! - Thread-safe counters for link failures and hop classifications

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, error_chain_message, truncate_error_message};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ErrorType, InfoType, InitializationError, ResolveError, UnwrapError,
};
