//! rip_unwrap library: call-to-action link unwrapping for campaign tracking
//!
//! Campaign emails and SMS messages carry tracking links that bounce through
//! redirectors before reaching the real destination. This library follows
//! those chains hop by hop, strips query strings from the destination, and
//! stores the result next to each original link.
//!
//! # Example
//!
//! ```no_run
//! use rip_unwrap::{open_store, run_batch, BatchCursor, Config, HttpResolver, ProcessingStats};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let pool = open_store(&config.db_path).await?;
//! let resolver = HttpResolver::from_config(&config)?;
//! let stats = ProcessingStats::new();
//!
//! let result = run_batch(&pool, &resolver, &stats, &BatchCursor::start(), config.page_size).await?;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod links;
pub mod models;
pub mod server;
pub mod storage;
mod unwrap;
mod utils;

// Re-export public API
pub use app::{open_store, print_unwrap_statistics, summarize_batches};
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, ErrorType, InfoType, InitializationError, ProcessingStats, ResolveError,
    UnwrapError,
};
pub use fetch::{parse_candidate, resolve_link, HttpResolver, ResolveLink, Resolution};
pub use models::{BatchCursor, ContentKind, Link, LinkType, RedirectKind, RedirectStep};
pub use storage::run_migrations;
pub use unwrap::{
    run_all_batches, run_batch, test_url, unwrap_record, BatchResult, BatchTotals,
    ContentBatchResult, FinalSummary, LinkReport, RecordError, RecordUnwrapReport, RedirectChain,
    TestUrlReport, UrlSummary,
};
