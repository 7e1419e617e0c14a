//! Configuration constants.
//!
//! Timeouts, size limits, and batch defaults used by the resolver and the
//! batch orchestrator.

pub const DB_PATH: &str = "./rip_unwrap.db";

// Redirect handling
/// Maximum number of requests issued while following one redirect chain.
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Per-hop HTTP timeout in seconds
pub const PER_HOP_TIMEOUT_SECS: u64 = 30;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent string for HTTP requests.
///
/// Trackers frequently refuse or short-circuit obvious bot traffic, so hops are
/// requested with a desktop Chrome identity. Override with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Largest HTML body (512KB) scanned for a meta-refresh or script redirect.
/// Bigger documents are treated as terminal without reading the body.
pub const MAX_META_REFRESH_BODY_SIZE: usize = 512 * 1024;

// Batch orchestration
/// Records loaded per content type per batch when the caller gives no page size
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound accepted for a caller-supplied page size
pub const MAX_PAGE_SIZE: usize = 100;

// Error message limits
/// Maximum error message length in characters (500 chars)
/// Keeps batch responses bounded when a transport error carries a long chain
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

// Status server
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// Record identifiers
/// Length of the random suffix appended to generated record ids
pub const ID_RANDOM_SUFFIX_LENGTH: usize = 12;
/// Length of generated share-link tokens
pub const SHARE_TOKEN_LENGTH: usize = 20;
