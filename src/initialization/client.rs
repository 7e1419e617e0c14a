//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the HTTP client used for redirect resolution.
///
/// Redirect following is disabled so each hop can be recorded and the chain
/// capped by the resolver itself. The per-hop timeout is applied per request
/// by the resolver; the client-level timeout is a backstop at the same value.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(
            TCP_CONNECT_TIMEOUT_SECS.min(config.timeout_seconds),
        ))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
