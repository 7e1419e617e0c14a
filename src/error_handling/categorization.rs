//! Error categorization.
//!
//! Maps transport failures from `reqwest` onto the resolver's error
//! taxonomy and truncates messages before they are reported.

use std::error::Error as StdError;
use std::time::Duration;

use super::types::ResolveError;
use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Categorizes a `reqwest::Error` raised while fetching `url`.
///
/// Timeouts become [`ResolveError::Timeout`]; everything else (DNS failure,
/// refused connection, TLS failure, body read failure) becomes
/// [`ResolveError::NetworkError`] carrying the full source chain, because
/// reqwest's own message is usually just "error sending request".
pub fn categorize_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    per_hop_timeout: Duration,
) -> ResolveError {
    if error.is_timeout() {
        return ResolveError::Timeout {
            url: url.to_string(),
            seconds: per_hop_timeout.as_secs(),
        };
    }
    ResolveError::NetworkError {
        url: url.to_string(),
        message: error_chain_message(error),
    }
}

/// Joins an error and its sources with `": "`.
pub fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters,
/// noting the original length.
pub fn truncate_error_message(message: &str) -> String {
    let length = message.chars().count();
    if length <= MAX_ERROR_MESSAGE_LENGTH {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
    format!("{truncated}... (truncated, {length} chars)")
}
