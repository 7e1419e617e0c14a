//! Error type definitions.
//!
//! This module defines the error enums used throughout the crate and the
//! counter keys tracked by [`super::ProcessingStats`].

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database setup.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Why a single link could not be fully resolved.
///
/// Only `MalformedUrl` is ever returned as an `Err` from the resolver; the
/// other variants travel inside a [`crate::Resolution`] next to the
/// best-effort URL that was reached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("timed out fetching {url} after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("network error fetching {url}: {message}")]
    NetworkError { url: String, message: String },

    #[error("redirect loop: {0} was already visited")]
    RedirectLoop(String),

    #[error("too many redirects: gave up after {0} hops")]
    TooManyRedirects(usize),
}

// Reported to operators as its message.
impl serde::Serialize for ResolveError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ResolveError {
    /// Counter key for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ResolveError::MalformedUrl(_) => ErrorType::MalformedUrl,
            ResolveError::Timeout { .. } => ErrorType::Timeout,
            ResolveError::NetworkError { .. } => ErrorType::NetworkError,
            ResolveError::RedirectLoop(_) => ErrorType::RedirectLoop,
            ResolveError::TooManyRedirects(_) => ErrorType::TooManyRedirects,
        }
    }
}

/// Failures of the unwrap operations as a whole.
#[derive(Error, Debug)]
pub enum UnwrapError {
    /// Campaign or SMS records could not be read or written. Fatal for a batch.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// No campaign, SMS message or share link matched the identifier.
    #[error("no record found for {0}")]
    NotFound(String),

    /// The caller supplied something unusable (bad page size, empty id, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Link-level failures counted during unwrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    MalformedUrl,
    Timeout,
    NetworkError,
    RedirectLoop,
    TooManyRedirects,
    // Stored link list could not be decoded
    InvalidLinkList,
}

/// Informational counters: how hops were classified and what happened to
/// each link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    PermanentRedirect,
    TemporaryRedirect,
    MetaRefresh,
    LinkUnwrapped,
    LinkUnchanged,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MalformedUrl => "Malformed URL",
            ErrorType::Timeout => "Hop timeout",
            ErrorType::NetworkError => "Network error",
            ErrorType::RedirectLoop => "Redirect loop",
            ErrorType::TooManyRedirects => "Too many redirects",
            ErrorType::InvalidLinkList => "Invalid stored link list",
        }
    }
}

impl std::fmt::Display for InfoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::PermanentRedirect => "Permanent redirect hop",
            InfoType::TemporaryRedirect => "Temporary redirect hop",
            InfoType::MetaRefresh => "Meta-refresh hop",
            InfoType::LinkUnwrapped => "Link unwrapped",
            InfoType::LinkUnchanged => "Link already final",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_resolve_error_maps_to_error_type() {
        let cases = [
            (
                ResolveError::MalformedUrl("x".into()),
                ErrorType::MalformedUrl,
            ),
            (
                ResolveError::Timeout {
                    url: "https://a.test/".into(),
                    seconds: 30,
                },
                ErrorType::Timeout,
            ),
            (
                ResolveError::NetworkError {
                    url: "https://a.test/".into(),
                    message: "connection refused".into(),
                },
                ErrorType::NetworkError,
            ),
            (
                ResolveError::RedirectLoop("https://a.test/".into()),
                ErrorType::RedirectLoop,
            ),
            (ResolveError::TooManyRedirects(10), ErrorType::TooManyRedirects),
        ];
        for (error, expected) in cases {
            assert_eq!(error.error_type(), expected);
        }
    }

    #[test]
    fn test_resolve_error_messages() {
        let err = ResolveError::Timeout {
            url: "https://slow.test/".into(),
            seconds: 30,
        };
        assert_eq!(err.to_string(), "timed out fetching https://slow.test/ after 30s");
        assert_eq!(
            ResolveError::TooManyRedirects(10).to_string(),
            "too many redirects: gave up after 10 hops"
        );
    }

    #[test]
    fn test_every_type_has_a_label() {
        for error_type in ErrorType::iter() {
            assert!(!error_type.as_str().is_empty());
            assert_eq!(error_type.to_string(), error_type.as_str());
        }
        for info_type in InfoType::iter() {
            assert!(!info_type.as_str().is_empty());
        }
    }

    #[test]
    fn test_unwrap_error_wraps_resolve_error() {
        let err = UnwrapError::from(ResolveError::MalformedUrl("nope".into()));
        assert_eq!(err.to_string(), "malformed URL: nope");
    }
}
