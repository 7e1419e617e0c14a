//! Resolution with outcome counting.

use crate::error_handling::{truncate_error_message, InfoType, ProcessingStats, ResolveError};
use crate::fetch::{ResolveLink, Resolution};
use crate::models::RedirectKind;

/// Resolves `url` and records hop classifications and the outcome in `stats`.
///
/// Malformed input comes back as `Err`; every other failure is inside the
/// returned [`Resolution`].
pub(crate) async fn resolve_counted<R: ResolveLink>(
    resolver: &R,
    stats: &ProcessingStats,
    url: &str,
) -> Result<Resolution, ResolveError> {
    let resolution = resolver
        .resolve(url)
        .await
        .inspect_err(|e| stats.increment_error(e.error_type()))?;

    for step in &resolution.steps {
        match step.redirect_kind {
            RedirectKind::Permanent => stats.increment_info(InfoType::PermanentRedirect),
            RedirectKind::Temporary => stats.increment_info(InfoType::TemporaryRedirect),
            RedirectKind::MetaRefresh => stats.increment_info(InfoType::MetaRefresh),
            RedirectKind::Terminal | RedirectKind::Error => {}
        }
    }

    match &resolution.error {
        Some(error) => stats.increment_error(error.error_type()),
        None if resolution.changed => stats.increment_info(InfoType::LinkUnwrapped),
        None => stats.increment_info(InfoType::LinkUnchanged),
    }

    Ok(resolution)
}

/// Resolves `url` to the value written as a link's final URL.
///
/// Any failure, including a chain cut short, is an `Err` here: partial
/// results are never persisted.
pub(crate) async fn resolve_final_url<R: ResolveLink>(
    resolver: &R,
    stats: &ProcessingStats,
    url: &str,
) -> Result<String, ResolveError> {
    let resolution = resolve_counted(resolver, stats, url).await?;
    match resolution.error {
        Some(error) => Err(error),
        None => Ok(resolution.final_url),
    }
}

/// Message stored for a failed link.
pub(crate) fn link_error_message(url: &str, error: &ResolveError) -> String {
    truncate_error_message(&format!("{url}: {error}"))
}
