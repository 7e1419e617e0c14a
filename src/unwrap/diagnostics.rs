//! Single-URL diagnostics.

use crate::error_handling::{ProcessingStats, UnwrapError};
use crate::fetch::{ResolveLink, Resolution};
use crate::links::has_query_params;
use crate::unwrap::outcome::resolve_counted;
use crate::unwrap::types::{FinalSummary, RedirectChain, TestUrlReport, UrlSummary};

/// Resolves `url` and reports the full trace without persisting anything.
///
/// # Errors
///
/// [`UnwrapError::InvalidRequest`] for a blank URL and
/// [`UnwrapError::Resolve`] for one that is not an absolute http(s) URL.
pub async fn test_url<R: ResolveLink>(
    resolver: &R,
    stats: &ProcessingStats,
    url: &str,
) -> Result<TestUrlReport, UnwrapError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UnwrapError::InvalidRequest("url is required".to_string()));
    }

    let resolution = resolve_counted(resolver, stats, url).await?;
    Ok(build_report(resolution))
}

fn build_report(resolution: Resolution) -> TestUrlReport {
    let redirects = resolution
        .steps
        .iter()
        .filter(|step| step.redirect_kind.is_redirect())
        .count();

    let summary = match &resolution.error {
        Some(error) => format!(
            "Stopped after {} step(s) at {}: {error}",
            resolution.steps.len(),
            resolution.terminal_url
        ),
        None if redirects == 0 && !resolution.changed => {
            "No redirects; the URL resolves to itself".to_string()
        }
        None if redirects == 0 => format!(
            "No redirects; query parameters stripped to {}",
            resolution.final_url
        ),
        None => format!(
            "Followed {redirects} redirect(s) to {}{}",
            resolution.final_url,
            if has_query_params(&resolution.terminal_url) {
                " (query parameters stripped)"
            } else {
                ""
            }
        ),
    };

    TestUrlReport {
        original: UrlSummary {
            stripped: resolution.stripped_original,
            has_query_params: has_query_params(&resolution.original),
            url: resolution.original,
        },
        redirect_chain: RedirectChain {
            total_steps: resolution.steps.len(),
            total_time: resolution.total_elapsed_millis,
            error: resolution.error.as_ref().map(ToString::to_string),
            steps: resolution.steps,
        },
        final_url: FinalSummary {
            has_query_params: has_query_params(&resolution.terminal_url),
            url: resolution.terminal_url,
            stripped: resolution.final_url,
            changed: resolution.changed,
        },
        summary,
    }
}
