//! Forced unwrapping of a single record.

use log::{info, warn};
use sqlx::SqlitePool;

use crate::error_handling::{ProcessingStats, UnwrapError};
use crate::fetch::ResolveLink;
use crate::storage::{find_link_record, save_link_updates, LinkUpdate};
use crate::unwrap::outcome::{link_error_message, resolve_final_url};
use crate::unwrap::types::{LinkReport, RecordUnwrapReport};

/// Re-resolves every link of one record, including links that already have
/// a final URL, and persists the successful results.
///
/// `id` may be a campaign id, an SMS id or a share token.
///
/// # Errors
///
/// - [`UnwrapError::InvalidRequest`] for a blank id or a stored link list
///   that cannot be decoded
/// - [`UnwrapError::NotFound`] when nothing matches `id`
/// - [`UnwrapError::Storage`] on read or write failure
pub async fn unwrap_record<R: ResolveLink>(
    pool: &SqlitePool,
    resolver: &R,
    stats: &ProcessingStats,
    id: &str,
) -> Result<RecordUnwrapReport, UnwrapError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(UnwrapError::InvalidRequest("id is required".to_string()));
    }

    let record = find_link_record(pool, id)
        .await?
        .ok_or_else(|| UnwrapError::NotFound(id.to_string()))?;
    let mut links = record.decode_links().map_err(|e| {
        UnwrapError::InvalidRequest(format!("record {} has an invalid link list: {e}", record.id))
    })?;

    let mut reports = Vec::with_capacity(links.len());
    let mut unwrapped = 0;
    for link in &mut links {
        let before = link.final_url.clone();
        let error = match resolve_final_url(resolver, stats, &link.url).await {
            Ok(final_url) => {
                link.final_url = Some(final_url);
                unwrapped += 1;
                None
            }
            Err(e) => {
                warn!("Failed to unwrap {} in {}: {e}", link.url, record.id);
                Some(link_error_message(&link.url, &e))
            }
        };
        reports.push(LinkReport {
            url: link.url.clone(),
            changed: link.final_url != before,
            after: link.final_url.clone(),
            before,
            error,
        });
    }

    if unwrapped > 0 {
        save_link_updates(
            pool,
            &[LinkUpdate {
                kind: record.kind,
                id: record.id.clone(),
                links,
            }],
        )
        .await?;
    }

    info!(
        "Unwrapped {unwrapped} of {} links in {} {}",
        reports.len(),
        record.kind.table(),
        record.id
    );

    Ok(RecordUnwrapReport {
        record_id: record.id,
        kind: record.kind,
        links: reports,
        links_unwrapped: unwrapped,
    })
}
