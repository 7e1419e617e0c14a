//! Batch unwrapping over stored campaign and SMS records.
//!
//! One batch loads a page of each content type, resolves the pending links
//! of every loaded record one at a time, persists the results in a single
//! write pass and reports where the next batch should resume.

use log::{debug, info, warn};
use sqlx::SqlitePool;

use crate::config::MAX_PAGE_SIZE;
use crate::error_handling::{ErrorType, ProcessingStats, UnwrapError};
use crate::fetch::ResolveLink;
use crate::models::{BatchCursor, ContentKind};
use crate::storage::{count_pending, load_pending_page, save_link_updates, LinkRecord, LinkUpdate};
use crate::unwrap::outcome::{link_error_message, resolve_final_url};
use crate::unwrap::types::{BatchResult, BatchTotals, ContentBatchResult, RecordError};

pub(crate) fn validate_page_size(page_size: usize) -> Result<(), UnwrapError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(UnwrapError::InvalidRequest(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(())
}

/// Runs one batch starting after `cursor`.
///
/// Link failures are reported in the result and never abort the batch.
///
/// # Errors
///
/// Returns [`UnwrapError::InvalidRequest`] for a page size outside
/// `1..=MAX_PAGE_SIZE` and [`UnwrapError::Storage`] when records cannot be
/// read or written. On a write failure no record of the batch is updated.
pub async fn run_batch<R: ResolveLink>(
    pool: &SqlitePool,
    resolver: &R,
    stats: &ProcessingStats,
    cursor: &BatchCursor,
    page_size: usize,
) -> Result<BatchResult, UnwrapError> {
    validate_page_size(page_size)?;

    let email_cursor = cursor.last_processed_email_id.as_deref();
    let sms_cursor = cursor.last_processed_sms_id.as_deref();
    let email_page = load_pending_page(pool, ContentKind::Email, email_cursor, page_size).await?;
    let sms_page = load_pending_page(pool, ContentKind::Sms, sms_cursor, page_size).await?;
    let has_more = email_page.len() == page_size || sms_page.len() == page_size;

    debug!(
        "Loaded {} campaigns and {} SMS messages for unwrapping",
        email_page.len(),
        sms_page.len()
    );

    let mut updates = Vec::new();
    let emails = unwrap_page(resolver, stats, &email_page, email_cursor, &mut updates).await;
    let sms = unwrap_page(resolver, stats, &sms_page, sms_cursor, &mut updates).await;

    save_link_updates(pool, &updates).await?;

    let totals = BatchTotals {
        emails: count_pending(pool, ContentKind::Email).await?,
        sms: count_pending(pool, ContentKind::Sms).await?,
    };

    let message = format!(
        "Processed {} emails and {} SMS messages, unwrapped {} links with {} errors; {} emails and {} SMS messages still pending",
        emails.processed,
        sms.processed,
        emails.links_unwrapped + sms.links_unwrapped,
        emails.errors.len() + sms.errors.len(),
        totals.emails,
        totals.sms,
    );
    info!("{message}");

    Ok(BatchResult {
        emails,
        sms,
        totals,
        has_more,
        message,
    })
}

/// Runs batches from the beginning until a batch reports nothing more.
///
/// Each batch resumes after the previous one, so every pending record is
/// visited once per call even when some of its links keep failing.
pub async fn run_all_batches<R: ResolveLink>(
    pool: &SqlitePool,
    resolver: &R,
    stats: &ProcessingStats,
    page_size: usize,
) -> Result<Vec<BatchResult>, UnwrapError> {
    let mut results = Vec::new();
    let mut cursor = BatchCursor::start();
    loop {
        let result = run_batch(pool, resolver, stats, &cursor, page_size).await?;
        cursor = result.next_cursor();
        let has_more = result.has_more;
        results.push(result);
        if !has_more {
            return Ok(results);
        }
    }
}

async fn unwrap_page<R: ResolveLink>(
    resolver: &R,
    stats: &ProcessingStats,
    records: &[LinkRecord],
    cursor: Option<&str>,
    updates: &mut Vec<LinkUpdate>,
) -> ContentBatchResult {
    let mut result = ContentBatchResult {
        processed: records.len(),
        last_id: records
            .last()
            .map(|record| record.id.clone())
            .or_else(|| cursor.map(str::to_string)),
        ..Default::default()
    };

    for record in records {
        let mut links = match record.decode_links() {
            Ok(links) => links,
            Err(e) => {
                warn!("Skipping {} {}: unreadable link list: {e}", record.kind.table(), record.id);
                stats.increment_error(ErrorType::InvalidLinkList);
                result
                    .errors
                    .push(RecordError::new(record, format!("invalid link list: {e}")));
                continue;
            }
        };

        let mut unwrapped = 0;
        for link in links.iter_mut().filter(|link| link.needs_unwrap()) {
            match resolve_final_url(resolver, stats, &link.url).await {
                Ok(final_url) => {
                    debug!("{} -> {final_url}", link.url);
                    link.final_url = Some(final_url);
                    unwrapped += 1;
                }
                Err(e) => {
                    warn!("Failed to unwrap {} in {}: {e}", link.url, record.id);
                    result
                        .errors
                        .push(RecordError::new(record, link_error_message(&link.url, &e)));
                }
            }
        }

        if unwrapped > 0 {
            result.links_unwrapped += unwrapped;
            updates.push(LinkUpdate {
                kind: record.kind,
                id: record.id.clone(),
                links,
            });
        }
    }

    result
}
