//! Result types returned by the unwrap operations.

use serde::Serialize;

use crate::models::{BatchCursor, ContentKind, RedirectStep};
use crate::storage::LinkRecord;

/// One per-link (or per-record) failure reported in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    pub record_id: String,
    /// Subject for campaigns, phone number for SMS messages
    pub identifying_field: String,
    pub error: String,
}

impl RecordError {
    pub(crate) fn new(record: &LinkRecord, error: String) -> Self {
        Self {
            record_id: record.id.clone(),
            identifying_field: record.identifying_field.clone(),
            error,
        }
    }
}

/// Outcome for one content type within a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBatchResult {
    /// Records loaded for this page
    pub processed: usize,
    pub links_unwrapped: usize,
    pub errors: Vec<RecordError>,
    /// Resume point for the next batch
    pub last_id: Option<String>,
}

/// Records still needing processing across the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub emails: u64,
    pub sms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub emails: ContentBatchResult,
    pub sms: ContentBatchResult,
    pub totals: BatchTotals,
    pub has_more: bool,
    pub message: String,
}

impl BatchResult {
    /// Cursor that resumes after this batch.
    pub fn next_cursor(&self) -> BatchCursor {
        BatchCursor {
            last_processed_email_id: self.emails.last_id.clone(),
            last_processed_sms_id: self.sms.last_id.clone(),
        }
    }

    pub fn total_errors(&self) -> usize {
        self.emails.errors.len() + self.sms.errors.len()
    }
}

/// A URL with its query string split off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSummary {
    pub url: String,
    pub stripped: String,
    pub has_query_params: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectChain {
    pub steps: Vec<RedirectStep>,
    pub total_steps: usize,
    /// Milliseconds across all hops
    pub total_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSummary {
    /// Terminal URL as reached, query string intact
    pub url: String,
    pub stripped: String,
    pub has_query_params: bool,
    pub changed: bool,
}

/// Diagnostic trace for a single URL. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestUrlReport {
    pub original: UrlSummary,
    pub redirect_chain: RedirectChain,
    #[serde(rename = "final")]
    pub final_url: FinalSummary,
    pub summary: String,
}

/// Before/after for one link of a forced single-record unwrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub url: String,
    pub before: Option<String>,
    pub after: Option<String>,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUnwrapReport {
    pub record_id: String,
    pub kind: ContentKind,
    pub links: Vec<LinkReport>,
    pub links_unwrapped: usize,
}
