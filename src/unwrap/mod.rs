//! Link unwrapping over stored records.
//!
//! - `batch`: cursor-paged unwrapping of pending campaign and SMS links
//! - `record`: forced re-resolution of one record's links
//! - `diagnostics`: trace of a single URL, nothing persisted

mod batch;
mod diagnostics;
mod outcome;
mod record;
mod types;

pub use batch::{run_all_batches, run_batch};
pub use diagnostics::test_url;
pub use record::unwrap_record;
pub use types::{
    BatchResult, BatchTotals, ContentBatchResult, FinalSummary, LinkReport, RecordError,
    RecordUnwrapReport, RedirectChain, TestUrlReport, UrlSummary,
};
