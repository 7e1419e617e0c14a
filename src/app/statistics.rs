//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::unwrap::BatchResult;

/// Logs every non-zero resolver counter.
pub fn print_unwrap_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    let total_info = stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

/// One-line summary across a run of batches.
pub fn summarize_batches(results: &[BatchResult]) -> String {
    let processed: usize = results
        .iter()
        .map(|r| r.emails.processed + r.sms.processed)
        .sum();
    let unwrapped: usize = results
        .iter()
        .map(|r| r.emails.links_unwrapped + r.sms.links_unwrapped)
        .sum();
    let errors: usize = results.iter().map(BatchResult::total_errors).sum();
    let remaining = results
        .last()
        .map(|r| r.totals.emails + r.totals.sms)
        .unwrap_or(0);

    format!(
        "{} batch{}: {processed} records processed, {unwrapped} links unwrapped, {errors} errors, {remaining} records still pending",
        results.len(),
        if results.len() == 1 { "" } else { "es" },
    )
}
