//! Link unwrapping endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::super::error::{json_body, ApiError};
use super::super::types::{AppState, BatchRequest, RecordRequest, TestUrlRequest};
use crate::models::BatchCursor;
use crate::unwrap::{run_batch, test_url, unwrap_record, BatchResult, RecordUnwrapReport, TestUrlReport};

/// POST /api/unwrap/batch
pub async fn batch_handler(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResult>, ApiError> {
    let request = json_body(body)?;
    let cursor = BatchCursor {
        last_processed_email_id: request.last_email_id,
        last_processed_sms_id: request.last_sms_id,
    };
    let page_size = request.page_size.unwrap_or(state.default_page_size);

    let result = run_batch(&state.pool, state.resolver.as_ref(), &state.stats, &cursor, page_size).await?;
    Ok(Json(result))
}

/// POST /api/unwrap/test
pub async fn test_url_handler(
    State(state): State<AppState>,
    body: Result<Json<TestUrlRequest>, JsonRejection>,
) -> Result<Json<TestUrlReport>, ApiError> {
    let request = json_body(body)?;
    let report = test_url(state.resolver.as_ref(), &state.stats, &request.url).await?;
    Ok(Json(report))
}

/// POST /api/unwrap/record
pub async fn record_handler(
    State(state): State<AppState>,
    body: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<Json<RecordUnwrapReport>, ApiError> {
    let request = json_body(body)?;
    let report = unwrap_record(&state.pool, state.resolver.as_ref(), &state.stats, &request.id).await?;
    Ok(Json(report))
}
