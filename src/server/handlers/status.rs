//! JSON status handler.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use strum::IntoEnumIterator;

use super::super::types::{AppState, CounterGroup, StatusResponse};
use crate::error_handling::{ErrorType, InfoType};

/// Resolver outcome counters since the server started
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let stats = &state.stats;
    let errors: BTreeMap<&'static str, usize> = ErrorType::iter()
        .map(|error| (error.as_str(), stats.get_error_count(error)))
        .collect();
    let info: BTreeMap<&'static str, usize> = InfoType::iter()
        .map(|info| (info.as_str(), stats.get_info_count(info)))
        .collect();

    Json(StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        errors: CounterGroup {
            total: stats.total_errors(),
            counts: errors,
        },
        info: CounterGroup {
            total: stats.total_info(),
            counts: info,
        },
    })
}
