//! API server state and request/response bodies.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error_handling::ProcessingStats;
use crate::fetch::HttpResolver;

/// Shared state for the API server
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<SqlitePool>,
    pub resolver: Arc<HttpResolver>,
    pub stats: Arc<ProcessingStats>,
    /// Page size used when a batch request omits `pageSize`
    pub default_page_size: usize,
    pub start_time: Arc<Instant>,
}

impl AppState {
    pub fn new(pool: Arc<SqlitePool>, resolver: HttpResolver, default_page_size: usize) -> Self {
        Self {
            pool,
            resolver: Arc::new(resolver),
            stats: Arc::new(ProcessingStats::new()),
            default_page_size,
            start_time: Arc::new(Instant::now()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default)]
    pub last_email_id: Option<String>,
    #[serde(default)]
    pub last_sms_id: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestUrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSmsRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareLinkRequest {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub sms_id: Option<String>,
}

/// JSON response for `/status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub errors: CounterGroup,
    pub info: CounterGroup,
}

#[derive(Debug, Serialize)]
pub struct CounterGroup {
    pub total: usize,
    pub counts: BTreeMap<&'static str, usize>,
}
