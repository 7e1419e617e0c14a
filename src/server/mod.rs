//! HTTP API server.
//!
//! Unwrap endpoints:
//! - `POST /api/unwrap/batch` - one cursor-paged batch
//! - `POST /api/unwrap/test` - trace a single URL
//! - `POST /api/unwrap/record` - force-unwrap one record
//!
//! Plus campaign, SMS and share-link CRUD and a `/status` counter endpoint.

mod error;
mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;

use handlers::{
    batch_handler, create_campaign_handler, create_share_link_handler, create_sms_handler,
    get_campaign_handler, get_sms_handler, record_handler, status_handler, test_url_handler,
};

pub use error::ApiError;
pub use types::{AppState, StatusResponse};

/// Builds the API router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/unwrap/batch", post(batch_handler))
        .route("/api/unwrap/test", post(test_url_handler))
        .route("/api/unwrap/record", post(record_handler))
        .route("/api/campaigns", post(create_campaign_handler))
        .route("/api/campaigns/{id}", get(get_campaign_handler))
        .route("/api/sms", post(create_sms_handler))
        .route("/api/sms/{id}", get(get_sms_handler))
        .route("/api/share-links", post(create_share_link_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Binds `port` and serves the API until the process is stopped.
pub async fn start_server(port: u16, state: AppState) -> Result<(), anyhow::Error> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to port {}: {}", port, e))?;

    log::info!("API server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Unwrap: POST http://127.0.0.1:{}/api/unwrap/batch", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

    Ok(())
}
