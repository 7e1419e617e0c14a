// Shared test helpers for database setup and mock HTTP servers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;

use rip_unwrap::initialization::init_redirect_client;
use rip_unwrap::{run_migrations, Config, HttpResolver};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Serves `app` on an ephemeral local port and returns its base URL
/// (no trailing slash).
#[allow(dead_code)]
pub async fn start_mock_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read mock server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

/// Builds an HTTP resolver with the given limits.
#[allow(dead_code)]
pub fn test_resolver(max_redirects: usize, per_hop_timeout: Duration) -> HttpResolver {
    let config = Config {
        timeout_seconds: per_hop_timeout.as_secs().max(1),
        max_redirects,
        ..Default::default()
    };
    let client = init_redirect_client(&config).expect("Failed to build HTTP client");
    HttpResolver::new(client, max_redirects, per_hop_timeout)
}

/// Returns a local URL nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to read probe address");
    drop(listener);
    format!("http://{}/gone", addr)
}

/// Inserts a campaign with a fixed id and raw link list.
#[allow(dead_code)]
pub async fn insert_campaign_row(pool: &SqlitePool, id: &str, subject: &str, links_json: &str) {
    sqlx::query(
        "INSERT INTO campaigns (id, subject, sender, body, links, created_at)
         VALUES (?, ?, 'Test Sender', '', ?, 1704067200000)",
    )
    .bind(id)
    .bind(subject)
    .bind(links_json)
    .execute(pool)
    .await
    .expect("Failed to insert campaign");
}

/// Inserts an SMS message with a fixed id and raw link list.
#[allow(dead_code)]
pub async fn insert_sms_row(pool: &SqlitePool, id: &str, phone_number: &str, links_json: &str) {
    sqlx::query(
        "INSERT INTO sms_messages (id, phone_number, message, links, created_at)
         VALUES (?, ?, '', ?, 1704067200000)",
    )
    .bind(id)
    .bind(phone_number)
    .bind(links_json)
    .execute(pool)
    .await
    .expect("Failed to insert SMS message");
}

/// Reads back the stored link list of a campaign.
#[allow(dead_code)]
pub async fn campaign_links(pool: &SqlitePool, id: &str) -> serde_json::Value {
    let raw: String = sqlx::query_scalar("SELECT links FROM campaigns WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read campaign links");
    serde_json::from_str(&raw).expect("stored links should be JSON")
}

#[allow(dead_code)]
pub fn shared(pool: SqlitePool) -> Arc<SqlitePool> {
    Arc::new(pool)
}
