//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage and unwrap tests.

#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a campaign with a fixed id and a raw `links` column value.
/// Lets tests control ordering and store malformed link lists.
#[cfg(test)]
pub async fn insert_raw_campaign(pool: &SqlitePool, id: &str, subject: &str, links_json: &str) {
    sqlx::query(
        "INSERT INTO campaigns (id, subject, sender, body, links, created_at)
         VALUES (?, ?, 'Test Sender', '', ?, 1704067200000)",
    )
    .bind(id)
    .bind(subject)
    .bind(links_json)
    .execute(pool)
    .await
    .expect("Failed to insert test campaign");
}

/// Inserts an SMS message with a fixed id and a raw `links` column value.
#[cfg(test)]
pub async fn insert_raw_sms(pool: &SqlitePool, id: &str, phone_number: &str, links_json: &str) {
    sqlx::query(
        "INSERT INTO sms_messages (id, phone_number, message, links, created_at)
         VALUES (?, ?, '', ?, 1704067200000)",
    )
    .bind(id)
    .bind(phone_number)
    .bind(links_json)
    .execute(pool)
    .await
    .expect("Failed to insert test SMS message");
}
