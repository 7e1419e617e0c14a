//! Application glue shared by the binary and embedders.
//!
//! Opening the store and reporting statistics at the end of a CLI run.

pub mod statistics;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::storage::{init_db_pool_with_path, run_migrations};

pub use statistics::{print_unwrap_statistics, summarize_batches};

/// Opens (creating if needed) the SQLite store at `db_path` and applies
/// pending migrations.
pub async fn open_store(db_path: &Path) -> Result<Arc<SqlitePool>> {
    let pool = init_db_pool_with_path(db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(pool)
}
