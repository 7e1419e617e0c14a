//! Queries behind link unwrapping.
//!
//! A record needs processing while any of its links has no `finalUrl` or a
//! `finalUrl` equal to its `url`. The predicate runs inside SQLite over the
//! JSON link list; records whose list is not valid JSON are also returned so
//! the orchestrator can report them.

use sqlx::{Row, SqlitePool};

use crate::models::{ContentKind, Link};
use crate::storage::records::{encode_links, find_share_target};

/// A campaign or SMS row as seen by the unwrap pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub kind: ContentKind,
    pub id: String,
    /// Subject for campaigns, phone number for SMS messages
    pub identifying_field: String,
    pub links_json: String,
}

impl LinkRecord {
    pub fn decode_links(&self) -> Result<Vec<Link>, serde_json::Error> {
        serde_json::from_str(&self.links_json)
    }
}

/// New link list for one record, written by [`save_link_updates`].
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub kind: ContentKind,
    pub id: String,
    pub links: Vec<Link>,
}

fn needs_processing_predicate(table: &str) -> String {
    format!(
        "(json_valid({table}.links) = 0 OR EXISTS (
            SELECT 1 FROM json_each(CASE WHEN json_valid({table}.links) THEN {table}.links ELSE '[]' END) AS l
            WHERE l.type = 'object'
              AND (json_extract(l.value, '$.finalUrl') IS NULL
                   OR json_extract(l.value, '$.finalUrl') = json_extract(l.value, '$.url'))))"
    )
}

fn row_to_record(kind: ContentKind, row: &sqlx::sqlite::SqliteRow) -> Result<LinkRecord, sqlx::Error> {
    Ok(LinkRecord {
        kind,
        id: row.try_get("id")?,
        identifying_field: row.try_get("identifying_field")?,
        links_json: row.try_get("links")?,
    })
}

/// Loads up to `limit` records of `kind` that need processing and whose id
/// sorts after `after`, in id order.
pub async fn load_pending_page(
    pool: &SqlitePool,
    kind: ContentKind,
    after: Option<&str>,
    limit: usize,
) -> Result<Vec<LinkRecord>, sqlx::Error> {
    let table = kind.table();
    let query = format!(
        "SELECT id, {ident} AS identifying_field, links
         FROM {table}
         WHERE (? IS NULL OR id > ?)
           AND {predicate}
         ORDER BY id
         LIMIT ?",
        ident = kind.identifying_column(),
        predicate = needs_processing_predicate(table),
    );

    let rows = sqlx::query(&query)
        .bind(after)
        .bind(after)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;

    rows.iter().map(|row| row_to_record(kind, row)).collect()
}

/// Counts records of `kind` across the whole store that still need processing.
pub async fn count_pending(pool: &SqlitePool, kind: ContentKind) -> Result<u64, sqlx::Error> {
    let table = kind.table();
    let query = format!(
        "SELECT COUNT(*) AS pending FROM {table} WHERE {}",
        needs_processing_predicate(table)
    );
    let row = sqlx::query(&query).fetch_one(pool).await?;
    let pending: i64 = row.try_get("pending")?;
    Ok(u64::try_from(pending).unwrap_or(0))
}

/// Writes every update in a single transaction.
pub async fn save_link_updates(pool: &SqlitePool, updates: &[LinkUpdate]) -> Result<(), sqlx::Error> {
    if updates.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for update in updates {
        let query = format!("UPDATE {} SET links = ? WHERE id = ?", update.kind.table());
        sqlx::query(&query)
            .bind(encode_links(&update.links)?)
            .bind(&update.id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn find_by_id(
    pool: &SqlitePool,
    kind: ContentKind,
    id: &str,
) -> Result<Option<LinkRecord>, sqlx::Error> {
    let query = format!(
        "SELECT id, {} AS identifying_field, links FROM {} WHERE id = ?",
        kind.identifying_column(),
        kind.table()
    );
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.map(|row| row_to_record(kind, &row)).transpose()
}

/// Finds a record by campaign id, SMS id or share token, in that order.
pub async fn find_link_record(
    pool: &SqlitePool,
    id_or_token: &str,
) -> Result<Option<LinkRecord>, sqlx::Error> {
    for kind in [ContentKind::Email, ContentKind::Sms] {
        if let Some(record) = find_by_id(pool, kind, id_or_token).await? {
            return Ok(Some(record));
        }
    }

    match find_share_target(pool, id_or_token).await? {
        Some(target) => find_by_id(pool, target.kind(), target.id()).await,
        None => Ok(None),
    }
}
