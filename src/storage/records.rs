//! Campaign, SMS and share-link records.
//!
//! Plain inserts and lookups. Link extraction happens before insertion; this
//! module only stores what it is given.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{ContentKind, Link};
use crate::utils::{new_record_id, new_share_token};

/// A stored email campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub body: String,
    pub links: Vec<Link>,
    pub created_at: i64,
}

/// A stored SMS message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsMessage {
    pub id: String,
    pub phone_number: String,
    pub message: String,
    pub links: Vec<Link>,
    pub created_at: i64,
}

/// Public token pointing at one campaign or one SMS message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_id: Option<String>,
    pub created_at: i64,
}

/// What a new share link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareTarget {
    Campaign(String),
    Sms(String),
}

impl ShareTarget {
    pub fn kind(&self) -> ContentKind {
        match self {
            ShareTarget::Campaign(_) => ContentKind::Email,
            ShareTarget::Sms(_) => ContentKind::Sms,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ShareTarget::Campaign(id) | ShareTarget::Sms(id) => id,
        }
    }
}

pub(crate) fn encode_links(links: &[Link]) -> Result<String, sqlx::Error> {
    serde_json::to_string(links).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_links_column(row: &SqliteRow) -> Result<Vec<Link>, sqlx::Error> {
    let raw: String = row.try_get("links")?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: "links".to_string(),
        source: Box::new(e),
    })
}

/// Inserts a campaign and returns it as stored.
pub async fn insert_campaign(
    pool: &SqlitePool,
    subject: &str,
    sender: &str,
    body: &str,
    links: Vec<Link>,
) -> Result<Campaign, sqlx::Error> {
    let campaign = Campaign {
        id: new_record_id(),
        subject: subject.to_string(),
        sender: sender.to_string(),
        body: body.to_string(),
        links,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    sqlx::query(
        "INSERT INTO campaigns (id, subject, sender, body, links, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&campaign.id)
    .bind(&campaign.subject)
    .bind(&campaign.sender)
    .bind(&campaign.body)
    .bind(encode_links(&campaign.links)?)
    .bind(campaign.created_at)
    .execute(pool)
    .await?;

    Ok(campaign)
}

pub async fn get_campaign(pool: &SqlitePool, id: &str) -> Result<Option<Campaign>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, subject, sender, body, links, created_at FROM campaigns WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(Campaign {
            id: row.try_get("id")?,
            subject: row.try_get("subject")?,
            sender: row.try_get("sender")?,
            body: row.try_get("body")?,
            links: decode_links_column(&row)?,
            created_at: row.try_get("created_at")?,
        })
    })
    .transpose()
}

/// Inserts an SMS message and returns it as stored.
pub async fn insert_sms(
    pool: &SqlitePool,
    phone_number: &str,
    message: &str,
    links: Vec<Link>,
) -> Result<SmsMessage, sqlx::Error> {
    let sms = SmsMessage {
        id: new_record_id(),
        phone_number: phone_number.to_string(),
        message: message.to_string(),
        links,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    sqlx::query(
        "INSERT INTO sms_messages (id, phone_number, message, links, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&sms.id)
    .bind(&sms.phone_number)
    .bind(&sms.message)
    .bind(encode_links(&sms.links)?)
    .bind(sms.created_at)
    .execute(pool)
    .await?;

    Ok(sms)
}

pub async fn get_sms(pool: &SqlitePool, id: &str) -> Result<Option<SmsMessage>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, phone_number, message, links, created_at FROM sms_messages WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(SmsMessage {
            id: row.try_get("id")?,
            phone_number: row.try_get("phone_number")?,
            message: row.try_get("message")?,
            links: decode_links_column(&row)?,
            created_at: row.try_get("created_at")?,
        })
    })
    .transpose()
}

/// True when a campaign or SMS message with `id` exists.
pub async fn record_exists(
    pool: &SqlitePool,
    kind: ContentKind,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let query = format!("SELECT 1 FROM {} WHERE id = ?", kind.table());
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    Ok(row.is_some())
}

/// Inserts a share link for `target`. The caller checks the target exists.
pub async fn insert_share_link(
    pool: &SqlitePool,
    target: &ShareTarget,
) -> Result<ShareLink, sqlx::Error> {
    let (campaign_id, sms_id) = match target {
        ShareTarget::Campaign(id) => (Some(id.clone()), None),
        ShareTarget::Sms(id) => (None, Some(id.clone())),
    };
    let share = ShareLink {
        token: new_share_token(),
        campaign_id,
        sms_id,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    sqlx::query(
        "INSERT INTO share_links (token, campaign_id, sms_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&share.token)
    .bind(&share.campaign_id)
    .bind(&share.sms_id)
    .bind(share.created_at)
    .execute(pool)
    .await?;

    Ok(share)
}

/// Resolves a share token to the record it points at.
pub async fn find_share_target(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<ShareTarget>, sqlx::Error> {
    let row = sqlx::query("SELECT campaign_id, sms_id FROM share_links WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let campaign_id: Option<String> = row.try_get("campaign_id")?;
    let sms_id: Option<String> = row.try_get("sms_id")?;
    Ok(match (campaign_id, sms_id) {
        (Some(id), _) => Some(ShareTarget::Campaign(id)),
        (None, Some(id)) => Some(ShareTarget::Sms(id)),
        (None, None) => None,
    })
}
