//! Campaign, SMS and share-link endpoints.
//!
//! Links are extracted and classified when content is created.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;

use super::super::error::{json_body, ApiError};
use super::super::types::{AppState, CreateCampaignRequest, CreateShareLinkRequest, CreateSmsRequest};
use crate::error_handling::UnwrapError;
use crate::links::{extract_email_links, extract_sms_links};
use crate::storage::{
    get_campaign, get_sms, insert_campaign, insert_share_link, insert_sms, record_exists,
    Campaign, ShareLink, ShareTarget, SmsMessage,
};

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(UnwrapError::InvalidRequest(format!("{field} is required")).into());
    }
    Ok(())
}

/// POST /api/campaigns
pub async fn create_campaign_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let request = json_body(body)?;
    require("subject", &request.subject)?;
    require("sender", &request.sender)?;
    require("body", &request.body)?;

    let links = extract_email_links(&request.body);
    let campaign = insert_campaign(
        &state.pool,
        request.subject.trim(),
        request.sender.trim(),
        &request.body,
        links,
    )
    .await?;
    info!("Created campaign {} with {} links", campaign.id, campaign.links.len());
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// GET /api/campaigns/{id}
pub async fn get_campaign_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    match get_campaign(&state.pool, &id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(UnwrapError::NotFound(id).into()),
    }
}

/// POST /api/sms
pub async fn create_sms_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateSmsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SmsMessage>), ApiError> {
    let request = json_body(body)?;
    require("phoneNumber", &request.phone_number)?;
    require("message", &request.message)?;

    let links = extract_sms_links(&request.message);
    let sms = insert_sms(&state.pool, request.phone_number.trim(), &request.message, links).await?;
    info!("Created SMS message {} with {} links", sms.id, sms.links.len());
    Ok((StatusCode::CREATED, Json(sms)))
}

/// GET /api/sms/{id}
pub async fn get_sms_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SmsMessage>, ApiError> {
    match get_sms(&state.pool, &id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(UnwrapError::NotFound(id).into()),
    }
}

/// POST /api/share-links
pub async fn create_share_link_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateShareLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShareLink>), ApiError> {
    let request = json_body(body)?;
    let non_blank = |id: Option<String>| id.filter(|id| !id.trim().is_empty());
    let target = match (non_blank(request.campaign_id), non_blank(request.sms_id)) {
        (Some(id), None) => ShareTarget::Campaign(id),
        (None, Some(id)) => ShareTarget::Sms(id),
        _ => {
            return Err(UnwrapError::InvalidRequest(
                "exactly one of campaignId or smsId is required".to_string(),
            )
            .into())
        }
    };

    if !record_exists(&state.pool, target.kind(), target.id()).await? {
        return Err(UnwrapError::NotFound(target.id().to_string()).into());
    }

    let share = insert_share_link(&state.pool, &target).await?;
    Ok((StatusCode::CREATED, Json(share)))
}
