//! HTTP Handlers for the Links API

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use super::{CreateLink, LinkStore, NewLink, ResolvedLink, UpdateLink, normalize_tags};
use crate::api::QueryParams;
use crate::error::LinkError;
use crate::handler::{AppState, UserId};
use crate::model::Link;
use crate::settings::SettingsStore;
use crate::shortener::Shortener;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BulkTagRequest {
    #[serde(default)]
    pub link_ids: Vec<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkTagResponse {
    pub updated: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub short_code: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(flatten)]
    pub link: ResolvedLink,
}

// ============================================================================
// Link Handlers
// ============================================================================

pub async fn list_links(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<QueryParams>,
) -> Response {
    let store = LinkStore::new(&state.db);
    let params = params.into_handler_params();

    match store.list(user.as_str(), &params).await {
        Ok(page) => crate::success(page),
        Err(e) => {
            tracing::error!("Failed to list links: {}", e);
            crate::internal_error("Failed to list links")
        }
    }
}

pub async fn create_link(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<CreateLink>,
) -> Result<Response, LinkError> {
    let input = NewLink::from_input(payload).ok_or(LinkError::MissingUrl)?;
    let store = LinkStore::new(&state.db);

    let link = store.create(user.as_str(), input).await?;
    tracing::info!(link_id = link.id, user = %user.as_str(), "link created");

    let link = auto_shorten(&state, &user, link).await;
    Ok(crate::created(link))
}

/// Shortens a freshly created link when the user asked for it. Failures are
/// logged and leave the link in the `error` state; the create still succeeds.
async fn auto_shorten(state: &AppState, user: &UserId, link: Link) -> Link {
    let settings = match SettingsStore::new(&state.db).get_or_create(user.as_str()).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings for auto-shorten: {}", e);
            return link;
        }
    };

    if !settings.auto_shorten_enabled || settings.api_key().is_none() {
        return link;
    }

    if let Err(e) = Shortener::from_state(state)
        .shorten_link(user.as_str(), link.id, None)
        .await
    {
        tracing::warn!(link_id = link.id, "auto-shorten failed: {}", e);
    }

    match LinkStore::new(&state.db).get(user.as_str(), link.id).await {
        Ok(Some(refreshed)) => refreshed,
        Ok(None) => link,
        Err(e) => {
            tracing::error!("Failed to reload link after auto-shorten: {}", e);
            link
        }
    }
}

pub async fn get_link(State(state): State<AppState>, user: UserId, Path(id): Path<i32>) -> Response {
    let store = LinkStore::new(&state.db);

    match store.get(user.as_str(), id).await {
        Ok(Some(link)) => crate::success(link),
        Ok(None) => crate::not_found("Link not found"),
        Err(e) => {
            tracing::error!("Failed to get link: {}", e);
            crate::internal_error("Failed to get link")
        }
    }
}

pub async fn update_link(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLink>,
) -> Response {
    let store = LinkStore::new(&state.db);

    match store.update(user.as_str(), id, payload).await {
        Ok(Some(link)) => crate::success(link),
        Ok(None) => crate::not_found("Link not found"),
        Err(e) => {
            tracing::error!("Failed to update link: {}", e);
            crate::internal_error("Failed to update link")
        }
    }
}

pub async fn delete_link(State(state): State<AppState>, user: UserId, Path(id): Path<i32>) -> Response {
    let store = LinkStore::new(&state.db);

    match store.delete(user.as_str(), id).await {
        Ok(true) => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(false) => crate::not_found("Link not found"),
        Err(e) => {
            tracing::error!("Failed to delete link: {}", e);
            crate::internal_error("Failed to delete link")
        }
    }
}

// ============================================================================
// Tag Handlers
// ============================================================================

pub async fn tag_summary(State(state): State<AppState>, user: UserId) -> Response {
    let store = LinkStore::new(&state.db);

    match store.tag_summary(user.as_str()).await {
        Ok(summary) => crate::success(summary),
        Err(e) => {
            tracing::error!("Failed to count tags: {}", e);
            crate::internal_error("Failed to count tags")
        }
    }
}

pub async fn bulk_add_tags(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<BulkTagRequest>,
) -> Result<Response, LinkError> {
    let tags = normalize_tags(&payload.tags);
    if payload.link_ids.is_empty() || tags.is_empty() {
        return Err(LinkError::EmptyBulkTags);
    }

    let updated = LinkStore::new(&state.db)
        .bulk_add_tags(user.as_str(), &payload.link_ids, &tags)
        .await?;

    Ok(crate::success(BulkTagResponse { updated }))
}

// ============================================================================
// Short Code Resolution
// ============================================================================

pub async fn resolve_short_code(
    State(state): State<AppState>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Response, LinkError> {
    match LinkStore::new(&state.db).resolve(payload.short_code.trim()).await? {
        Some(link) => Ok((StatusCode::OK, Json(ResolveResponse { success: true, link })).into_response()),
        None => Err(LinkError::NotFound),
    }
}

pub async fn redirect(State(state): State<AppState>, Path(code): Path<String>) -> Result<Response, LinkError> {
    match LinkStore::new(&state.db).resolve(code.trim()).await? {
        Some(link) => {
            tracing::info!(short_code = %code, "redirecting");
            Ok(Redirect::temporary(&link.original_url).into_response())
        }
        None => Err(LinkError::NotFound),
    }
}
