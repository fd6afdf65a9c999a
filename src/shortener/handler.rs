use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{ApiLogStore, Shortener};
use crate::error::ShortenError;
use crate::handler::{AppState, UserId};

#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkShortenRequest {
    #[serde(default)]
    pub link_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LogParams {
    pub limit: Option<u32>,
}

pub async fn shorten_link(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<i32>,
    payload: Option<Json<ShortenRequest>>,
) -> Response {
    let Json(payload) = payload.unwrap_or_default();

    match Shortener::from_state(&state)
        .shorten_link(user.as_str(), id, payload.url)
        .await
    {
        Ok(shortened) => (StatusCode::OK, Json(shortened)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn shorten_links(
    State(state): State<AppState>,
    user: UserId,
    payload: Option<Json<BulkShortenRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return ShortenError::EmptyBatch.into_response();
    };

    match Shortener::from_state(&state)
        .shorten_links(user.as_str(), &payload.link_ids)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_logs(State(state): State<AppState>, user: UserId, Query(params): Query<LogParams>) -> Response {
    match ApiLogStore::new(&state.db).list_recent(user.as_str(), params.limit).await {
        Ok(logs) => crate::success(logs),
        Err(e) => {
            tracing::error!("Failed to list api logs: {}", e);
            crate::internal_error("Failed to list api logs")
        }
    }
}
