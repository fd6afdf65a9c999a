use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::api::{HealthResponse, QueryParams};
use crate::config::Config;
use crate::db::Database;
use crate::metadata::fetch_link_metadata;
use crate::shortener::RebrandlyClient;

pub const USER_HEADER: &str = "x-user-id";
const MAX_USER_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub rebrandly: Arc<RebrandlyClient>,
    pub default_user: String,
    pub request_interval: Duration,
}

impl AppState {
    pub fn new(cfg: &Config, db: Arc<Database>) -> anyhow::Result<Self> {
        let rebrandly = RebrandlyClient::new(
            &cfg.rebrandly.base_url,
            Duration::from_secs(cfg.rebrandly.timeout_seconds),
        )?;

        Ok(AppState {
            db,
            rebrandly: Arc::new(rebrandly),
            default_user: cfg.app.default_user.clone(),
            request_interval: Duration::from_millis(cfg.rebrandly.request_interval_ms),
        })
    }
}

/// The caller every read and write is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for UserId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(UserId(state.default_user.clone()));
        };

        let user = value
            .to_str()
            .map(str::trim)
            .map_err(|_| crate::bad_request("x-user-id must be valid ASCII"))?;

        if user.is_empty() || user.len() > MAX_USER_ID_LEN {
            return Err(crate::bad_request("x-user-id must be between 1 and 128 characters"));
        }

        Ok(UserId(user.to_string()))
    }
}

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

#[derive(Debug)]
pub struct HandlerParams {
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub page: u32,
    pub limit: u32,
    pub offset: u32,
}

impl QueryParams {
    pub fn into_handler_params(self) -> HandlerParams {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let query = self.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
        let tags = self
            .tags
            .map(|t| crate::links::normalize_tags(t.split(',')))
            .unwrap_or_default();

        HandlerParams {
            query,
            tags,
            page,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MetadataParams {
    pub url: String,
}

pub async fn get_metadata(Query(params): Query<MetadataParams>) -> Response {
    match crate::metadata::normalize_url(&params.url) {
        Some(url) => crate::success(fetch_link_metadata(&url)),
        None => crate::bad_request("url is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, limit: Option<u32>) -> QueryParams {
        QueryParams {
            q: None,
            tags: None,
            page,
            limit,
        }
    }

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let hp = params(None, None).into_handler_params();
        assert_eq!((hp.page, hp.limit, hp.offset), (1, 50, 0));

        let hp = params(Some(0), Some(0)).into_handler_params();
        assert_eq!((hp.page, hp.limit, hp.offset), (1, 1, 0));

        let hp = params(Some(3), Some(1000)).into_handler_params();
        assert_eq!((hp.page, hp.limit, hp.offset), (3, 200, 400));
    }

    #[test]
    fn test_query_and_tags_are_normalized() {
        let hp = QueryParams {
            q: Some("   ".to_string()),
            tags: Some(" rust, ,web,rust".to_string()),
            page: None,
            limit: None,
        }
        .into_handler_params();

        assert_eq!(hp.query, None);
        assert_eq!(hp.tags, vec!["rust".to_string(), "web".to_string()]);
    }
}
