use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value as JsonValue;

use crate::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum RebrandlyError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid rebrandly base url {0}")]
    BaseUrl(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("url is required")]
    MissingUrl,
    #[error("link_ids and tags are required")]
    EmptyBulkTags,
    #[error("Link not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        match self {
            LinkError::MissingUrl | LinkError::EmptyBulkTags => crate::bad_request(&self.to_string()),
            LinkError::NotFound => crate::not_found(&self.to_string()),
            LinkError::Storage(e) => {
                tracing::error!("link storage failure: {:#}", e);
                crate::internal_error("Failed to process link request")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShortenError {
    #[error("Rebrandly API key not configured")]
    MissingApiKey,
    #[error("Link IDs array is required")]
    EmptyBatch,
    #[error("Link not found")]
    LinkNotFound,
    #[error("Rebrandly API error: {status}")]
    Upstream { status: u16, details: JsonValue },
    #[error(transparent)]
    Rebrandly(#[from] RebrandlyError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ShortenError {
    fn into_response(self) -> Response {
        match self {
            ShortenError::MissingApiKey | ShortenError::EmptyBatch => crate::bad_request(&self.to_string()),
            ShortenError::LinkNotFound => crate::not_found(&self.to_string()),
            ShortenError::Upstream { ref details, .. } => crate::error_response(
                StatusCode::BAD_GATEWAY,
                ErrorResponse::with_details(&self.to_string(), details.clone()),
            ),
            ShortenError::Rebrandly(ref e) => {
                tracing::warn!("rebrandly unreachable: {}", crate::unpack_error(e));
                crate::error_response(StatusCode::BAD_GATEWAY, ErrorResponse::new(&self.to_string()))
            }
            ShortenError::Storage(e) => {
                tracing::error!("shortener storage failure: {:#}", e);
                crate::internal_error("Failed to shorten link")
            }
        }
    }
}
