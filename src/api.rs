use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
    /// Comma separated; a link must carry all of them.
    pub tags: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        ErrorResponse {
            error: msg.to_owned(),
            details: None,
        }
    }

    pub fn with_details(msg: &str, details: JsonValue) -> Self {
        ErrorResponse {
            error: msg.to_owned(),
            details: Some(details),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
