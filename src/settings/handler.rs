use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{SettingsStore, SettingsView, UpdateSettings};
use crate::api::ErrorResponse;
use crate::handler::{AppState, UserId};

#[derive(Debug, Default, Deserialize)]
pub struct ValidateKeyRequest {
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ValidateKeyResponse {
    Valid {
        success: bool,
        account: AccountSummary,
    },
    Invalid {
        success: bool,
        error: String,
        details: String,
    },
}

pub async fn get_settings(State(state): State<AppState>, user: UserId) -> Response {
    let store = SettingsStore::new(&state.db);

    match store.get_or_create(user.as_str()).await {
        Ok(settings) => crate::success(SettingsView::from(settings)),
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            crate::internal_error("Failed to load settings")
        }
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<UpdateSettings>,
) -> Response {
    let store = SettingsStore::new(&state.db);

    match store.update(user.as_str(), payload).await {
        Ok(settings) => {
            tracing::info!(user = %user.as_str(), "settings updated");
            crate::success(SettingsView::from(settings))
        }
        Err(e) => {
            tracing::error!("Failed to update settings: {}", e);
            crate::internal_error("Failed to update settings")
        }
    }
}

/// Checks a key against Rebrandly's account endpoint. Without a key in the
/// body the stored one is checked.
pub async fn validate_key(
    State(state): State<AppState>,
    user: UserId,
    payload: Option<Json<ValidateKeyRequest>>,
) -> Response {
    let Json(payload) = payload.unwrap_or_default();

    let api_key = match payload.api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => match SettingsStore::new(&state.db).get_or_create(user.as_str()).await {
            Ok(settings) => match settings.api_key() {
                Some(key) => key.to_string(),
                None => return crate::bad_request("API key is required"),
            },
            Err(e) => {
                tracing::error!("Failed to load settings: {}", e);
                return crate::internal_error("Failed to load settings");
            }
        },
    };

    let response = match state.rebrandly.account(&api_key).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to validate API key: {}", crate::unpack_error(&e));
            return crate::error_response(
                StatusCode::BAD_GATEWAY,
                ErrorResponse::with_details("Failed to validate API key", JsonValue::String(e.to_string())),
            );
        }
    };

    let body = if response.is_success() {
        ValidateKeyResponse::Valid {
            success: true,
            account: AccountSummary {
                email: json_str(&response.body, "email"),
                username: json_str(&response.body, "username"),
            },
        }
    } else {
        ValidateKeyResponse::Invalid {
            success: false,
            error: format!("API key validation failed: {} {}", response.status, response.reason()),
            details: match &response.body {
                JsonValue::String(text) => text.clone(),
                JsonValue::Null => String::new(),
                other => other.to_string(),
            },
        }
    };

    (StatusCode::OK, Json(body)).into_response()
}

fn json_str(body: &JsonValue, field: &str) -> Option<String> {
    body.get(field).and_then(JsonValue::as_str).map(str::to_string)
}
