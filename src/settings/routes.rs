use axum::{
    Router,
    routing::{get, post, put},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(handler::get_settings))
        .route("/settings", put(handler::update_settings))
        .route("/settings/validate-key", post(handler::validate_key))
}
