use axum::{
    Router,
    routing::{get, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links/:id/shorten", post(handler::shorten_link))
        .route("/links/bulk/shorten", post(handler::shorten_links))
        .route("/logs", get(handler::list_logs))
}
