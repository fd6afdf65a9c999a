use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(handler::list_links))
        .route("/links", post(handler::create_link))
        .route("/links/:id", get(handler::get_link))
        .route("/links/:id", put(handler::update_link))
        .route("/links/:id", delete(handler::delete_link))
        .route("/links/bulk/tags", post(handler::bulk_add_tags))
        .route("/tags", get(handler::tag_summary))
        .route("/resolve", post(handler::resolve_short_code))
        .route("/r/:code", get(handler::redirect))
}
