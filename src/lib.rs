use crate::api::{ApiResponse, ErrorResponse};
use axum::{
    Json, Router,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::error::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod links;
pub mod metadata;
pub mod model;
pub mod settings;
pub mod shortener;

use handler::AppState;

pub fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse { data })).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse { data })).into_response()
}

pub fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

pub fn not_found(msg: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, ErrorResponse::new(msg))
}

pub fn bad_request(msg: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(msg))
}

pub fn internal_error(msg: &str) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg))
}

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handler::healthcheck))
        .route("/metadata", get(handler::get_metadata))
        .merge(links::routes())
        .merge(settings::routes())
        .merge(shortener::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
