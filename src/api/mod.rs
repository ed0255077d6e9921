//! REST API layer: route handlers, DTOs, owner extraction and the
//! OpenAPI document.
//!
//! Vaccine and profile endpoints are mounted under `/api/v1`; health and admin
//! endpoints sit at the root.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints and the
/// OpenAPI document.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(handlers::admin::routes())
        .merge(openapi::routes())
}

/// Builds the router with request tracing and CORS, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
