//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod profile;
pub mod system;
pub mod vaccine;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(vaccine::routes())
        .merge(profile::routes())
}
