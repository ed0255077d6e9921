//! Operator endpoints. Every handler takes [`Admin`], so a request needs
//! the admin bearer token.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::extract::Admin;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::{RegistryStats, ScanReport};

/// `POST /admin/reminders/scan` — Run one reminder scan now.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] or [`GatewayError::Forbidden`]
/// without a valid admin token, and [`GatewayError::ScanInProgress`] if a
/// scan is already running.
#[utoipa::path(
    post,
    path = "/admin/reminders/scan",
    tag = "Admin",
    summary = "Run a reminder scan",
    description = "Sends reminders for pending doses due within the horizon and returns the per-outcome counts.",
    security(("admin_token" = [])),
    responses(
        (status = 200, description = "Scan finished", body = ScanReport),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 403, description = "Wrong bearer token", body = ErrorResponse),
        (status = 409, description = "A scan is already running", body = ErrorResponse),
    )
)]
pub async fn run_reminder_scan(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let report = state.reminder_scheduler.run_scan().await?;
    Ok(Json(report))
}

/// `GET /admin/stats` — Registry-wide counts.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] or [`GatewayError::Forbidden`]
/// without a valid admin token.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    summary = "Registry statistics",
    description = "Total profiles, total vaccine records and profiles registered in the last 30 days.",
    security(("admin_token" = [])),
    responses(
        (status = 200, description = "Counts", body = RegistryStats),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 403, description = "Wrong bearer token", body = ErrorResponse),
    )
)]
pub async fn registry_stats(
    _admin: Admin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let stats = state.admin_service.stats().await?;
    Ok(Json(stats))
}

/// Admin routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reminders/scan", post(run_reminder_scan))
        .route("/admin/stats", get(registry_stats))
}
