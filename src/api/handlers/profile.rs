//! Baby profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ProfileDto;
use crate::api::extract::Owner;
use crate::app_state::AppState;
use crate::domain::ProfileInput;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /profile` — The caller's baby profile.
///
/// # Errors
///
/// Returns [`GatewayError::ProfileNotFound`] if none is registered.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    summary = "Get the baby profile",
    responses(
        (status = 200, description = "Profile", body = ProfileDto),
        (status = 401, description = "Missing or malformed X-Owner-Id", body = ErrorResponse),
        (status = 404, description = "No profile registered", body = ErrorResponse),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<impl IntoResponse, GatewayError> {
    let profile = state.profile_service.get(owner).await?;
    Ok(Json(ProfileDto::from(profile)))
}

/// `PUT /profile` — Register or revise the baby profile.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on invalid input.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    summary = "Register or update the baby profile",
    description = "Creates the profile on first call (201) and replaces it afterwards (200). Omitting `contact_email` keeps the address on file.",
    request_body = ProfileInput,
    responses(
        (status = 201, description = "Profile registered", body = ProfileDto),
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or malformed X-Owner-Id", body = ErrorResponse),
    )
)]
pub async fn put_profile(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(req): Json<ProfileInput>,
) -> Result<impl IntoResponse, GatewayError> {
    let (profile, created) = state.profile_service.upsert(owner, req).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ProfileDto::from(profile))))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}
