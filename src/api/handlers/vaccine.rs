//! Vaccine record handlers: CRUD, completion, upcoming dose and summary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CompleteRequest, CompletionResponse, SummaryResponse, VaccineDto, VaccineListResponse,
};
use crate::api::extract::Owner;
use crate::app_state::AppState;
use crate::domain::{NewVaccine, VaccineId, VaccineUpdate};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /vaccines` — List the caller's doses in display order.
///
/// # Errors
///
/// Returns [`GatewayError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/vaccines",
    tag = "Vaccines",
    summary = "List vaccines",
    description = "Returns every dose of the caller, open doses first then completed ones, each by due date.",
    responses(
        (status = 200, description = "Dose list", body = VaccineListResponse),
        (status = 401, description = "Missing or malformed X-Owner-Id", body = ErrorResponse),
    )
)]
pub async fn list_vaccines(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<impl IntoResponse, GatewayError> {
    let today = state.vaccine_service.today();
    let records = state.vaccine_service.list(owner).await?;
    let data = records
        .into_iter()
        .map(|r| VaccineDto::from_record(r, today))
        .collect();
    Ok(Json(VaccineListResponse { data, as_of: today }))
}

/// `POST /vaccines` — Schedule a dose.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on an empty or overlong name.
#[utoipa::path(
    post,
    path = "/api/v1/vaccines",
    tag = "Vaccines",
    summary = "Schedule a vaccine",
    request_body = NewVaccine,
    responses(
        (status = 201, description = "Dose created", body = VaccineDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or malformed X-Owner-Id", body = ErrorResponse),
    )
)]
pub async fn create_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(req): Json<NewVaccine>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.vaccine_service.create(owner, req).await?;
    let dto = VaccineDto::from_record(record, state.vaccine_service.today());
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /vaccines/:id` — Get one dose.
///
/// # Errors
///
/// Returns [`GatewayError::VaccineNotFound`] if the caller has no such dose.
#[utoipa::path(
    get,
    path = "/api/v1/vaccines/{id}",
    tag = "Vaccines",
    summary = "Get a vaccine",
    params(
        ("id" = uuid::Uuid, Path, description = "Vaccine UUID"),
    ),
    responses(
        (status = 200, description = "Dose", body = VaccineDto),
        (status = 404, description = "Vaccine not found", body = ErrorResponse),
    )
)]
pub async fn get_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .vaccine_service
        .get(owner, VaccineId::from_uuid(id))
        .await?;
    Ok(Json(VaccineDto::from_record(
        record,
        state.vaccine_service.today(),
    )))
}

/// `PATCH /vaccines/:id` — Edit a dose.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidTransition`] when reopening or
/// re-completing a completed dose.
#[utoipa::path(
    patch,
    path = "/api/v1/vaccines/{id}",
    tag = "Vaccines",
    summary = "Update a vaccine",
    description = "Partial update of name, due date or status. A completed dose cannot change status.",
    params(
        ("id" = uuid::Uuid, Path, description = "Vaccine UUID"),
    ),
    request_body = VaccineUpdate,
    responses(
        (status = 200, description = "Updated dose", body = VaccineDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Vaccine not found", body = ErrorResponse),
        (status = 409, description = "Status change not allowed", body = ErrorResponse),
    )
)]
pub async fn update_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<VaccineUpdate>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .vaccine_service
        .update(owner, VaccineId::from_uuid(id), req)
        .await?;
    Ok(Json(VaccineDto::from_record(
        record,
        state.vaccine_service.today(),
    )))
}

/// `DELETE /vaccines/:id` — Remove a dose.
///
/// # Errors
///
/// Returns [`GatewayError::VaccineNotFound`] if the caller has no such dose.
#[utoipa::path(
    delete,
    path = "/api/v1/vaccines/{id}",
    tag = "Vaccines",
    summary = "Delete a vaccine",
    params(
        ("id" = uuid::Uuid, Path, description = "Vaccine UUID"),
    ),
    responses(
        (status = 204, description = "Dose deleted"),
        (status = 404, description = "Vaccine not found", body = ErrorResponse),
    )
)]
pub async fn delete_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .vaccine_service
        .delete(owner, VaccineId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /vaccines/:id/complete` — Mark a dose completed.
///
/// The body is optional; without it the follow-up dose is scheduled.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidTransition`] if the dose is already
/// completed. A failure to create the follow-up dose is reported in the
/// response body, not as an error.
#[utoipa::path(
    post,
    path = "/api/v1/vaccines/{id}/complete",
    tag = "Vaccines",
    summary = "Complete a vaccine",
    description = "Marks the dose completed and, unless `schedule_next_dose` is false, creates the next dose one calendar month later.",
    params(
        ("id" = uuid::Uuid, Path, description = "Vaccine UUID"),
    ),
    request_body(
        content = CompleteRequest,
        description = "Optional. Without a body the next dose is scheduled."
    ),
    responses(
        (status = 200, description = "Dose completed", body = CompletionResponse),
        (status = 404, description = "Vaccine not found", body = ErrorResponse),
        (status = 409, description = "Already completed", body = ErrorResponse),
    )
)]
pub async fn complete_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<uuid::Uuid>,
    body: Option<Json<CompleteRequest>>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = body.unwrap_or_default();
    let outcome = state
        .vaccine_service
        .complete(owner, VaccineId::from_uuid(id), req.schedule_next_dose)
        .await?;
    Ok(Json(CompletionResponse::from_outcome(
        outcome,
        state.vaccine_service.today(),
    )))
}

/// `GET /vaccines/upcoming` — Next pending dose due today or later.
///
/// # Errors
///
/// Returns [`GatewayError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/vaccines/upcoming",
    tag = "Vaccines",
    summary = "Next upcoming vaccine",
    description = "Returns the earliest pending dose due today or later, or null when there is none.",
    responses(
        (status = 200, description = "Upcoming dose or null", body = Option<VaccineDto>),
    )
)]
pub async fn upcoming_vaccine(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<impl IntoResponse, GatewayError> {
    let today = state.vaccine_service.today();
    let next = state.vaccine_service.upcoming(owner).await?;
    Ok(Json(next.map(|r| VaccineDto::from_record(r, today))))
}

/// `GET /vaccines/summary` — Dashboard counts.
///
/// # Errors
///
/// Returns [`GatewayError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/vaccines/summary",
    tag = "Vaccines",
    summary = "Vaccine summary",
    responses(
        (status = 200, description = "Counts and next dose", body = SummaryResponse),
    )
)]
pub async fn vaccine_summary(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<impl IntoResponse, GatewayError> {
    let today = state.vaccine_service.today();
    let (summary, next) = state.vaccine_service.summary(owner).await?;
    Ok(Json(SummaryResponse::new(summary, next, today)))
}

/// Vaccine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vaccines", get(list_vaccines).post(create_vaccine))
        .route("/vaccines/upcoming", get(upcoming_vaccine))
        .route("/vaccines/summary", get(vaccine_summary))
        .route(
            "/vaccines/{id}",
            get(get_vaccine).patch(update_vaccine).delete(delete_vaccine),
        )
        .route("/vaccines/{id}/complete", post(complete_vaccine))
}
