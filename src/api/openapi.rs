//! OpenAPI document assembled from the handler annotations.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    CompleteRequest, CompletionResponse, NextDoseStatus, ProfileDto, SummaryResponse, VaccineDto,
    VaccineListResponse,
};
use crate::api::handlers::{admin, profile, system, vaccine};
use crate::app_state::AppState;
use crate::domain::{DisplayStatus, NewVaccine, ProfileInput, VaccineStatus, VaccineUpdate};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::{RegistryStats, ScanReport};

/// Path of the generated document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI description of the gateway.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "babytrack-gateway",
        description = "Vaccine schedule and reminder service. Vaccine and profile endpoints require the X-Owner-Id header; admin endpoints require the admin bearer token."
    ),
    modifiers(&AdminTokenScheme),
    paths(
        vaccine::list_vaccines,
        vaccine::create_vaccine,
        vaccine::get_vaccine,
        vaccine::update_vaccine,
        vaccine::delete_vaccine,
        vaccine::complete_vaccine,
        vaccine::upcoming_vaccine,
        vaccine::vaccine_summary,
        profile::get_profile,
        profile::put_profile,
        admin::run_reminder_scan,
        admin::registry_stats,
        system::health_handler,
    ),
    components(schemas(
        VaccineDto,
        VaccineListResponse,
        CompleteRequest,
        CompletionResponse,
        NextDoseStatus,
        SummaryResponse,
        NewVaccine,
        VaccineUpdate,
        VaccineStatus,
        ProfileDto,
        ProfileInput,
        RegistryStats,
        DisplayStatus,
        ScanReport,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Vaccines", description = "Owner-scoped vaccine schedule"),
        (name = "Profile", description = "Baby profile and reminder address"),
        (name = "Admin", description = "Operator actions"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Registers the `admin_token` bearer scheme used by the admin paths.
#[derive(Debug)]
struct AdminTokenScheme;

impl Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_token",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Serves the document, with Swagger UI at `/swagger-ui` when the
/// `swagger-ui` feature is enabled.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new().merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
    )
}

/// Serves the document.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/v1/vaccines",
            "/api/v1/vaccines/{id}",
            "/api/v1/vaccines/{id}/complete",
            "/api/v1/vaccines/upcoming",
            "/api/v1/vaccines/summary",
            "/api/v1/profile",
            "/admin/reminders/scan",
            "/admin/stats",
            "/health",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn admin_token_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let Some(components) = doc.components else {
            panic!("document has no components");
        };
        assert!(components.security_schemes.contains_key("admin_token"));
    }

    #[test]
    fn health_fields_are_described() {
        let Ok(doc) = serde_json::to_value(ApiDoc::openapi()) else {
            panic!("document should serialize");
        };
        for field in ["status", "timestamp", "version", "today", "reminder_scans"] {
            let pointer =
                format!("/components/schemas/HealthResponse/properties/{field}/description");
            assert!(
                doc.pointer(&pointer).and_then(|d| d.as_str()).is_some_and(|d| !d.is_empty()),
                "{field} has no description"
            );
        }
    }
}
