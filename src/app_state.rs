//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::api::extract::AdminKey;
use crate::service::{AdminService, ProfileService, ReminderScheduler, VaccineService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Vaccine record operations.
    pub vaccine_service: Arc<VaccineService>,
    /// Baby profile and reminder address.
    pub profile_service: Arc<ProfileService>,
    /// Reminder scan, shared with the background task.
    pub reminder_scheduler: Arc<ReminderScheduler>,
    /// Registry-wide counts for operators.
    pub admin_service: Arc<AdminService>,
    /// Bearer token accepted on `/admin` routes.
    pub admin_key: AdminKey,
}

impl FromRef<AppState> for AdminKey {
    fn from_ref(state: &AppState) -> Self {
        state.admin_key.clone()
    }
}
