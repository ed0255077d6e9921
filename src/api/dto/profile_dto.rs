//! Baby profile DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BabyProfile;

/// The caller's baby profile as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileDto {
    /// Name used in reminders.
    pub baby_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Free-text gender.
    pub gender: String,
    /// Optional photo link.
    pub photo_url: Option<String>,
    /// Reminder address; reminders are skipped while it is missing.
    pub contact_email: Option<String>,
    /// First registration.
    pub created_at: DateTime<Utc>,
    /// Last revision.
    pub updated_at: DateTime<Utc>,
}

impl From<BabyProfile> for ProfileDto {
    fn from(profile: BabyProfile) -> Self {
        Self {
            baby_name: profile.baby_name,
            birth_date: profile.birth_date,
            gender: profile.gender,
            photo_url: profile.photo_url,
            contact_email: profile.contact_email,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
