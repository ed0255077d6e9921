//! Baby profile: the display name and contact address a reminder needs.
//!
//! One profile per owner. Registering again revises the existing profile
//! and keeps its registration timestamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::OwnerId;
use crate::error::GatewayError;

/// Maximum accepted length of a baby name, in characters.
pub const MAX_BABY_NAME_LEN: usize = 100;

/// Maximum accepted length of a contact address, in characters.
pub const MAX_EMAIL_LEN: usize = 254;

/// The baby profile of one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BabyProfile {
    /// Owning account.
    pub owner_id: OwnerId,
    /// Name used in reminders.
    pub baby_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Free-text gender.
    pub gender: String,
    /// Optional photo link.
    pub photo_url: Option<String>,
    /// Where reminders are delivered.
    pub contact_email: Option<String>,
    /// First registration.
    pub created_at: DateTime<Utc>,
    /// Last revision.
    pub updated_at: DateTime<Utc>,
}

impl BabyProfile {
    /// Builds a new profile from validated input.
    #[must_use]
    pub fn register(owner_id: OwnerId, input: ProfileInput, now: DateTime<Utc>) -> Self {
        Self {
            owner_id,
            baby_name: input.baby_name,
            birth_date: input.birth_date,
            gender: input.gender,
            photo_url: input.photo_url,
            contact_email: input.contact_email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the profile fields with validated input.
    ///
    /// An input without a contact address keeps the current one.
    pub fn revise(&mut self, input: ProfileInput, now: DateTime<Utc>) {
        self.baby_name = input.baby_name;
        self.birth_date = input.birth_date;
        self.gender = input.gender;
        self.photo_url = input.photo_url;
        if input.contact_email.is_some() {
            self.contact_email = input.contact_email;
        }
        self.updated_at = now;
    }
}

/// Input for registering or revising a profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ProfileInput {
    /// Name used in reminders.
    pub baby_name: String,
    /// Date of birth. Must not be in the future.
    pub birth_date: NaiveDate,
    /// Free-text gender.
    pub gender: String,
    /// Optional photo link.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Reminder address. Omit to keep the one on file.
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl ProfileInput {
    /// Trims every text field and checks it.
    ///
    /// Blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the name or gender is
    /// empty, the name is too long, the birth date is after `today` or the
    /// contact address is not a plausible email address.
    pub fn validated(self, today: NaiveDate) -> Result<Self, GatewayError> {
        let baby_name = self.baby_name.trim().to_string();
        if baby_name.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "baby name must not be empty".to_string(),
            ));
        }
        if baby_name.chars().count() > MAX_BABY_NAME_LEN {
            return Err(GatewayError::InvalidRequest(format!(
                "baby name exceeds {MAX_BABY_NAME_LEN} characters"
            )));
        }
        let gender = self.gender.trim().to_string();
        if gender.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "gender must not be empty".to_string(),
            ));
        }
        if self.birth_date > today {
            return Err(GatewayError::InvalidRequest(format!(
                "birth date {} is in the future",
                self.birth_date
            )));
        }
        let contact_email = non_blank(self.contact_email)
            .map(validate_email)
            .transpose()?;

        Ok(Self {
            baby_name,
            birth_date: self.birth_date,
            gender,
            photo_url: non_blank(self.photo_url),
            contact_email,
        })
    }
}

/// Registration counts across all owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileCounts {
    /// Every stored profile.
    pub total: u64,
    /// Profiles first registered at or after the cutoff.
    pub registered_since: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_email(address: String) -> Result<String, GatewayError> {
    let domain_ok = |domain: &str| {
        domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@')
    };
    let plausible = address.chars().count() <= MAX_EMAIL_LEN
        && !address.chars().any(char::is_whitespace)
        && address
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain_ok(domain));
    if plausible {
        Ok(address)
    } else {
        Err(GatewayError::InvalidRequest(format!(
            "invalid contact email: {address}"
        )))
    }
}
