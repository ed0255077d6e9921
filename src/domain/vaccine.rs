//! Vaccine record aggregate, persisted status, and derived display status.
//!
//! A [`VaccineRecord`] stores only the persisted [`VaccineStatus`]
//! (`Pending` or `Completed`). The user-facing [`DisplayStatus`] depends on
//! the current calendar date and is recomputed on every read through
//! [`derive_status`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{OwnerId, VaccineId};
use crate::error::GatewayError;

/// Maximum accepted length of a vaccine name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Persisted status of a dose.
///
/// The only legal transition is `Pending → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VaccineStatus {
    /// Scheduled, not yet administered.
    Pending,
    /// Administered. Terminal.
    Completed,
}

impl VaccineStatus {
    /// Returns the text stored in the `status` column.
    #[must_use]
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for VaccineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for VaccineStatus {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" | "pending" => Ok(Self::Pending),
            "Completed" | "completed" => Ok(Self::Completed),
            other => Err(GatewayError::InvalidRequest(format!(
                "unknown vaccine status: {other}"
            ))),
        }
    }
}

/// Display status derived from the due date, the stored status and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// Due at a future date.
    Pending,
    /// Due on the current calendar date.
    DueToday,
    /// Due date has passed without completion.
    Overdue,
    /// Administered.
    Completed,
}

/// Derives the display status of a dose.
///
/// Compares calendar dates only; the time of day never matters.
#[must_use]
pub fn derive_status(due_date: NaiveDate, status: VaccineStatus, today: NaiveDate) -> DisplayStatus {
    match status {
        VaccineStatus::Completed => DisplayStatus::Completed,
        VaccineStatus::Pending if due_date == today => DisplayStatus::DueToday,
        VaccineStatus::Pending if due_date < today => DisplayStatus::Overdue,
        VaccineStatus::Pending => DisplayStatus::Pending,
    }
}

/// One scheduled or completed immunization dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineRecord {
    /// Record identifier (immutable).
    pub id: VaccineId,
    /// Owning account (immutable).
    pub owner_id: OwnerId,
    /// Free-text label, optionally ending in `(Dose N)`.
    pub vaccine_name: String,
    /// Calendar date the dose is expected.
    pub due_date: NaiveDate,
    /// Persisted status.
    pub status: VaccineStatus,
    /// Set once by the reminder scheduler after a successful delivery.
    pub reminder_sent: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl VaccineRecord {
    /// Builds a fresh record for `owner` from validated input.
    ///
    /// The record gets a new identifier and `reminder_sent = false`.
    #[must_use]
    pub fn new(owner_id: OwnerId, input: NewVaccine) -> Self {
        Self {
            id: VaccineId::new(),
            owner_id,
            vaccine_name: input.vaccine_name,
            due_date: input.due_date,
            status: input.status,
            reminder_sent: false,
            created_at: Utc::now(),
        }
    }

    /// Returns the display status as of `today`.
    #[must_use]
    pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
        derive_status(self.due_date, self.status, today)
    }

    /// Returns `true` once the dose has been administered.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == VaccineStatus::Completed
    }

    /// Applies a partial update.
    ///
    /// Nothing is modified when the update is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidTransition`] when the update sets any
    /// status on a completed dose (completion is terminal and happens once),
    /// and [`GatewayError::InvalidRequest`] when the new name is invalid.
    pub fn apply(&mut self, update: VaccineUpdate) -> Result<(), GatewayError> {
        if self.is_completed() && update.status.is_some() {
            return Err(GatewayError::InvalidTransition(format!(
                "vaccine {} is already completed",
                self.id
            )));
        }
        let name = update.vaccine_name.map(validate_name).transpose()?;

        if let Some(name) = name {
            self.vaccine_name = name;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

/// Input for creating a dose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewVaccine {
    /// Vaccine label.
    pub vaccine_name: String,
    /// Calendar date the dose is expected.
    pub due_date: NaiveDate,
    /// Initial status. Defaults to `pending`.
    #[serde(default = "default_status")]
    pub status: VaccineStatus,
}

const fn default_status() -> VaccineStatus {
    VaccineStatus::Pending
}

impl NewVaccine {
    /// Creates a pending dose input.
    #[must_use]
    pub fn pending(vaccine_name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            vaccine_name: vaccine_name.into(),
            due_date,
            status: VaccineStatus::Pending,
        }
    }

    /// Trims and checks the name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the name is empty or
    /// longer than [`MAX_NAME_LEN`] characters.
    pub fn validated(self) -> Result<Self, GatewayError> {
        Ok(Self {
            vaccine_name: validate_name(self.vaccine_name)?,
            ..self
        })
    }
}

/// Partial update of a dose. `None` fields are left untouched.
///
/// There is no `reminder_sent` field: only the reminder scheduler writes
/// it, through [`crate::persistence::VaccineStore::mark_reminder_sent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct VaccineUpdate {
    /// New label.
    #[serde(default)]
    pub vaccine_name: Option<String>,
    /// New due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// New status. Rejected for doses that are already completed.
    #[serde(default)]
    pub status: Option<VaccineStatus>,
}

impl VaccineUpdate {
    /// Update that only marks the dose completed.
    #[must_use]
    pub fn complete() -> Self {
        Self {
            status: Some(VaccineStatus::Completed),
            ..Self::default()
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vaccine_name.is_none() && self.due_date.is_none() && self.status.is_none()
    }
}

fn validate_name(name: String) -> Result<String, GatewayError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "vaccine name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(GatewayError::InvalidRequest(format!(
            "vaccine name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
