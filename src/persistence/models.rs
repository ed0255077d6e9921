//! Database row shapes and their conversion into domain records.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{BabyProfile, OwnerId, VaccineId, VaccineRecord, VaccineStatus};
use crate::error::GatewayError;

/// Column list shared by every `SELECT` on the `vaccines` table, in
/// [`VaccineRow`] order.
pub const VACCINE_COLUMNS: &str =
    "id, user_id, vaccine_name, due_date, status, reminder_sent, created_at";

/// A row from the `vaccines` table, as decoded by `sqlx::query_as`.
pub type VaccineRow = (Uuid, Uuid, String, NaiveDate, String, bool, DateTime<Utc>);

/// Converts a raw row into a [`VaccineRecord`].
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the stored status text is
/// not a known status.
pub fn record_from_row(row: VaccineRow) -> Result<VaccineRecord, GatewayError> {
    let (id, user_id, vaccine_name, due_date, status, reminder_sent, created_at) = row;
    let status: VaccineStatus = status
        .parse()
        .map_err(|e| GatewayError::PersistenceError(format!("row {id}: {e}")))?;
    Ok(VaccineRecord {
        id: VaccineId::from_uuid(id),
        owner_id: OwnerId::from_uuid(user_id),
        vaccine_name,
        due_date,
        status,
        reminder_sent,
        created_at,
    })
}

/// Column list of the profile `SELECT`, in [`ProfileRow`] order. The
/// contact address comes from a left join on `user_contacts` (alias `c`).
pub const PROFILE_COLUMNS: &str = "p.user_id, p.baby_name, p.birth_date, p.gender, p.photo_url, \
     c.email, p.created_at, p.updated_at";

/// A `baby_profiles` row joined with its contact address.
pub type ProfileRow = (
    Uuid,
    String,
    NaiveDate,
    String,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Converts a joined profile row into a [`BabyProfile`].
#[must_use]
pub fn profile_from_row(row: ProfileRow) -> BabyProfile {
    let (user_id, baby_name, birth_date, gender, photo_url, contact_email, created_at, updated_at) =
        row;
    BabyProfile {
        owner_id: OwnerId::from_uuid(user_id),
        baby_name,
        birth_date,
        gender,
        photo_url,
        contact_email,
        created_at,
        updated_at,
    }
}
