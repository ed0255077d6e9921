//! Vaccine record DTOs.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DisplayStatus, VaccineId, VaccineRecord, VaccineStatus, VaccineSummary};
use crate::service::{CompletionOutcome, NextDose};

const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";
const CALENDAR_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A dose as returned by the API, with its display status as of today.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VaccineDto {
    /// Record identifier.
    pub id: VaccineId,
    /// Vaccine label.
    pub vaccine_name: String,
    /// Calendar date the dose is due.
    pub due_date: NaiveDate,
    /// Stored status.
    pub status: VaccineStatus,
    /// Status shown to the user: pending, due today, overdue or completed.
    pub display_status: DisplayStatus,
    /// Whether a reminder was already sent.
    pub reminder_sent: bool,
    /// Google Calendar link adding the appointment. Absent for completed doses.
    pub calendar_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl VaccineDto {
    /// Builds the DTO, deriving the display status for `today`.
    #[must_use]
    pub fn from_record(record: VaccineRecord, today: NaiveDate) -> Self {
        let calendar_url = (!record.is_completed())
            .then(|| calendar_link(&record.vaccine_name, record.due_date))
            .flatten();
        Self {
            display_status: record.display_status(today),
            calendar_url,
            id: record.id,
            vaccine_name: record.vaccine_name,
            due_date: record.due_date,
            status: record.status,
            reminder_sent: record.reminder_sent,
            created_at: record.created_at,
        }
    }
}

/// Builds a Google Calendar "add event" link for a one-hour appointment at
/// midnight UTC on the due date.
fn calendar_link(vaccine_name: &str, due_date: NaiveDate) -> Option<String> {
    let start = due_date.and_time(NaiveTime::MIN);
    let end = start.checked_add_signed(TimeDelta::hours(1))?;
    let dates = format!(
        "{}/{}",
        start.format(CALENDAR_TIME_FORMAT),
        end.format(CALENDAR_TIME_FORMAT)
    );
    let title = format!("Vaccine: {vaccine_name}");
    let details = format!(
        "Vaccine appointment for {vaccine_name}. Don't forget to bring your baby's vaccination card!"
    );
    let url = reqwest::Url::parse_with_params(
        CALENDAR_BASE_URL,
        [
            ("action", "TEMPLATE"),
            ("text", title.as_str()),
            ("details", details.as_str()),
            ("location", "Pediatric Clinic"),
            ("dates", dates.as_str()),
        ],
    )
    .ok()?;
    Some(url.into())
}

/// Response body for `GET /vaccines`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VaccineListResponse {
    /// Doses in display order.
    pub data: Vec<VaccineDto>,
    /// Date the display statuses were derived for.
    pub as_of: NaiveDate,
}

/// Request body for `POST /vaccines/:id/complete`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompleteRequest {
    /// Create the follow-up dose one month later. Defaults to `true`.
    #[serde(default = "default_schedule_next")]
    pub schedule_next_dose: bool,
}

impl Default for CompleteRequest {
    fn default() -> Self {
        Self {
            schedule_next_dose: default_schedule_next(),
        }
    }
}

fn default_schedule_next() -> bool {
    true
}

/// What happened to the follow-up dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextDoseStatus {
    /// Not requested.
    Skipped,
    /// Created.
    Scheduled,
    /// Requested but could not be created.
    Failed,
}

/// Response body for `POST /vaccines/:id/complete`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompletionResponse {
    /// The completed dose.
    pub completed: VaccineDto,
    /// Outcome of the follow-up dose step.
    pub next_dose_status: NextDoseStatus,
    /// The follow-up dose, when created.
    pub next_dose: Option<VaccineDto>,
    /// Why the follow-up dose could not be created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_dose_error: Option<String>,
}

impl CompletionResponse {
    /// Builds the response from a service outcome.
    #[must_use]
    pub fn from_outcome(outcome: CompletionOutcome, today: NaiveDate) -> Self {
        let completed = VaccineDto::from_record(outcome.completed, today);
        match outcome.next_dose {
            NextDose::Skipped => Self {
                completed,
                next_dose_status: NextDoseStatus::Skipped,
                next_dose: None,
                next_dose_error: None,
            },
            NextDose::Scheduled(next) => Self {
                completed,
                next_dose_status: NextDoseStatus::Scheduled,
                next_dose: Some(VaccineDto::from_record(next, today)),
                next_dose_error: None,
            },
            NextDose::Failed(reason) => Self {
                completed,
                next_dose_status: NextDoseStatus::Failed,
                next_dose: None,
                next_dose_error: Some(reason),
            },
        }
    }
}

/// Response body for `GET /vaccines/summary`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    /// All doses.
    pub total: usize,
    /// Doses not yet completed, including overdue ones.
    pub pending: usize,
    /// Completed doses.
    pub completed: usize,
    /// Open doses past their due date.
    pub overdue: usize,
    /// Open doses due today.
    pub due_today: usize,
    /// Next upcoming dose, if any.
    pub next: Option<VaccineDto>,
}

impl SummaryResponse {
    /// Builds the response from counts and the upcoming dose.
    #[must_use]
    pub fn new(summary: VaccineSummary, next: Option<VaccineRecord>, today: NaiveDate) -> Self {
        Self {
            total: summary.total,
            pending: summary.pending,
            completed: summary.completed,
            overdue: summary.overdue,
            due_today: summary.due_today,
            next: next.map(|r| VaccineDto::from_record(r, today)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewVaccine, OwnerId, VaccineUpdate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("invalid test date {y}-{m}-{d}");
        };
        date
    }

    #[test]
    fn open_dose_links_a_one_hour_calendar_slot() {
        let record = VaccineRecord::new(
            OwnerId::new(),
            NewVaccine::pending("Hepatitis B (Dose 2)", date(2024, 3, 10)),
        );
        let dto = VaccineDto::from_record(record, date(2024, 3, 1));
        let Some(link) = dto.calendar_url else {
            panic!("open dose should have a calendar link");
        };
        let Ok(url) = reqwest::Url::parse(&link) else {
            panic!("calendar link is not a URL: {link}");
        };
        assert_eq!(url.host_str(), Some("calendar.google.com"));
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let param = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(param("action"), Some("TEMPLATE"));
        assert_eq!(param("text"), Some("Vaccine: Hepatitis B (Dose 2)"));
        assert_eq!(param("dates"), Some("20240310T000000Z/20240310T010000Z"));
    }

    #[test]
    fn completed_dose_has_no_calendar_link() {
        let mut record = VaccineRecord::new(
            OwnerId::new(),
            NewVaccine::pending("MMR", date(2024, 3, 10)),
        );
        let Ok(()) = record.apply(VaccineUpdate::complete()) else {
            panic!("completion failed");
        };
        let dto = VaccineDto::from_record(record, date(2024, 3, 10));
        assert!(dto.calendar_url.is_none());
    }
}
