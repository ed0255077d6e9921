//! Reminder eligibility: the look-ahead window and the selection predicate.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::vaccine::{VaccineRecord, VaccineStatus};
use crate::error::GatewayError;

/// Default look-ahead, in days, for reminder eligibility.
pub const DEFAULT_HORIZON_DAYS: u32 = 3;

/// Inclusive calendar-date range `[from, to]` scanned for reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReminderWindow {
    /// First eligible due date (today).
    pub from: NaiveDate,
    /// Last eligible due date (today + horizon).
    pub to: NaiveDate,
}

impl ReminderWindow {
    /// Window covering `today` through `today + horizon_days`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the end date is not representable.
    pub fn starting(today: NaiveDate, horizon_days: u32) -> Result<Self, GatewayError> {
        let to = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .ok_or_else(|| GatewayError::Internal("reminder horizon out of range".to_string()))?;
        Ok(Self { from: today, to })
    }

    /// Returns `true` if `date` lies inside the window, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Selection predicate for the reminder scan: pending, not yet reminded,
/// and due inside `window`.
#[must_use]
pub fn is_reminder_candidate(record: &VaccineRecord, window: &ReminderWindow) -> bool {
    record.status == VaccineStatus::Pending
        && !record.reminder_sent
        && window.contains(record.due_date)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewVaccine, OwnerId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("invalid test date {y}-{m}-{d}");
        };
        date
    }

    fn window(today: NaiveDate) -> ReminderWindow {
        let Ok(w) = ReminderWindow::starting(today, DEFAULT_HORIZON_DAYS) else {
            panic!("window out of range");
        };
        w
    }

    fn pending(due: NaiveDate) -> VaccineRecord {
        VaccineRecord::new(OwnerId::new(), NewVaccine::pending("MMR", due))
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = date(2024, 2, 27);
        let w = window(today);
        assert_eq!(w.to, date(2024, 3, 1));
        assert!(w.contains(today));
        assert!(w.contains(date(2024, 3, 1)));
        assert!(!w.contains(date(2024, 2, 26)));
        assert!(!w.contains(date(2024, 3, 2)));
    }

    #[test]
    fn candidate_requires_pending_and_unsent() {
        let today = date(2024, 5, 1);
        let w = window(today);

        let rec = pending(today);
        assert!(is_reminder_candidate(&rec, &w));

        let mut sent = pending(today);
        sent.reminder_sent = true;
        assert!(!is_reminder_candidate(&sent, &w));

        let mut done = pending(today);
        done.status = VaccineStatus::Completed;
        assert!(!is_reminder_candidate(&done, &w));
    }

    #[test]
    fn past_due_records_age_out() {
        let today = date(2024, 5, 11);
        let w = window(today);
        assert!(!is_reminder_candidate(&pending(date(2024, 5, 1)), &w));
        assert!(!is_reminder_candidate(&pending(date(2024, 5, 10)), &w));
    }

    #[test]
    fn zero_horizon_covers_only_today() {
        let today = date(2024, 5, 1);
        let Ok(w) = ReminderWindow::starting(today, 0) else {
            panic!("window out of range");
        };
        assert_eq!(w.from, w.to);
    }
}
