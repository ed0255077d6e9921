//! Dose scheduling: next-dose derivation, display ordering and summaries.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::dose_name::next_dose_name;
use super::vaccine::{DisplayStatus, NewVaccine, VaccineRecord, VaccineStatus};
use crate::error::GatewayError;

/// Adds one calendar month to `date`.
///
/// Keeps the day of month when the following month has it, otherwise
/// clamps to that month's last day (`2023-01-31 → 2023-02-28`,
/// `2024-01-31 → 2024-02-29`).
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the result falls outside
/// the representable date range.
pub fn add_one_month(date: NaiveDate) -> Result<NaiveDate, GatewayError> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| GatewayError::InvalidRequest(format!("due date {date} out of range")))
}

/// Builds the follow-up dose for `completed`.
///
/// The result is due one calendar month after `completed.due_date`, carries
/// the incremented dose name and is `Pending`. The caller persists it as a
/// new record for the same owner.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the next due date is out of range.
pub fn next_dose(completed: &VaccineRecord) -> Result<NewVaccine, GatewayError> {
    Ok(NewVaccine {
        vaccine_name: next_dose_name(&completed.vaccine_name),
        due_date: add_one_month(completed.due_date)?,
        status: VaccineStatus::Pending,
    })
}

/// Sorts records for display: open doses first, then completed ones, each
/// group by ascending due date. The sort is stable.
pub fn sort_for_display(records: &mut [VaccineRecord]) {
    records.sort_by_key(|r| (r.is_completed(), r.due_date));
}

/// Selects the next upcoming dose: pending, due today or later, earliest
/// due date first. Ties go to the first record in input order.
#[must_use]
pub fn upcoming_dose(records: &[VaccineRecord], today: NaiveDate) -> Option<&VaccineRecord> {
    records
        .iter()
        .filter(|r| r.status == VaccineStatus::Pending && r.due_date >= today)
        .min_by_key(|r| r.due_date)
}

/// Per-owner counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct VaccineSummary {
    /// All records.
    pub total: usize,
    /// Records not yet completed, overdue ones included.
    pub pending: usize,
    /// Completed records.
    pub completed: usize,
    /// Pending records whose due date has passed.
    pub overdue: usize,
    /// Pending records due today.
    pub due_today: usize,
}

impl VaccineSummary {
    /// Tallies `records` as of `today`.
    #[must_use]
    pub fn tally(records: &[VaccineRecord], today: NaiveDate) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.display_status(today) {
                DisplayStatus::Completed => acc.completed += 1,
                DisplayStatus::Overdue => {
                    acc.pending += 1;
                    acc.overdue += 1;
                }
                DisplayStatus::DueToday => {
                    acc.pending += 1;
                    acc.due_today += 1;
                }
                DisplayStatus::Pending => acc.pending += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::OwnerId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("invalid test date {y}-{m}-{d}");
        };
        date
    }

    fn rec(name: &str, due: NaiveDate, status: VaccineStatus) -> VaccineRecord {
        let mut r = VaccineRecord::new(OwnerId::new(), NewVaccine::pending(name, due));
        r.status = status;
        r
    }

    fn month_after(d: NaiveDate) -> NaiveDate {
        let Ok(next) = add_one_month(d) else {
            panic!("date out of range");
        };
        next
    }

    #[test]
    fn month_end_clamps_in_leap_year() {
        assert_eq!(month_after(date(2024, 1, 31)), date(2024, 2, 29));
    }

    #[test]
    fn month_end_clamps_in_common_year() {
        assert_eq!(month_after(date(2023, 1, 31)), date(2023, 2, 28));
    }

    #[test]
    fn month_add_keeps_day_and_rolls_year() {
        assert_eq!(month_after(date(2024, 3, 15)), date(2024, 4, 15));
        assert_eq!(month_after(date(2024, 3, 31)), date(2024, 4, 30));
        assert_eq!(month_after(date(2024, 12, 31)), date(2025, 1, 31));
    }

    #[test]
    fn month_add_out_of_range_is_error() {
        assert!(add_one_month(NaiveDate::MAX).is_err());
    }

    #[test]
    fn next_dose_is_pending_and_one_month_later() {
        let done = rec("Vaccine (Dose 2)", date(2024, 1, 31), VaccineStatus::Completed);
        let Ok(next) = next_dose(&done) else {
            panic!("next dose failed");
        };
        assert_eq!(next.vaccine_name, "Vaccine (Dose 3)");
        assert_eq!(next.due_date, date(2024, 2, 29));
        assert_eq!(next.status, VaccineStatus::Pending);
    }

    #[test]
    fn display_order_puts_completed_last() {
        let mut records = vec![
            rec("c-early", date(2024, 1, 1), VaccineStatus::Completed),
            rec("p-late", date(2024, 5, 1), VaccineStatus::Pending),
            rec("c-late", date(2024, 6, 1), VaccineStatus::Completed),
            rec("p-early", date(2024, 2, 1), VaccineStatus::Pending),
        ];
        sort_for_display(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.vaccine_name.as_str()).collect();
        assert_eq!(names, ["p-early", "p-late", "c-early", "c-late"]);
    }

    #[test]
    fn display_order_is_stable_on_ties() {
        let d = date(2024, 2, 1);
        let mut records = vec![
            rec("first", d, VaccineStatus::Pending),
            rec("second", d, VaccineStatus::Pending),
        ];
        sort_for_display(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.vaccine_name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn upcoming_skips_overdue_and_completed() {
        let today = date(2024, 3, 10);
        let records = vec![
            rec("overdue", date(2024, 3, 9), VaccineStatus::Pending),
            rec("done", date(2024, 3, 11), VaccineStatus::Completed),
            rec("later", date(2024, 4, 1), VaccineStatus::Pending),
            rec("soon", date(2024, 3, 12), VaccineStatus::Pending),
        ];
        let next = upcoming_dose(&records, today).map(|r| r.vaccine_name.as_str());
        assert_eq!(next, Some("soon"));
    }

    #[test]
    fn upcoming_includes_due_today_and_breaks_ties_by_order() {
        let today = date(2024, 3, 10);
        let records = vec![
            rec("a", today, VaccineStatus::Pending),
            rec("b", today, VaccineStatus::Pending),
        ];
        let next = upcoming_dose(&records, today).map(|r| r.vaccine_name.as_str());
        assert_eq!(next, Some("a"));
    }

    #[test]
    fn upcoming_none_when_nothing_qualifies() {
        let today = date(2024, 3, 10);
        let records = vec![rec("overdue", date(2024, 1, 1), VaccineStatus::Pending)];
        assert!(upcoming_dose(&records, today).is_none());
        assert!(upcoming_dose(&[], today).is_none());
    }

    #[test]
    fn summary_counts_each_bucket() {
        let today = date(2024, 3, 10);
        let records = vec![
            rec("overdue", date(2024, 3, 1), VaccineStatus::Pending),
            rec("today", today, VaccineStatus::Pending),
            rec("future", date(2024, 5, 1), VaccineStatus::Pending),
            rec("done", date(2024, 1, 1), VaccineStatus::Completed),
        ];
        let summary = VaccineSummary::tally(&records, today);
        assert_eq!(
            summary,
            VaccineSummary {
                total: 4,
                pending: 3,
                completed: 1,
                overdue: 1,
                due_today: 1,
            }
        );
    }
}
