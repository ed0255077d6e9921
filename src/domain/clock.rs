//! Injectable source of "today".
//!
//! Display status and reminder eligibility both depend on the current
//! calendar date. Services read it through [`Clock`] so tests can pin or
//! advance the date without waiting on the wall clock.

use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use chrono::{Days, NaiveDate, Utc};

/// Source of the current calendar date.
pub trait Clock: Send + Sync + Debug {
    /// Returns today's calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock reading today's date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Manually controlled clock. Clones share the same date.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Arc<RwLock<NaiveDate>>,
}

impl FixedClock {
    /// Creates a clock pinned to `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(RwLock::new(today)),
        }
    }

    /// Moves the clock to `date`.
    pub fn set(&self, date: NaiveDate) {
        let mut guard = self.today.write().unwrap_or_else(|e| e.into_inner());
        *guard = date;
    }

    /// Moves the clock forward by `days`. Saturates at the last representable date.
    pub fn advance_days(&self, days: u64) {
        let mut guard = self.today.write().unwrap_or_else(|e| e.into_inner());
        *guard = guard.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_shares_state_between_clones() {
        let Some(start) = NaiveDate::from_ymd_opt(2024, 2, 28) else {
            panic!("invalid date");
        };
        let clock = FixedClock::new(start);
        let other = clock.clone();
        other.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap_or(start));
    }
}
