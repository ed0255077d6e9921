//! Operator statistics across all owners.

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Clock;
use crate::error::GatewayError;
use crate::persistence::{ProfileStore, VaccineStore};

/// Days counted as "recent" for registrations.
pub const RECENT_REGISTRATION_DAYS: u64 = 30;

/// Registry-wide counts for the operator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistryStats {
    /// Date the counts were taken.
    pub as_of: NaiveDate,
    /// Registered baby profiles.
    pub total_profiles: u64,
    /// Vaccine records, open and completed.
    pub total_vaccines: u64,
    /// Profiles registered within the last [`RECENT_REGISTRATION_DAYS`] days.
    pub recent_registrations: u64,
}

/// Read-only aggregates for operators.
#[derive(Debug, Clone)]
pub struct AdminService {
    profiles: Arc<dyn ProfileStore>,
    vaccines: Arc<dyn VaccineStore>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    /// Creates a new `AdminService`.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        vaccines: Arc<dyn VaccineStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            vaccines,
            clock,
        }
    }

    /// Counts profiles, vaccines and recent registrations.
    ///
    /// "Recent" starts at midnight UTC [`RECENT_REGISTRATION_DAYS`] days
    /// before today.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    pub async fn stats(&self) -> Result<RegistryStats, GatewayError> {
        let today = self.clock.today();
        let cutoff = today
            .checked_sub_days(Days::new(RECENT_REGISTRATION_DAYS))
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let profiles = self.profiles.profile_counts(cutoff).await?;
        let total_vaccines = self.vaccines.count_all().await?;

        Ok(RegistryStats {
            as_of: today,
            total_profiles: profiles.total,
            total_vaccines,
            recent_registrations: profiles.registered_since,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{Duration, Utc};
    use tokio_test::assert_ok;

    use super::*;
    use crate::domain::{
        BabyProfile, FixedClock, NewVaccine, OwnerId, ProfileInput, VaccineRecord,
    };
    use crate::persistence::InMemoryStore;

    fn profile(name: &str, registered_days_ago: i64) -> BabyProfile {
        let Some(born) = NaiveDate::from_ymd_opt(2023, 6, 1) else {
            panic!("invalid date");
        };
        let input = ProfileInput {
            baby_name: name.to_string(),
            birth_date: born,
            gender: "male".to_string(),
            photo_url: None,
            contact_email: None,
        };
        BabyProfile::register(
            OwnerId::new(),
            input,
            Utc::now() - Duration::days(registered_days_ago),
        )
    }

    #[tokio::test]
    async fn counts_profiles_vaccines_and_recent_registrations() {
        let store = Arc::new(InMemoryStore::new());
        for (name, age) in [("Ada", 2), ("Bo", 10), ("Cy", 90)] {
            assert_ok!(store.save_profile(&profile(name, age)).await);
        }
        let owner = OwnerId::new();
        let due = Utc::now().date_naive();
        for name in ["MMR", "Polio"] {
            let record = VaccineRecord::new(owner, NewVaccine::pending(name, due));
            assert_ok!(store.insert(&record).await);
        }

        let profiles: Arc<InMemoryStore> = Arc::clone(&store);
        let service = AdminService::new(
            profiles,
            store,
            Arc::new(FixedClock::new(Utc::now().date_naive())),
        );
        let stats = assert_ok!(service.stats().await);
        assert_eq!(stats.total_profiles, 3);
        assert_eq!(stats.total_vaccines, 2);
        assert_eq!(stats.recent_registrations, 2);
    }
}
