//! Profile service: the owner's baby profile and reminder address.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{BabyProfile, Clock, OwnerId, ProfileInput};
use crate::error::GatewayError;
use crate::persistence::ProfileStore;

/// Owner-scoped access to the baby profile.
///
/// The profile supplies the name and address the reminder scheduler
/// resolves; an owner without one never receives reminders.
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    /// Creates a new `ProfileService`.
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the owner's profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProfileNotFound`] if none is registered, or
    /// [`GatewayError::PersistenceError`] on storage failure.
    pub async fn get(&self, owner: OwnerId) -> Result<BabyProfile, GatewayError> {
        self.store
            .get_profile(owner)
            .await?
            .ok_or(GatewayError::ProfileNotFound(*owner.as_uuid()))
    }

    /// Registers the owner's profile, or revises the existing one.
    ///
    /// Returns the stored profile and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on invalid input or
    /// [`GatewayError::PersistenceError`] on storage failure.
    pub async fn upsert(
        &self,
        owner: OwnerId,
        input: ProfileInput,
    ) -> Result<(BabyProfile, bool), GatewayError> {
        let input = input.validated(self.clock.today())?;
        let now = Utc::now();

        let (profile, created) = match self.store.get_profile(owner).await? {
            Some(mut existing) => {
                existing.revise(input, now);
                (existing, false)
            }
            None => (BabyProfile::register(owner, input, now), true),
        };
        self.store.save_profile(&profile).await?;

        tracing::info!(
            %owner,
            created,
            has_contact = profile.contact_email.is_some(),
            "baby profile saved"
        );
        Ok((profile, created))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::FixedClock;
    use crate::persistence::InMemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("invalid test date {y}-{m}-{d}");
        };
        date
    }

    fn service() -> ProfileService {
        ProfileService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(FixedClock::new(date(2024, 3, 10))),
        )
    }

    fn input(name: &str, email: Option<&str>) -> ProfileInput {
        ProfileInput {
            baby_name: name.to_string(),
            birth_date: date(2024, 1, 5),
            gender: "female".to_string(),
            photo_url: None,
            contact_email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get(OwnerId::new()).await,
            Err(GatewayError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn first_upsert_creates_then_revises() {
        let service = service();
        let owner = OwnerId::new();

        let (created, is_new) =
            assert_ok!(service.upsert(owner, input("Ada", Some("ada@example.com"))).await);
        assert!(is_new);

        let (revised, is_new) = assert_ok!(service.upsert(owner, input("Ada L.", None)).await);
        assert!(!is_new);
        assert_eq!(revised.baby_name, "Ada L.");
        assert_eq!(revised.created_at, created.created_at);
        assert_eq!(revised.contact_email.as_deref(), Some("ada@example.com"));

        let stored = assert_ok!(service.get(owner).await);
        assert_eq!(stored.baby_name, "Ada L.");
    }

    #[tokio::test]
    async fn invalid_input_stores_nothing() {
        let service = service();
        let owner = OwnerId::new();
        assert_err!(service.upsert(owner, input("Ada", Some("not-an-email"))).await);
        assert!(matches!(
            service.get(owner).await,
            Err(GatewayError::ProfileNotFound(_))
        ));
    }
}
