//! In-process store for tests and database-less runs.
//!
//! Records live in a `Vec` behind a [`tokio::sync::RwLock`] so that
//! creation order is preserved; profiles and contacts are plain maps keyed
//! by [`OwnerId`]. Contacts live apart from profiles, as in the database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ContactResolver, ProfileResolver, ProfileStore, VaccineStore};
use crate::domain::{
    BabyProfile, OwnerId, ProfileCounts, ReminderWindow, VaccineId, VaccineRecord, VaccineUpdate,
    is_reminder_candidate,
};
use crate::error::GatewayError;

/// In-memory implementation of every persistence trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<VaccineRecord>>,
    profiles: RwLock<HashMap<OwnerId, BabyProfile>>,
    contacts: RwLock<HashMap<OwnerId, String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the contact address for `owner` without touching the profile.
    pub async fn put_contact(&self, owner: OwnerId, address: impl Into<String>) {
        self.contacts.write().await.insert(owner, address.into());
    }

    /// Returns a record regardless of owner.
    pub async fn find(&self, id: VaccineId) -> Option<VaccineRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VaccineStore for InMemoryStore {
    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<VaccineRecord>, GatewayError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn get(&self, owner: OwnerId, id: VaccineId) -> Result<VaccineRecord, GatewayError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id && r.owner_id == owner)
            .cloned()
            .ok_or(GatewayError::VaccineNotFound(*id.as_uuid()))
    }

    async fn insert(&self, record: &VaccineRecord) -> Result<(), GatewayError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(GatewayError::PersistenceError(format!(
                "vaccine {} already exists",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: VaccineId,
        update: VaccineUpdate,
    ) -> Result<VaccineRecord, GatewayError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner)
            .ok_or(GatewayError::VaccineNotFound(*id.as_uuid()))?;
        record.apply(update)?;
        Ok(record.clone())
    }

    async fn delete(&self, owner: OwnerId, id: VaccineId) -> Result<(), GatewayError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.id == id && r.owner_id == owner));
        if records.len() == before {
            return Err(GatewayError::VaccineNotFound(*id.as_uuid()));
        }
        Ok(())
    }

    async fn find_reminder_candidates(
        &self,
        window: &ReminderWindow,
    ) -> Result<Vec<VaccineRecord>, GatewayError> {
        let records = self.records.read().await;
        let mut candidates: Vec<VaccineRecord> = records
            .iter()
            .filter(|r| is_reminder_candidate(r, window))
            .cloned()
            .collect();
        candidates.sort_by_key(|r| r.due_date);
        Ok(candidates)
    }

    async fn mark_reminder_sent(&self, id: VaccineId) -> Result<bool, GatewayError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.reminder_sent => {
                record.reminder_sent = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_all(&self) -> Result<u64, GatewayError> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, owner: OwnerId) -> Result<Option<BabyProfile>, GatewayError> {
        let Some(mut profile) = self.profiles.read().await.get(&owner).cloned() else {
            return Ok(None);
        };
        profile.contact_email = self.contacts.read().await.get(&owner).cloned();
        Ok(Some(profile))
    }

    async fn save_profile(&self, profile: &BabyProfile) -> Result<(), GatewayError> {
        let mut stored = profile.clone();
        stored.contact_email = None;
        {
            let mut profiles = self.profiles.write().await;
            if let Some(existing) = profiles.get(&profile.owner_id) {
                stored.created_at = existing.created_at;
            }
            profiles.insert(profile.owner_id, stored);
        }
        if let Some(address) = &profile.contact_email {
            self.put_contact(profile.owner_id, address.clone()).await;
        }
        Ok(())
    }

    async fn profile_counts(&self, since: DateTime<Utc>) -> Result<ProfileCounts, GatewayError> {
        let profiles = self.profiles.read().await;
        Ok(ProfileCounts {
            total: profiles.len() as u64,
            registered_since: profiles.values().filter(|p| p.created_at >= since).count() as u64,
        })
    }
}

#[async_trait]
impl ProfileResolver for InMemoryStore {
    async fn display_name(&self, owner: OwnerId) -> Result<Option<String>, GatewayError> {
        Ok(self
            .profiles
            .read()
            .await
            .get(&owner)
            .map(|p| p.baby_name.clone()))
    }
}

#[async_trait]
impl ContactResolver for InMemoryStore {
    async fn contact_address(&self, owner: OwnerId) -> Result<Option<String>, GatewayError> {
        Ok(self.contacts.read().await.get(&owner).cloned())
    }
}
