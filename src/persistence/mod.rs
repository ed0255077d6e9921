//! Persistence layer: vaccine record store, baby profile store and owner
//! lookups.
//!
//! The service and the reminder scheduler only see the traits defined here.
//! [`postgres::PostgresStore`] backs them with `sqlx::PgPool`;
//! [`memory::InMemoryStore`] keeps everything in process for tests and for
//! running without a database.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    BabyProfile, OwnerId, ProfileCounts, ReminderWindow, VaccineId, VaccineRecord, VaccineUpdate,
};
use crate::error::GatewayError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Durable storage of vaccine records.
///
/// Owner-facing operations are scoped by [`OwnerId`]: a record owned by
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait VaccineStore: Send + Sync + Debug {
    /// Returns every record owned by `owner`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<VaccineRecord>, GatewayError>;

    /// Returns one record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`] if no such record exists for
    /// `owner`, or [`GatewayError::PersistenceError`] on storage failure.
    async fn get(&self, owner: OwnerId, id: VaccineId) -> Result<VaccineRecord, GatewayError>;

    /// Stores a newly built record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn insert(&self, record: &VaccineRecord) -> Result<(), GatewayError>;

    /// Applies a partial update through [`VaccineRecord::apply`] and returns
    /// the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`],
    /// [`GatewayError::InvalidTransition`], [`GatewayError::InvalidRequest`]
    /// or [`GatewayError::PersistenceError`].
    async fn update(
        &self,
        owner: OwnerId,
        id: VaccineId,
        update: VaccineUpdate,
    ) -> Result<VaccineRecord, GatewayError>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`] or
    /// [`GatewayError::PersistenceError`].
    async fn delete(&self, owner: OwnerId, id: VaccineId) -> Result<(), GatewayError>;

    /// Returns all pending, not yet reminded records due inside `window`,
    /// across all owners, ordered by due date.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn find_reminder_candidates(
        &self,
        window: &ReminderWindow,
    ) -> Result<Vec<VaccineRecord>, GatewayError>;

    /// Sets `reminder_sent = true` on a record.
    ///
    /// Returns `false` when the flag was already set or the record is gone.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn mark_reminder_sent(&self, id: VaccineId) -> Result<bool, GatewayError>;

    /// Number of records across all owners.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn count_all(&self) -> Result<u64, GatewayError>;
}

/// Durable storage of baby profiles and their contact addresses.
///
/// Writes through this trait are what [`ProfileResolver`] and
/// [`ContactResolver`] later read.
#[async_trait]
pub trait ProfileStore: Send + Sync + Debug {
    /// Returns the owner's profile with its contact address, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn get_profile(&self, owner: OwnerId) -> Result<Option<BabyProfile>, GatewayError>;

    /// Inserts or replaces the owner's profile.
    ///
    /// The first registration time is never overwritten. A profile without
    /// a contact address leaves the stored address untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn save_profile(&self, profile: &BabyProfile) -> Result<(), GatewayError>;

    /// Counts all profiles and those registered at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    async fn profile_counts(&self, since: DateTime<Utc>) -> Result<ProfileCounts, GatewayError>;
}

/// Resolves an owner's baby profile display name.
#[async_trait]
pub trait ProfileResolver: Send + Sync + Debug {
    /// Returns the display name, or `None` if the owner has no profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the lookup fails.
    async fn display_name(&self, owner: OwnerId) -> Result<Option<String>, GatewayError>;
}

/// Resolves an owner's deliverable contact address.
#[async_trait]
pub trait ContactResolver: Send + Sync + Debug {
    /// Returns the address, or `None` if none is on file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the lookup fails.
    async fn contact_address(&self, owner: OwnerId) -> Result<Option<String>, GatewayError>;
}
