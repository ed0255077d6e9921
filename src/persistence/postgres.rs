//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{
    PROFILE_COLUMNS, ProfileRow, VACCINE_COLUMNS, VaccineRow, profile_from_row, record_from_row,
};
use super::{ContactResolver, ProfileResolver, ProfileStore, VaccineStore};
use crate::domain::{
    BabyProfile, OwnerId, ProfileCounts, ReminderWindow, VaccineId, VaccineRecord, VaccineStatus,
    VaccineUpdate,
};
use crate::error::GatewayError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Implements [`VaccineStore`], [`ProfileStore`], [`ProfileResolver`] and
/// [`ContactResolver`] over the `vaccines`, `baby_profiles` and
/// `user_contacts` tables.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations under `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl VaccineStore for PostgresStore {
    async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<VaccineRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, VaccineRow>(&format!(
            "SELECT {VACCINE_COLUMNS} FROM vaccines WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn get(&self, owner: OwnerId, id: VaccineId) -> Result<VaccineRecord, GatewayError> {
        let row = sqlx::query_as::<_, VaccineRow>(&format!(
            "SELECT {VACCINE_COLUMNS} FROM vaccines WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(GatewayError::VaccineNotFound(*id.as_uuid()))?;

        record_from_row(row)
    }

    async fn insert(&self, record: &VaccineRecord) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO vaccines (id, user_id, vaccine_name, due_date, status, reminder_sent, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id.as_uuid())
        .bind(record.owner_id.as_uuid())
        .bind(&record.vaccine_name)
        .bind(record.due_date)
        .bind(record.status.as_db_str())
        .bind(record.reminder_sent)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: VaccineId,
        update: VaccineUpdate,
    ) -> Result<VaccineRecord, GatewayError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, VaccineRow>(&format!(
            "SELECT {VACCINE_COLUMNS} FROM vaccines WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GatewayError::VaccineNotFound(*id.as_uuid()))?;

        let mut record = record_from_row(row)?;
        record.apply(update)?;

        sqlx::query(
            "UPDATE vaccines SET vaccine_name = $1, due_date = $2, status = $3 \
             WHERE id = $4 AND user_id = $5",
        )
        .bind(&record.vaccine_name)
        .bind(record.due_date)
        .bind(record.status.as_db_str())
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn delete(&self, owner: OwnerId, id: VaccineId) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM vaccines WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::VaccineNotFound(*id.as_uuid()));
        }
        Ok(())
    }

    async fn find_reminder_candidates(
        &self,
        window: &ReminderWindow,
    ) -> Result<Vec<VaccineRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, VaccineRow>(&format!(
            "SELECT {VACCINE_COLUMNS} FROM vaccines \
             WHERE status = $1 AND reminder_sent = FALSE AND due_date >= $2 AND due_date <= $3 \
             ORDER BY due_date, created_at"
        ))
        .bind(VaccineStatus::Pending.as_db_str())
        .bind(window.from)
        .bind(window.to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn mark_reminder_sent(&self, id: VaccineId) -> Result<bool, GatewayError> {
        let result = sqlx::query(
            "UPDATE vaccines SET reminder_sent = TRUE WHERE id = $1 AND reminder_sent = FALSE",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_all(&self) -> Result<u64, GatewayError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vaccines")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, owner: OwnerId) -> Result<Option<BabyProfile>, GatewayError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM baby_profiles p \
             LEFT JOIN user_contacts c ON c.user_id = p.user_id \
             WHERE p.user_id = $1"
        ))
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(profile_from_row))
    }

    async fn save_profile(&self, profile: &BabyProfile) -> Result<(), GatewayError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO baby_profiles \
             (user_id, baby_name, birth_date, gender, photo_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id) DO UPDATE SET \
             baby_name = EXCLUDED.baby_name, birth_date = EXCLUDED.birth_date, \
             gender = EXCLUDED.gender, photo_url = EXCLUDED.photo_url, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(profile.owner_id.as_uuid())
        .bind(&profile.baby_name)
        .bind(profile.birth_date)
        .bind(&profile.gender)
        .bind(profile.photo_url.as_deref())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(email) = &profile.contact_email {
            sqlx::query(
                "INSERT INTO user_contacts (user_id, email) VALUES ($1, $2) \
                 ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email",
            )
            .bind(profile.owner_id.as_uuid())
            .bind(email)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn profile_counts(&self, since: DateTime<Utc>) -> Result<ProfileCounts, GatewayError> {
        let (total, recent) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE created_at >= $1) FROM baby_profiles",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProfileCounts {
            total: u64::try_from(total).unwrap_or_default(),
            registered_since: u64::try_from(recent).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ProfileResolver for PostgresStore {
    async fn display_name(&self, owner: OwnerId) -> Result<Option<String>, GatewayError> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT baby_name FROM baby_profiles WHERE user_id = $1 LIMIT 1",
        )
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(name.filter(|n| !n.trim().is_empty()))
    }
}

#[async_trait]
impl ContactResolver for PostgresStore {
    async fn contact_address(&self, owner: OwnerId) -> Result<Option<String>, GatewayError> {
        let email = sqlx::query_scalar::<_, String>(
            "SELECT email FROM user_contacts WHERE user_id = $1",
        )
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(email.filter(|e| !e.trim().is_empty()))
    }
}
