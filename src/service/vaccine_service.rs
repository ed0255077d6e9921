//! Vaccine service: owner-scoped record operations and dose completion.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::schedule::{next_dose, sort_for_display, upcoming_dose};
use crate::domain::{
    Clock, NewVaccine, OwnerId, VaccineId, VaccineRecord, VaccineSummary, VaccineUpdate,
};
use crate::error::GatewayError;
use crate::persistence::VaccineStore;

/// Result of the optional follow-up dose step of [`VaccineService::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextDose {
    /// The caller asked for no follow-up dose.
    Skipped,
    /// A follow-up dose was created.
    Scheduled(VaccineRecord),
    /// Creating the follow-up dose failed. The completion itself stands.
    Failed(String),
}

/// Outcome of completing a dose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The dose, now completed.
    pub completed: VaccineRecord,
    /// What happened to the follow-up dose.
    pub next_dose: NextDose,
}

/// Orchestration layer for vaccine record operations.
///
/// Every operation is scoped to the caller's [`OwnerId`]; authorization
/// has already happened upstream. "Today" comes from the injected
/// [`Clock`].
#[derive(Debug, Clone)]
pub struct VaccineService {
    store: Arc<dyn VaccineStore>,
    clock: Arc<dyn Clock>,
}

impl VaccineService {
    /// Creates a new `VaccineService`.
    #[must_use]
    pub fn new(store: Arc<dyn VaccineStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current calendar date according to the service clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Lists the owner's records in display order: open doses first, then
    /// completed ones, each by ascending due date.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list(&self, owner: OwnerId) -> Result<Vec<VaccineRecord>, GatewayError> {
        let mut records = self.store.list_for_owner(owner).await?;
        sort_for_display(&mut records);
        Ok(records)
    }

    /// Returns a single record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`] if the owner has no such record.
    pub async fn get(&self, owner: OwnerId, id: VaccineId) -> Result<VaccineRecord, GatewayError> {
        self.store.get(owner, id).await
    }

    /// Schedules a dose.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on invalid input or
    /// [`GatewayError::PersistenceError`] on storage failure.
    pub async fn create(
        &self,
        owner: OwnerId,
        input: NewVaccine,
    ) -> Result<VaccineRecord, GatewayError> {
        let record = VaccineRecord::new(owner, input.validated()?);
        self.store.insert(&record).await?;
        tracing::info!(vaccine_id = %record.id, %owner, due_date = %record.due_date, "vaccine scheduled");
        Ok(record)
    }

    /// Edits a dose.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty or invalid
    /// update, [`GatewayError::InvalidTransition`] for a status change on a
    /// completed dose, or [`GatewayError::VaccineNotFound`].
    pub async fn update(
        &self,
        owner: OwnerId,
        id: VaccineId,
        update: VaccineUpdate,
    ) -> Result<VaccineRecord, GatewayError> {
        if update.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "update must set at least one field".to_string(),
            ));
        }
        let record = self.store.update(owner, id, update).await?;
        tracing::info!(vaccine_id = %id, %owner, "vaccine updated");
        Ok(record)
    }

    /// Marks a dose completed and, when `schedule_next` is set, creates the
    /// follow-up dose one calendar month later.
    ///
    /// A failure while creating the follow-up dose is reported in
    /// [`CompletionOutcome::next_dose`] and does not undo the completion.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`],
    /// [`GatewayError::InvalidTransition`] if the dose is already completed,
    /// or [`GatewayError::PersistenceError`] if the completion itself could
    /// not be stored.
    pub async fn complete(
        &self,
        owner: OwnerId,
        id: VaccineId,
        schedule_next: bool,
    ) -> Result<CompletionOutcome, GatewayError> {
        let completed = self.store.update(owner, id, VaccineUpdate::complete()).await?;
        tracing::info!(vaccine_id = %id, %owner, "vaccine completed");

        let next_dose = if schedule_next {
            match self.schedule_next_dose(&completed).await {
                Ok(next) => {
                    tracing::info!(
                        vaccine_id = %next.id,
                        previous_id = %id,
                        due_date = %next.due_date,
                        name = %next.vaccine_name,
                        "next dose scheduled"
                    );
                    NextDose::Scheduled(next)
                }
                Err(e) => {
                    tracing::warn!(vaccine_id = %id, error = %e, "failed to schedule next dose");
                    NextDose::Failed(e.to_string())
                }
            }
        } else {
            NextDose::Skipped
        };

        Ok(CompletionOutcome {
            completed,
            next_dose,
        })
    }

    async fn schedule_next_dose(
        &self,
        completed: &VaccineRecord,
    ) -> Result<VaccineRecord, GatewayError> {
        let next = VaccineRecord::new(completed.owner_id, next_dose(completed)?);
        self.store.insert(&next).await?;
        Ok(next)
    }

    /// Deletes a dose.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VaccineNotFound`] if the owner has no such record.
    pub async fn delete(&self, owner: OwnerId, id: VaccineId) -> Result<(), GatewayError> {
        self.store.delete(owner, id).await?;
        tracing::info!(vaccine_id = %id, %owner, "vaccine deleted");
        Ok(())
    }

    /// Returns the next upcoming pending dose, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    pub async fn upcoming(&self, owner: OwnerId) -> Result<Option<VaccineRecord>, GatewayError> {
        let records = self.list(owner).await?;
        Ok(upcoming_dose(&records, self.today()).cloned())
    }

    /// Returns dashboard counts and the next upcoming dose.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on storage failure.
    pub async fn summary(
        &self,
        owner: OwnerId,
    ) -> Result<(VaccineSummary, Option<VaccineRecord>), GatewayError> {
        let records = self.list(owner).await?;
        let today = self.today();
        let summary = VaccineSummary::tally(&records, today);
        Ok((summary, upcoming_dose(&records, today).cloned()))
    }
}
