//! Reminder scheduler: periodic scan for doses due soon, one reminder each.
//!
//! A scan selects pending, not-yet-reminded doses due within the horizon,
//! resolves the owner's baby name and contact address, hands a
//! [`ReminderNotice`] to the [`NotificationSender`] and on success flips
//! `reminder_sent`. Every record is handled independently: a missing
//! profile, a failed delivery or a failed write only affects that record,
//! which stays eligible for the next scan while it is inside the window.
//!
//! Scans within one process are serialized. Running the scheduler in more
//! than one process against the same store can send duplicate reminders.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use utoipa::ToSchema;

use crate::domain::reminder::DEFAULT_HORIZON_DAYS;
use crate::domain::{Clock, ReminderWindow, VaccineRecord, is_reminder_candidate};
use crate::error::GatewayError;
use crate::notify::{NotificationSender, ReminderNotice};
use crate::persistence::{ContactResolver, ProfileResolver, VaccineStore};

/// Counts produced by one reminder scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScanReport {
    /// Calendar date the scan ran for.
    pub scanned_on: NaiveDate,
    /// Due-date window that was scanned.
    pub window: ReminderWindow,
    /// Records selected for a reminder.
    pub candidates: usize,
    /// Reminders delivered and recorded.
    pub sent: usize,
    /// Skipped because the owner has no baby profile.
    pub skipped_missing_profile: usize,
    /// Skipped because the owner has no contact address.
    pub skipped_missing_contact: usize,
    /// Delivery was attempted and failed.
    pub delivery_failed: usize,
    /// Delivered, but the sent flag could not be written.
    pub mark_failed: usize,
}

impl ScanReport {
    fn empty(window: ReminderWindow) -> Self {
        Self {
            scanned_on: window.from,
            window,
            candidates: 0,
            sent: 0,
            skipped_missing_profile: 0,
            skipped_missing_contact: 0,
            delivery_failed: 0,
            mark_failed: 0,
        }
    }

    fn record(&mut self, outcome: ReminderOutcome) {
        let counter = match outcome {
            ReminderOutcome::Sent => &mut self.sent,
            ReminderOutcome::MissingProfile => &mut self.skipped_missing_profile,
            ReminderOutcome::MissingContact => &mut self.skipped_missing_contact,
            ReminderOutcome::DeliveryFailed => &mut self.delivery_failed,
            ReminderOutcome::MarkFailed => &mut self.mark_failed,
        };
        *counter += 1;
    }
}

/// What happened to a single candidate during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// Delivered and flagged as sent.
    Sent,
    /// No display name for the owner.
    MissingProfile,
    /// No delivery address for the owner.
    MissingContact,
    /// The sender rejected the notice.
    DeliveryFailed,
    /// Delivered, but the flag write failed.
    MarkFailed,
}

/// Finds doses due soon and sends one reminder per dose.
#[derive(Debug)]
pub struct ReminderScheduler {
    store: Arc<dyn VaccineStore>,
    profiles: Arc<dyn ProfileResolver>,
    contacts: Arc<dyn ContactResolver>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    horizon_days: u32,
    scan_gate: Mutex<()>,
    scans_completed: AtomicU64,
}

impl ReminderScheduler {
    /// Creates a scheduler with the default 3-day horizon.
    #[must_use]
    pub fn new(
        store: Arc<dyn VaccineStore>,
        profiles: Arc<dyn ProfileResolver>,
        contacts: Arc<dyn ContactResolver>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            profiles,
            contacts,
            notifier,
            clock,
            horizon_days: DEFAULT_HORIZON_DAYS,
            scan_gate: Mutex::new(()),
            scans_completed: AtomicU64::new(0),
        }
    }

    /// Overrides the look-ahead horizon in days.
    #[must_use]
    pub fn with_horizon_days(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Look-ahead horizon in days.
    #[must_use]
    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Number of scans that ran to completion since start.
    #[must_use]
    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    /// Runs one scan over every eligible record.
    ///
    /// Per-record failures are counted in the report and never abort the
    /// scan.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ScanInProgress`] if another scan is running
    /// in this process, or [`GatewayError::PersistenceError`] if the
    /// candidate query fails.
    pub async fn run_scan(&self) -> Result<ScanReport, GatewayError> {
        let Ok(_guard) = self.scan_gate.try_lock() else {
            tracing::warn!("reminder scan requested while another is running");
            return Err(GatewayError::ScanInProgress);
        };

        let window = ReminderWindow::starting(self.clock.today(), self.horizon_days)?;
        let mut candidates = self.store.find_reminder_candidates(&window).await?;
        candidates.retain(|record| is_reminder_candidate(record, &window));

        let mut report = ScanReport::empty(window);
        report.candidates = candidates.len();
        for record in &candidates {
            report.record(self.dispatch(record).await);
        }

        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            scanned_on = %report.scanned_on,
            candidates = report.candidates,
            sent = report.sent,
            skipped = report.skipped_missing_profile + report.skipped_missing_contact,
            delivery_failed = report.delivery_failed,
            mark_failed = report.mark_failed,
            "reminder scan finished"
        );
        Ok(report)
    }

    async fn dispatch(&self, record: &VaccineRecord) -> ReminderOutcome {
        let owner = record.owner_id;

        let display_name = match self.profiles.display_name(owner).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                let e = GatewayError::ProfileNotFound(*owner.as_uuid());
                tracing::warn!(vaccine_id = %record.id, error = %e, "reminder skipped");
                return ReminderOutcome::MissingProfile;
            }
            Err(e) => {
                tracing::warn!(vaccine_id = %record.id, error = %e, "profile lookup failed, reminder skipped");
                return ReminderOutcome::MissingProfile;
            }
        };

        let address = match self.contacts.contact_address(owner).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                let e = GatewayError::ContactNotFound(*owner.as_uuid());
                tracing::warn!(vaccine_id = %record.id, error = %e, "reminder skipped");
                return ReminderOutcome::MissingContact;
            }
            Err(e) => {
                tracing::warn!(vaccine_id = %record.id, error = %e, "contact lookup failed, reminder skipped");
                return ReminderOutcome::MissingContact;
            }
        };

        let notice = ReminderNotice {
            address,
            display_name,
            vaccine_name: record.vaccine_name.clone(),
            due_date: record.due_date,
        };
        if let Err(e) = self.notifier.send(&notice).await {
            tracing::warn!(vaccine_id = %record.id, error = %e, "reminder delivery failed");
            return ReminderOutcome::DeliveryFailed;
        }

        match self.store.mark_reminder_sent(record.id).await {
            Ok(true) => {
                tracing::info!(vaccine_id = %record.id, owner_id = %owner, due_date = %record.due_date, "reminder sent");
                ReminderOutcome::Sent
            }
            Ok(false) => {
                tracing::warn!(vaccine_id = %record.id, "reminder sent but record was already flagged or removed");
                ReminderOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(vaccine_id = %record.id, error = %e, "reminder sent but flag write failed");
                ReminderOutcome::MarkFailed
            }
        }
    }

    /// Starts the recurring scan task.
    ///
    /// The first scan runs immediately, then one every `period`. Ticks
    /// missed while a scan is running are skipped.
    #[must_use]
    pub fn spawn(self: Arc<Self>, period: Duration) -> SchedulerHandle {
        let period = period.max(Duration::from_millis(1));
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(period_secs = period.as_secs(), horizon_days = self.horizon_days, "reminder scheduler started");

            loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        // Err: every handle is gone
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_scan().await {
                            tracing::warn!(error = %e, "reminder scan failed");
                        }
                    }
                }
            }

            tracing::info!("reminder scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}

/// Owner of the recurring scan task. Dropping it also stops the task.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the timer and waits for an in-flight scan to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "reminder scheduler task ended abnormally");
        }
    }

    /// Returns `true` once the scan task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::{
        BabyProfile, FixedClock, NewVaccine, OwnerId, ProfileInput, VaccineId, VaccineUpdate,
    };
    use crate::persistence::{InMemoryStore, ProfileStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("invalid test date {y}-{m}-{d}");
        };
        date
    }

    fn today() -> NaiveDate {
        date(2024, 3, 10)
    }

    /// Records every notice; fails while `fail` is set.
    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: std::sync::Mutex<Vec<ReminderNotice>>,
        fail: AtomicBool,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<ReminderNotice> {
            self.sent.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingNotifier {
        async fn send(&self, notice: &ReminderNotice) -> Result<(), GatewayError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(GatewayError::DeliveryFailure("relay down".to_string()));
            }
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(notice.clone());
            }
            Ok(())
        }
    }

    /// Blocks each send until released.
    #[derive(Debug, Default)]
    struct GatedNotifier {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl NotificationSender for GatedNotifier {
        async fn send(&self, _notice: &ReminderNotice) -> Result<(), GatewayError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    /// Store whose sent-flag writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyFlagStore {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl VaccineStore for ReadOnlyFlagStore {
        async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<VaccineRecord>, GatewayError> {
            self.inner.list_for_owner(owner).await
        }
        async fn get(&self, owner: OwnerId, id: VaccineId) -> Result<VaccineRecord, GatewayError> {
            self.inner.get(owner, id).await
        }
        async fn insert(&self, record: &VaccineRecord) -> Result<(), GatewayError> {
            self.inner.insert(record).await
        }
        async fn update(
            &self,
            owner: OwnerId,
            id: VaccineId,
            update: VaccineUpdate,
        ) -> Result<VaccineRecord, GatewayError> {
            self.inner.update(owner, id, update).await
        }
        async fn delete(&self, owner: OwnerId, id: VaccineId) -> Result<(), GatewayError> {
            self.inner.delete(owner, id).await
        }
        async fn find_reminder_candidates(
            &self,
            window: &ReminderWindow,
        ) -> Result<Vec<VaccineRecord>, GatewayError> {
            self.inner.find_reminder_candidates(window).await
        }
        async fn mark_reminder_sent(&self, _id: VaccineId) -> Result<bool, GatewayError> {
            Err(GatewayError::PersistenceError("connection reset".to_string()))
        }
        async fn count_all(&self) -> Result<u64, GatewayError> {
            self.inner.count_all().await
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
        clock: FixedClock,
        scheduler: Arc<ReminderScheduler>,
    }

    /// Scheduler whose store and both resolvers are `store`.
    fn scheduler_over<N: NotificationSender + 'static>(
        store: &Arc<InMemoryStore>,
        notifier: &Arc<N>,
        clock: &FixedClock,
    ) -> ReminderScheduler {
        let vaccines: Arc<InMemoryStore> = Arc::clone(store);
        let profiles: Arc<InMemoryStore> = Arc::clone(store);
        let contacts: Arc<InMemoryStore> = Arc::clone(store);
        let notifier: Arc<N> = Arc::clone(notifier);
        ReminderScheduler::new(vaccines, profiles, contacts, notifier, Arc::new(clock.clone()))
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = FixedClock::new(today());
        let scheduler = Arc::new(scheduler_over(&store, &notifier, &clock));
        Fixture {
            store,
            notifier,
            clock,
            scheduler,
        }
    }

    async fn put_profile(store: &InMemoryStore, owner: OwnerId, baby: &str) {
        let input = ProfileInput {
            baby_name: baby.to_string(),
            birth_date: date(2024, 1, 5),
            gender: "female".to_string(),
            photo_url: None,
            contact_email: None,
        };
        let profile = BabyProfile::register(owner, input, chrono::Utc::now());
        assert_ok!(store.save_profile(&profile).await);
    }

    /// Adds an owner with a profile and contact plus one pending dose.
    async fn seed(store: &InMemoryStore, baby: &str, due: NaiveDate) -> VaccineId {
        let owner = OwnerId::new();
        put_profile(store, owner, baby).await;
        store.put_contact(owner, format!("{}@example.com", baby.to_lowercase())).await;
        seed_dose(store, owner, "MMR", due).await
    }

    async fn seed_dose(store: &InMemoryStore, owner: OwnerId, name: &str, due: NaiveDate) -> VaccineId {
        let record = VaccineRecord::new(owner, NewVaccine::pending(name, due));
        let id = record.id;
        assert_ok!(store.insert(&record).await);
        id
    }

    async fn reminded(store: &InMemoryStore, id: VaccineId) -> bool {
        let Some(record) = store.find(id).await else {
            panic!("record {id} missing");
        };
        record.reminder_sent
    }

    #[tokio::test]
    async fn due_today_is_reminded_once() {
        let f = fixture();
        let id = seed(&f.store, "Ada", today()).await;

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.candidates, 1);
        assert_eq!(report.sent, 1);
        assert!(reminded(&f.store, id).await);

        let sent = f.notifier.sent();
        assert_eq!(sent.len(), 1);
        let Some(notice) = sent.first() else {
            panic!("no notice");
        };
        assert_eq!(notice.due_date, today());
        assert_eq!(notice.display_name, "Ada");
        assert_eq!(notice.address, "ada@example.com");
        assert_eq!(notice.vaccine_name, "MMR");

        let second = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(second.candidates, 0);
        assert_eq!(f.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn horizon_bounds_are_inclusive() {
        let f = fixture();
        let Some(edge) = today().checked_add_days(chrono::Days::new(3)) else {
            panic!("date overflow");
        };
        let Some(beyond) = today().checked_add_days(chrono::Days::new(4)) else {
            panic!("date overflow");
        };
        let inside = seed(&f.store, "Ada", edge).await;
        let outside = seed(&f.store, "Bo", beyond).await;

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.window.to, edge);
        assert_eq!(report.sent, 1);
        assert!(reminded(&f.store, inside).await);
        assert!(!reminded(&f.store, outside).await);
    }

    #[tokio::test]
    async fn long_overdue_dose_is_not_selected() {
        let f = fixture();
        let Some(past) = today().checked_sub_days(chrono::Days::new(10)) else {
            panic!("date overflow");
        };
        let id = seed(&f.store, "Ada", past).await;

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.candidates, 0);
        assert!(!reminded(&f.store, id).await);
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn completed_dose_is_not_selected() {
        let f = fixture();
        let owner = OwnerId::new();
        put_profile(&f.store, owner, "Ada").await;
        f.store.put_contact(owner, "ada@example.com").await;
        let id = seed_dose(&f.store, owner, "MMR", today()).await;
        assert_ok!(f.store.update(owner, id, VaccineUpdate::complete()).await);

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.candidates, 0);
    }

    #[tokio::test]
    async fn missing_profile_skips_only_that_record() {
        let f = fixture();
        let first = seed(&f.store, "Ada", today()).await;

        let orphan_owner = OwnerId::new();
        f.store.put_contact(orphan_owner, "orphan@example.com").await;
        let Some(tomorrow) = today().succ_opt() else {
            panic!("date overflow");
        };
        let second = seed_dose(&f.store, orphan_owner, "Polio", tomorrow).await;

        let Some(later) = tomorrow.succ_opt() else {
            panic!("date overflow");
        };
        let third = seed(&f.store, "Cy", later).await;

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.candidates, 3);
        assert_eq!(report.sent, 2);
        assert_eq!(report.skipped_missing_profile, 1);
        assert!(reminded(&f.store, first).await);
        assert!(!reminded(&f.store, second).await);
        assert!(reminded(&f.store, third).await);
    }

    #[tokio::test]
    async fn missing_contact_is_skipped_and_retried() {
        let f = fixture();
        let owner = OwnerId::new();
        put_profile(&f.store, owner, "Ada").await;
        let id = seed_dose(&f.store, owner, "MMR", today()).await;

        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.skipped_missing_contact, 1);
        assert!(!reminded(&f.store, id).await);

        f.store.put_contact(owner, "ada@example.com").await;
        let report = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(report.sent, 1);
        assert!(reminded(&f.store, id).await);
    }

    #[tokio::test]
    async fn delivery_failure_keeps_record_eligible_until_due_date_passes() {
        let f = fixture();
        let Some(due) = today().succ_opt() else {
            panic!("date overflow");
        };
        let id = seed(&f.store, "Ada", due).await;
        f.notifier.fail.store(true, Ordering::SeqCst);

        let first = assert_ok!(f.scheduler.run_scan().await);
        let second = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(first.delivery_failed, 1);
        assert_eq!(second.candidates, first.candidates);
        assert!(!reminded(&f.store, id).await);

        f.clock.advance_days(2);
        let after_due = assert_ok!(f.scheduler.run_scan().await);
        assert_eq!(after_due.candidates, 0);
        assert!(!reminded(&f.store, id).await);
    }

    #[tokio::test]
    async fn flag_write_failure_is_counted() {
        let store = Arc::new(ReadOnlyFlagStore::default());
        let resolvers = Arc::new(InMemoryStore::new());
        let owner = OwnerId::new();
        put_profile(&resolvers, owner, "Ada").await;
        resolvers.put_contact(owner, "ada@example.com").await;
        let id = seed_dose(&store.inner, owner, "MMR", today()).await;

        let notifier = Arc::new(RecordingNotifier::default());
        let vaccines: Arc<ReadOnlyFlagStore> = Arc::clone(&store);
        let profiles: Arc<InMemoryStore> = Arc::clone(&resolvers);
        let sender: Arc<RecordingNotifier> = Arc::clone(&notifier);
        let scheduler = ReminderScheduler::new(
            vaccines,
            profiles,
            resolvers,
            sender,
            Arc::new(FixedClock::new(today())),
        );
        let report = assert_ok!(scheduler.run_scan().await);
        assert_eq!(report.mark_failed, 1);
        assert_eq!(report.sent, 0);
        assert_eq!(notifier.sent().len(), 1);
        assert!(!reminded(&store.inner, id).await);
    }

    #[tokio::test]
    async fn custom_horizon_widens_window() {
        let f = fixture();
        let scheduler = scheduler_over(&f.store, &f.notifier, &f.clock).with_horizon_days(7);
        assert_eq!(scheduler.horizon_days(), 7);

        let Some(due) = today().checked_add_days(chrono::Days::new(6)) else {
            panic!("date overflow");
        };
        seed(&f.store, "Ada", due).await;
        let report = assert_ok!(scheduler.run_scan().await);
        assert_eq!(report.sent, 1);
    }

    #[tokio::test]
    async fn concurrent_scan_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(GatedNotifier::default());
        let scheduler = Arc::new(scheduler_over(&store, &notifier, &FixedClock::new(today())));
        let id = seed(&store, "Ada", today()).await;

        let running = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            async move { scheduler.run_scan().await }
        });
        notifier.entered.notified().await;

        let rejected = assert_err!(scheduler.run_scan().await);
        assert!(matches!(rejected, GatewayError::ScanInProgress));
        assert!(!reminded(&store, id).await);

        notifier.release.notify_one();
        let Ok(result) = running.await else {
            panic!("scan task panicked");
        };
        let report = assert_ok!(result);
        assert_eq!(report.sent, 1);
        assert_eq!(scheduler.scans_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_scans_immediately_then_every_period() {
        let f = fixture();
        let handle = Arc::clone(&f.scheduler).spawn(Duration::from_secs(3600));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(f.scheduler.scans_completed(), 1);

        tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
        assert_eq!(f.scheduler.scans_completed(), 3);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(3 * 3600)).await;
        assert_eq!(f.scheduler.scans_completed(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let f = fixture();
        let handle = Arc::clone(&f.scheduler).spawn(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(f.scheduler.scans_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_delivers_reminders() {
        let f = fixture();
        let id = seed(&f.store, "Ada", today()).await;
        let handle = Arc::clone(&f.scheduler).spawn(Duration::from_secs(3600));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(reminded(&f.store, id).await);
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }
}
