//! Service layer: business logic orchestration.
//!
//! [`VaccineService`] runs the owner-scoped record operations, including
//! dose completion with optional follow-up scheduling.
//! [`ProfileService`] keeps the baby profile and reminder address the
//! scheduler resolves.
//! [`ReminderScheduler`] scans for doses due soon and sends one reminder
//! per dose, either on demand or from its own recurring task.
//! [`AdminService`] reports registry-wide counts to operators.

pub mod admin_service;
pub mod profile_service;
pub mod reminder_scheduler;
pub mod vaccine_service;

pub use admin_service::{AdminService, RegistryStats};
pub use profile_service::ProfileService;
pub use reminder_scheduler::{ReminderOutcome, ReminderScheduler, ScanReport, SchedulerHandle};
pub use vaccine_service::{CompletionOutcome, NextDose, VaccineService};
