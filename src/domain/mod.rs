//! Domain layer: vaccine records, baby profiles, dose scheduling, and
//! reminder rules.
//!
//! Everything here is synchronous and free of I/O. "Today" is always an
//! explicit argument or comes from an injected [`Clock`], so every rule
//! can be evaluated for any date.

pub mod clock;
pub mod dose_name;
pub mod owner_id;
pub mod profile;
pub mod reminder;
pub mod schedule;
pub mod vaccine;
pub mod vaccine_id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use owner_id::OwnerId;
pub use profile::{BabyProfile, ProfileCounts, ProfileInput};
pub use reminder::{ReminderWindow, is_reminder_candidate};
pub use schedule::VaccineSummary;
pub use vaccine::{
    DisplayStatus, NewVaccine, VaccineRecord, VaccineStatus, VaccineUpdate, derive_status,
};
pub use vaccine_id::VaccineId;
