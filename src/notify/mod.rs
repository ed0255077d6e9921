//! Notification delivery for vaccine reminders.
//!
//! The reminder scheduler hands a [`ReminderNotice`] to a
//! [`NotificationSender`]. [`HttpRelayNotifier`] posts a composed email to
//! an HTTP mail relay; [`LogNotifier`] only logs it and is used when no
//! relay is configured.

pub mod email;
pub mod log;
pub mod relay;

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::GatewayError;

pub use email::{EmailMessage, EmailTemplate};
pub use log::LogNotifier;
pub use relay::HttpRelayNotifier;

/// Everything a reminder needs to name: who to send it to, whose dose it is,
/// which vaccine and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderNotice {
    /// Delivery address.
    pub address: String,
    /// Baby profile display name.
    pub display_name: String,
    /// Vaccine label.
    pub vaccine_name: String,
    /// Calendar date the dose is due.
    pub due_date: NaiveDate,
}

/// Delivers reminder notices.
///
/// Implementations do not retry; a failed send is retried by the next
/// reminder scan as long as the dose is still inside the window.
#[async_trait]
pub trait NotificationSender: Send + Sync + Debug {
    /// Delivers one notice.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeliveryFailure`] if the message was not accepted.
    async fn send(&self, notice: &ReminderNotice) -> Result<(), GatewayError>;
}
