//! Log-only sender for environments without a mail relay.

use async_trait::async_trait;

use super::{EmailTemplate, NotificationSender, ReminderNotice};
use crate::error::GatewayError;

/// Composes the reminder and writes it to the log instead of sending it.
/// Always succeeds.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    template: EmailTemplate,
}

impl LogNotifier {
    /// Creates a log-only sender.
    #[must_use]
    pub fn new(template: EmailTemplate) -> Self {
        Self { template }
    }
}

#[async_trait]
impl NotificationSender for LogNotifier {
    async fn send(&self, notice: &ReminderNotice) -> Result<(), GatewayError> {
        let message = self.template.compose(notice);
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            due_date = %notice.due_date,
            "reminder email (log only, no relay configured)"
        );
        Ok(())
    }
}
