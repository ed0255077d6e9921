//! HTTP mail-relay sender built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;

use super::{EmailTemplate, NotificationSender, ReminderNotice};
use crate::error::GatewayError;

/// Posts composed reminder emails as JSON to a mail relay endpoint.
///
/// The request body is an [`super::EmailMessage`]. Any non-2xx response,
/// transport error or timeout is a [`GatewayError::DeliveryFailure`].
#[derive(Debug, Clone)]
pub struct HttpRelayNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    template: EmailTemplate,
}

impl HttpRelayNotifier {
    /// Creates a relay sender with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        template: EmailTemplate,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            template,
        })
    }

    /// Relay endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationSender for HttpRelayNotifier {
    async fn send(&self, notice: &ReminderNotice) -> Result<(), GatewayError> {
        let message = self.template.compose(notice);

        let mut request = self.client.post(&self.endpoint).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::DeliveryFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::DeliveryFailure(format!(
                "relay responded with {status}"
            )));
        }

        tracing::debug!(to = %notice.address, %status, "reminder accepted by relay");
        Ok(())
    }
}
