//! Concrete notification sinks.

use pushguard_app::{DeliveryError, Notification, NotificationSink};
use pushguard_settings::vars;
use std::time::Duration;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts the notification JSON to an incoming-webhook URL.
pub struct WebhookSink {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl NotificationSink for WebhookSink {
    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&notification.to_webhook_json())
            .send()
            .map_err(|e| DeliveryError::new("webhook request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DeliveryError::new(
                "webhook rejected notification",
                format!("HTTP {status}: {body}"),
            ));
        }
        tracing::debug!(%status, "webhook accepted notification");
        Ok(())
    }
}

/// `--dry-run`: prints the webhook JSON to stdout.
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let body = serde_json::to_string_pretty(&notification.to_webhook_json())
            .map_err(|e| DeliveryError::new("serialize notification", e))?;
        println!("{body}");
        Ok(())
    }
}

/// No webhook URL and no `--dry-run`: every delivery fails.
pub struct UnconfiguredSink;

impl NotificationSink for UnconfiguredSink {
    fn deliver(&self, _notification: &Notification) -> Result<(), DeliveryError> {
        Err(DeliveryError::new(
            "no notification channel configured",
            format!(
                "{} is not set; pass --dry-run to print the notification instead",
                vars::WEBHOOK_URL
            ),
        ))
    }
}
