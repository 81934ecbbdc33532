//! The notification contract and the sink seam.

use serde_json::{Value, json};
use std::error::Error as StdError;
use thiserror::Error;

/// Accent used when protected paths were touched.
pub const ACCENT_DANGER: &str = "#d50200";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationStatus {
    Ok,
    Ko,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub title: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub channel: String,
    pub icon: String,
    pub username: String,
    pub status: NotificationStatus,
    pub accent: Option<&'static str>,
    pub attachment: Option<Attachment>,
}

impl Notification {
    /// Incoming-webhook body understood by Slack-compatible chat services.
    ///
    /// An empty channel is omitted so the webhook's own default applies.
    pub fn to_webhook_json(&self) -> Value {
        let mut body = json!({
            "text": self.text,
            "icon_emoji": self.icon,
            "username": self.username,
        });
        if !self.channel.is_empty() {
            body["channel"] = json!(self.channel);
        }

        if self.accent.is_some() || self.attachment.is_some() {
            let mut attachment = json!({});
            if let Some(color) = self.accent {
                attachment["color"] = json!(color);
            }
            if let Some(a) = &self.attachment {
                attachment["title"] = json!(a.title);
                attachment["text"] = json!(a.text);
            }
            body["attachments"] = json!([attachment]);
        }

        body
    }
}

/// A notification could not be delivered. The run fails; there is no retry.
#[derive(Debug, Error)]
#[error("{context}")]
pub struct DeliveryError {
    context: String,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl DeliveryError {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Delivers a rendered notification to its channel.
pub trait NotificationSink {
    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}
