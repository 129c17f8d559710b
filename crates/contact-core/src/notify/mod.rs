//! Operator notification for stored submissions
//!
//! The dispatcher formats a stored [`ContactMessage`] as a plaintext email
//! and hands it to a [`MailTransport`]. Delivery is best-effort: transport
//! failures are logged and counted, then dropped. There are no retries.

pub mod relay;

pub use relay::HttpMailRelay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::MailerConfig;
use crate::error::NotificationError;
use crate::model::ContactMessage;
use crate::telemetry::ContactMetrics;

/// Placeholder for optional answers the visitor left out
pub const NOT_SPECIFIED: &str = "Not specified";

/// A fully addressed plaintext email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

/// Port for the external mail relay
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one email
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` when the relay cannot be reached or
    /// refuses the message.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError>;
}

/// Formats submissions and relays them to the operator mailbox
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    sender: String,
    operator_mailbox: String,
    site_name: String,
    metrics: Arc<ContactMetrics>,
}

impl NotificationDispatcher {
    pub fn new(
        config: &MailerConfig,
        transport: Arc<dyn MailTransport>,
        metrics: Arc<ContactMetrics>,
    ) -> Self {
        Self {
            transport,
            sender: config.sender.clone(),
            operator_mailbox: config.operator_mailbox.clone(),
            site_name: config.site_name.clone(),
            metrics,
        }
    }

    /// Build the notification email for a stored message
    pub fn compose(&self, message: &ContactMessage) -> OutgoingEmail {
        let text = format!(
            "New Contact Form Submission from {site}\n\
             \n\
             Name: {name}\n\
             Email: {email}\n\
             Project Type: {project}\n\
             Budget Range: {budget}\n\
             \n\
             Message:\n\
             {body}\n\
             \n\
             ---\n\
             Submitted at: {submitted}\n",
            site = self.site_name,
            name = message.name,
            email = message.email,
            project = or_not_specified(message.project.as_deref()),
            budget = or_not_specified(message.budget.as_deref()),
            body = message.message,
            submitted = message.created_at.format("%B %-d, %Y at %H:%M:%S UTC"),
        );

        OutgoingEmail {
            from: self.sender.clone(),
            to: self.operator_mailbox.clone(),
            reply_to: message.email.clone(),
            subject: format!("New Contact Form Submission - {}", message.name),
            text,
        }
    }

    /// Relay a stored message to the operator, best-effort
    pub async fn notify(&self, message: &ContactMessage) {
        let email = self.compose(message);

        match self.transport.send(&email).await {
            Ok(()) => {
                self.metrics.record_notification_sent();
                tracing::info!(message_id = message.id, "Contact notification sent");
            }
            Err(e) => {
                self.metrics.record_notification_failure(e.kind());
                tracing::warn!(
                    message_id = message.id,
                    kind = e.kind(),
                    error = %e,
                    "Failed to send contact notification"
                );
            }
        }
    }
}

fn or_not_specified(answer: Option<&str>) -> &str {
    match answer {
        Some(value) if !value.is_empty() => value,
        _ => NOT_SPECIFIED,
    }
}
