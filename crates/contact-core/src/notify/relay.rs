//! HTTP mail relay transport
//!
//! Posts each [`OutgoingEmail`] as JSON to the configured relay endpoint,
//! authenticating with HTTP basic auth (sender identity and secret).
//! A single attempt is made per email; the request timeout comes from
//! [`MailerConfig::timeout_ms`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use super::{MailTransport, OutgoingEmail};
use crate::config::MailerConfig;
use crate::error::NotificationError;

/// reqwest-based [`MailTransport`]
pub struct HttpMailRelay {
    client: Client,
    url: String,
    username: String,
    secret: SecretString,
}

impl HttpMailRelay {
    /// Create a relay client from validated configuration
    pub fn new(config: &MailerConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotificationError::Misconfigured(e.to_string()))?;

        Ok(Self {
            client,
            url: config.relay_url.clone(),
            username: config.sender.clone(),
            secret: SecretString::new(config.secret.expose_secret().clone()),
        })
    }
}

impl std::fmt::Debug for HttpMailRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailRelay")
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailTransport for HttpMailRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(self.secret.expose_secret()))
            .json(email)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Network(format!("relay timed out: {}", e))
                } else {
                    NotificationError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(NotificationError::AuthenticationFailed(format!(
                "relay refused credentials: {}",
                status
            )))
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Err(NotificationError::QuotaExceeded(format!(
                "relay rate limited: {}",
                status
            )))
        } else if status.is_server_error() {
            Err(NotificationError::RelayUnavailable(format!(
                "Server error: {}",
                status
            )))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(NotificationError::Rejected(format!(
                "{}: {}",
                status, error_text
            )))
        }
    }
}
