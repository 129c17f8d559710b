//! Mail relay configuration
//!
//! Built once at startup and injected into the dispatcher and transport.
//! Every required value is checked in [`MailerConfigBuilder::build`], so a
//! misconfigured deployment fails at boot instead of on the first send.

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::validation::is_valid_email;

pub const DEFAULT_SITE_NAME: &str = "Code Muse Portfolio";
pub const DEFAULT_RELAY_TIMEOUT_MS: u64 = 10_000;

/// Validated mail relay configuration
#[derive(Debug)]
pub struct MailerConfig {
    /// Sender mailbox identity, also the relay username
    pub sender: String,
    /// Relay credential
    pub secret: SecretString,
    /// Mailbox that receives every notification
    pub operator_mailbox: String,
    /// HTTP endpoint of the mail relay
    pub relay_url: String,
    /// Relay request timeout in milliseconds
    pub timeout_ms: u64,
    /// Site name shown in the notification heading
    pub site_name: String,
}

impl MailerConfig {
    pub fn builder() -> MailerConfigBuilder {
        MailerConfigBuilder::new()
    }
}

/// Builder for [`MailerConfig`]
#[derive(Debug, Default)]
pub struct MailerConfigBuilder {
    sender: Option<String>,
    secret: Option<SecretString>,
    operator_mailbox: Option<String>,
    relay_url: Option<String>,
    timeout_ms: Option<u64>,
    site_name: Option<String>,
}

impl MailerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn secret(mut self, secret: SecretString) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn operator_mailbox(mut self, mailbox: impl Into<String>) -> Self {
        self.operator_mailbox = Some(mailbox.into());
        self
    }

    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = Some(url.into());
        self
    }

    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout_ms = Some(timeout);
        self
    }

    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<MailerConfig, ConfigError> {
        let sender = self.sender.ok_or(ConfigError::Missing("sender"))?;
        if !is_valid_email(&sender) {
            return Err(ConfigError::invalid("sender", "not an email address"));
        }

        let secret = self.secret.ok_or(ConfigError::Missing("secret"))?;
        if secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::invalid("secret", "must not be blank"));
        }

        let operator_mailbox = self
            .operator_mailbox
            .ok_or(ConfigError::Missing("operator_mailbox"))?;
        if !is_valid_email(&operator_mailbox) {
            return Err(ConfigError::invalid(
                "operator_mailbox",
                "not an email address",
            ));
        }

        let relay_url = self.relay_url.ok_or(ConfigError::Missing("relay_url"))?;
        if !(relay_url.starts_with("http://") || relay_url.starts_with("https://")) {
            return Err(ConfigError::invalid("relay_url", "must use http or https"));
        }

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_RELAY_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::invalid("timeout_ms", "must be greater than zero"));
        }

        let site_name = self
            .site_name
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());

        Ok(MailerConfig {
            sender,
            secret,
            operator_mailbox,
            relay_url,
            timeout_ms,
            site_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> MailerConfigBuilder {
        MailerConfig::builder()
            .sender("site@example.com")
            .secret(SecretString::new("app-password".to_string()))
            .operator_mailbox("owner@example.com")
            .relay_url("https://relay.example.com/v1/send")
    }

    #[test]
    fn test_build_with_defaults() {
        let config = complete().build().unwrap();
        assert_eq!(config.sender, "site@example.com");
        assert_eq!(config.timeout_ms, DEFAULT_RELAY_TIMEOUT_MS);
        assert_eq!(config.site_name, DEFAULT_SITE_NAME);
        assert_eq!(config.secret.expose_secret(), "app-password");
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = MailerConfig::builder()
            .sender("site@example.com")
            .operator_mailbox("owner@example.com")
            .relay_url("https://relay.example.com")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("secret"));
    }

    #[test]
    fn test_blank_secret_fails() {
        let err = complete()
            .secret(SecretString::new("   ".to_string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "secret", .. }));
    }

    #[test]
    fn test_invalid_addresses_fail() {
        let err = complete().sender("not-an-email").build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "sender", .. }));

        let err = complete().operator_mailbox("owner").build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "operator_mailbox", .. }));
    }

    #[test]
    fn test_relay_url_scheme() {
        let err = complete().relay_url("smtp.gmail.com:587").build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "relay_url", .. }));
    }

    #[test]
    fn test_zero_timeout_fails() {
        let err = complete().timeout_ms(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timeout_ms", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = complete().build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("app-password"));
    }
}
