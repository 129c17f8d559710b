//! Server configuration
//!
//! Every setting can be given as a flag or through the environment. Missing
//! or malformed mail credentials and operator token stop the server at
//! startup; there are no placeholder defaults for them.

use clap::{Args, ValueEnum};
use contact_core::config::{DEFAULT_RELAY_TIMEOUT_MS, DEFAULT_SITE_NAME};
use contact_core::{ConfigError, MailerConfig};
use secrecy::SecretString;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Shortest accepted operator token
pub const MIN_ADMIN_TOKEN_LEN: usize = 16;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Arguments for `contact-relay serve`
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory for the sled message store (in-memory store when omitted)
    #[arg(long, env = "CONTACT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Sender mailbox identity, also the relay username
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: String,

    /// Mail relay secret
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// Mail relay secret, used when EMAIL_PASSWORD is not set
    #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
    pub gmail_app_password: Option<String>,

    /// Mailbox that receives contact notifications
    #[arg(long, env = "CONTACT_OPERATOR_MAILBOX")]
    pub operator_mailbox: String,

    /// HTTP endpoint of the mail relay
    #[arg(long, env = "MAIL_RELAY_URL")]
    pub relay_url: String,

    /// Mail relay request timeout in milliseconds
    #[arg(long, env = "MAIL_RELAY_TIMEOUT_MS", default_value_t = DEFAULT_RELAY_TIMEOUT_MS)]
    pub relay_timeout_ms: u64,

    /// Site name used in the notification heading
    #[arg(long, env = "CONTACT_SITE_NAME", default_value = DEFAULT_SITE_NAME)]
    pub site_name: String,

    /// Bearer token required to list stored messages
    #[arg(long, env = "CONTACT_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

/// Validated server configuration
#[derive(Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub mailer: MailerConfig,
    pub admin_token: SecretString,
    pub log_format: LogFormat,
}

impl ServeArgs {
    /// Validate the arguments into an [`AppConfig`]
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::invalid("host", format!("'{}' is not an IP address", self.host)))?;

        let secret = non_empty(self.email_password)
            .or_else(|| non_empty(self.gmail_app_password))
            .ok_or(ConfigError::Missing("EMAIL_PASSWORD or GMAIL_APP_PASSWORD"))?;

        let mailer = MailerConfig::builder()
            .sender(self.email_user)
            .secret(SecretString::new(secret))
            .operator_mailbox(self.operator_mailbox)
            .relay_url(self.relay_url)
            .timeout_ms(self.relay_timeout_ms)
            .site_name(self.site_name)
            .build()?;

        if self.admin_token.len() < MIN_ADMIN_TOKEN_LEN {
            return Err(ConfigError::invalid(
                "admin_token",
                format!("must be at least {} characters", MIN_ADMIN_TOKEN_LEN),
            ));
        }

        Ok(AppConfig {
            bind_addr: SocketAddr::new(ip, self.port),
            data_dir: self.data_dir,
            mailer,
            admin_token: SecretString::new(self.admin_token),
            log_format: self.log_format,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
