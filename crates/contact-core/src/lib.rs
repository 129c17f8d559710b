//! Contact Relay Core
//!
//! The contact form submission pipeline: validation, persistence, and
//! best-effort email notification to the site operator.
//!
//! ## Architecture
//!
//! 1. **Validation** (`validation`): turns an untyped JSON body into a
//!    [`ValidatedSubmission`] or a field-level [`ValidationError`].
//!
//! 2. **Store** (`store`): append-only [`MessageStore`] port with in-memory
//!    and sled-backed adapters. Assigns ids and creation timestamps.
//!
//! 3. **Notify** (`notify`): [`NotificationDispatcher`] formats stored
//!    messages and relays them through a [`MailTransport`]. Failures are
//!    logged and counted, never propagated.
//!
//! 4. **Service** (`service`): [`SubmissionService`] sequences the stages
//!    and decides the outcome of each submission.
//!
//! 5. **Telemetry** (`telemetry`): Prometheus counters for every outcome.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use contact_core::{
//!     ContactMetricsRegistry, HttpMailRelay, InMemoryMessageStore, MailerConfig,
//!     NotificationDispatcher, SubmissionService,
//! };
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MailerConfig::builder()
//!         .sender("site@example.com")
//!         .secret(SecretString::new("app-password".to_string()))
//!         .operator_mailbox("owner@example.com")
//!         .relay_url("https://relay.example.com/v1/send")
//!         .build()?;
//!
//!     let metrics = ContactMetricsRegistry::new()?;
//!     let transport = Arc::new(HttpMailRelay::new(&config)?);
//!     let dispatcher = Arc::new(NotificationDispatcher::new(&config, transport, metrics.contact()));
//!     let service = SubmissionService::new(
//!         Arc::new(InMemoryMessageStore::new()),
//!         dispatcher,
//!         metrics.contact(),
//!     );
//!
//!     let body = serde_json::json!({
//!         "name": "Jane Doe",
//!         "email": "jane@example.com",
//!         "message": "Need a landing page"
//!     });
//!     let stored = service.submit(&body).await?;
//!     println!("stored message {}", stored.id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use config::{MailerConfig, MailerConfigBuilder};
pub use error::{
    ConfigError, FieldError, NotificationError, StorageError, StoreResult, SubmissionError,
    ValidationError,
};
pub use model::{ContactMessage, MessageId, ValidatedSubmission};
pub use notify::{HttpMailRelay, MailTransport, NotificationDispatcher, OutgoingEmail};
pub use service::SubmissionService;
pub use store::{InMemoryMessageStore, MessageStore, SledMessageStore};
pub use telemetry::{ContactMetrics, ContactMetricsRegistry, SubmissionOutcome, TelemetryError};
pub use validation::{validate_body, validate_submission};
