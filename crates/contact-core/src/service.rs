//! Submission orchestration
//!
//! Sequences one submission through validation, storage, and notification:
//!
//! ```text
//! Received --validate--> Validated --store--> Stored --notify--> Accepted
//!     |                      |
//!     +--> Rejected (400)    +--> Failed (500)
//! ```
//!
//! Notification outcome never changes the result. A storage failure ends
//! the submission before the mail relay is touched.

use serde_json::Value;
use std::sync::Arc;

use crate::error::{StoreResult, SubmissionError, ValidationError};
use crate::model::{ContactMessage, ValidatedSubmission};
use crate::notify::NotificationDispatcher;
use crate::store::MessageStore;
use crate::telemetry::{ContactMetrics, SubmissionOutcome};
use crate::validation;

/// Entry point for contact submissions and operator listing
pub struct SubmissionService {
    store: Arc<dyn MessageStore>,
    dispatcher: Arc<NotificationDispatcher>,
    metrics: Arc<ContactMetrics>,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        dispatcher: Arc<NotificationDispatcher>,
        metrics: Arc<ContactMetrics>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            metrics,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Run a parsed JSON body through the pipeline
    ///
    /// # Errors
    ///
    /// `SubmissionError::Validation` for bad form data, `SubmissionError::Storage`
    /// when the message could not be recorded.
    pub async fn submit(&self, input: &Value) -> Result<ContactMessage, SubmissionError> {
        self.finish(validation::validate_submission(input)).await
    }

    /// Run a raw request body through the pipeline; malformed JSON is a
    /// validation failure.
    pub async fn submit_body(&self, body: &[u8]) -> Result<ContactMessage, SubmissionError> {
        self.finish(validation::validate_body(body)).await
    }

    async fn finish(
        &self,
        validated: Result<ValidatedSubmission, ValidationError>,
    ) -> Result<ContactMessage, SubmissionError> {
        let submission = match validated {
            Ok(submission) => submission,
            Err(e) => {
                self.metrics.record_submission(SubmissionOutcome::Rejected);
                tracing::debug!(fields = ?e.fields(), "Contact submission rejected");
                return Err(e.into());
            }
        };

        let message = match self.store.create(submission).await {
            Ok(message) => message,
            Err(e) => {
                self.metrics.record_submission(SubmissionOutcome::Failed);
                tracing::error!(
                    backend = self.store.backend(),
                    error = %e,
                    "Failed to store contact message"
                );
                return Err(e.into());
            }
        };

        self.dispatcher.notify(&message).await;

        self.metrics.record_submission(SubmissionOutcome::Accepted);
        tracing::info!(message_id = message.id, "Contact submission accepted");
        Ok(message)
    }

    /// All stored messages, oldest first
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn list(&self) -> StoreResult<Vec<ContactMessage>> {
        match self.store.list().await {
            Ok(messages) => {
                self.metrics.record_listing(true);
                Ok(messages)
            }
            Err(e) => {
                self.metrics.record_listing(false);
                tracing::error!(
                    backend = self.store.backend(),
                    error = %e,
                    "Failed to list contact messages"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailerConfig;
    use crate::error::{NotificationError, StorageError};
    use crate::notify::MockMailTransport;
    use crate::store::{InMemoryMessageStore, MockMessageStore};
    use prometheus::Registry;
    use secrecy::SecretString;
    use serde_json::json;

    fn mailer_config() -> MailerConfig {
        MailerConfig::builder()
            .sender("site@example.com")
            .secret(SecretString::new("app-password".to_string()))
            .operator_mailbox("owner@example.com")
            .relay_url("https://relay.example.com/v1/send")
            .build()
            .unwrap()
    }

    fn service(
        store: Arc<dyn MessageStore>,
        transport: MockMailTransport,
    ) -> (SubmissionService, Arc<ContactMetrics>) {
        let metrics = Arc::new(ContactMetrics::new(&Registry::new()).unwrap());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            &mailer_config(),
            Arc::new(transport),
            Arc::clone(&metrics),
        ));
        (
            SubmissionService::new(store, dispatcher, Arc::clone(&metrics)),
            metrics,
        )
    }

    fn jane() -> Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "project": "landing-page",
            "budget": "1k-5k",
            "message": "Need a landing page"
        })
    }

    #[tokio::test]
    async fn test_accepted_submission_is_stored_and_notified() {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut transport = MockMailTransport::new();
        transport.expect_send().times(1).returning(|_| Ok(()));

        let (service, metrics) = service(store.clone(), transport);
        let message = service.submit(&jane()).await.unwrap();

        assert_eq!(message.id, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(metrics.submissions(SubmissionOutcome::Accepted), 1);
        assert_eq!(metrics.notifications_sent(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submission_touches_nothing() {
        let mut store = MockMessageStore::new();
        store.expect_create().never();
        let mut transport = MockMailTransport::new();
        transport.expect_send().never();

        let (service, metrics) = service(Arc::new(store), transport);
        let err = service
            .submit(&json!({ "name": "", "email": "not-an-email", "message": "" }))
            .await
            .unwrap_err();

        assert!(err.is_client_fault());
        match err {
            SubmissionError::Validation(e) => {
                assert_eq!(e.fields(), vec!["name", "email", "message"])
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(metrics.submissions(SubmissionOutcome::Rejected), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_skips_notification() {
        let mut store = MockMessageStore::new();
        store.expect_backend().return_const("mock");
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(StorageError::unavailable("disk full")));
        let mut transport = MockMailTransport::new();
        transport.expect_send().never();

        let (service, metrics) = service(Arc::new(store), transport);
        let err = service.submit(&jane()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Storage(_)));
        assert_eq!(metrics.submissions(SubmissionOutcome::Failed), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_still_accepted() {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationError::Network("connection reset".to_string())));

        let (service, metrics) = service(store.clone(), transport);
        let message = service.submit(&jane()).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![message]);
        assert_eq!(metrics.submissions(SubmissionOutcome::Accepted), 1);
        assert_eq!(metrics.notification_failures_of_kind("network"), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let store = Arc::new(InMemoryMessageStore::new());
        let (service, _) = service(store.clone(), MockMailTransport::new());

        let err = service.submit_body(b"not json").await.unwrap_err();
        assert!(err.is_client_fault());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_is_reported() {
        let mut store = MockMessageStore::new();
        store.expect_backend().return_const("mock");
        store
            .expect_list()
            .times(1)
            .returning(|| Err(StorageError::unavailable("backend closed")));

        let (service, _) = service(Arc::new(store), MockMailTransport::new());
        assert!(service.list().await.is_err());
    }
}
