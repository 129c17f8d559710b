//! HTTP handlers for the contact API
//!
//! - `routes`: route table and endpoint handlers
//! - `middleware`: operator token check for the listing endpoint
//!
//! Client-visible payloads always carry a human-readable `message`; storage
//! and relay details stay in the server logs.

pub mod middleware;
pub mod routes;

pub use middleware::require_operator_token;
pub use routes::{create_router, health_check, list_contacts, metrics, submit_contact};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contact_core::validation::BODY_FIELD;
use contact_core::{
    ContactMetricsRegistry, FieldError, MailTransport, MailerConfig, MessageStore,
    NotificationDispatcher, SubmissionError, SubmissionService,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! We'll get back to you within 24 hours.";
pub const INVALID_FORM_MESSAGE: &str = "Invalid form data";
pub const SUBMIT_FAILED_MESSAGE: &str = "An error occurred while processing your message";
pub const LIST_FAILED_MESSAGE: &str = "Failed to retrieve messages";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubmissionService>,
    pub metrics: Arc<ContactMetricsRegistry>,
    pub operator_token: Arc<SecretString>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the pipeline from its parts
    pub fn new(
        store: Arc<dyn MessageStore>,
        transport: Arc<dyn MailTransport>,
        mailer: &MailerConfig,
        metrics: Arc<ContactMetricsRegistry>,
        operator_token: SecretString,
    ) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            mailer,
            transport,
            metrics.contact(),
        ));
        let service = Arc::new(SubmissionService::new(store, dispatcher, metrics.contact()));

        Self {
            service,
            metrics,
            operator_token: Arc::new(operator_token),
            start_time: Instant::now(),
        }
    }
}

/// Body of a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: u64,
}

/// Body of a failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub uptime_seconds: u64,
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Form data failed validation
    InvalidForm(Vec<FieldError>),
    /// Request body could not be read (too large, aborted)
    UnreadableBody { status: StatusCode, reason: String },
    /// Submission could not be stored
    SubmissionFailed,
    /// Messages could not be listed
    ListingFailed,
    /// Operator token missing or wrong
    Unauthorized,
    /// Metrics could not be encoded
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            ApiError::UnreadableBody { status, .. } => *status,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::SubmissionFailed | ApiError::ListingFailed | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(e) => ApiError::InvalidForm(e.into_errors()),
            SubmissionError::Storage(_) => ApiError::SubmissionFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::InvalidForm(errors) => ErrorResponse {
                success: Some(false),
                message: INVALID_FORM_MESSAGE.to_string(),
                errors: Some(errors),
            },
            ApiError::UnreadableBody { reason, .. } => ErrorResponse {
                success: Some(false),
                message: INVALID_FORM_MESSAGE.to_string(),
                errors: Some(vec![FieldError::new(BODY_FIELD, reason)]),
            },
            ApiError::SubmissionFailed => ErrorResponse {
                success: Some(false),
                message: SUBMIT_FAILED_MESSAGE.to_string(),
                errors: None,
            },
            ApiError::ListingFailed => ErrorResponse {
                success: None,
                message: LIST_FAILED_MESSAGE.to_string(),
                errors: None,
            },
            ApiError::Unauthorized => ErrorResponse {
                success: Some(false),
                message: UNAUTHORIZED_MESSAGE.to_string(),
                errors: None,
            },
            ApiError::Internal => ErrorResponse {
                success: Some(false),
                message: "Internal server error".to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_core::{StorageError, ValidationError};

    #[test]
    fn test_submission_error_mapping() {
        let err: ApiError =
            SubmissionError::from(ValidationError::single("email", "Invalid email")).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::InvalidForm(ref errors) if errors[0].field == "email"));

        let err: ApiError = SubmissionError::from(StorageError::unavailable("disk full")).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, ApiError::SubmissionFailed));
    }

    #[test]
    fn test_error_bodies_hide_details() {
        let body = ErrorResponse {
            success: Some(false),
            message: SUBMIT_FAILED_MESSAGE.to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "An error occurred while processing your message"
            })
        );
    }

    #[test]
    fn test_listing_failure_body_has_only_message() {
        let body = ErrorResponse {
            success: None,
            message: LIST_FAILED_MESSAGE.to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Failed to retrieve messages" }));
    }

    #[test]
    fn test_unreadable_body_keeps_status() {
        let err = ApiError::UnreadableBody {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            reason: "length limit exceeded".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}
