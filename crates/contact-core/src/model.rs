//! Contact message data model
//!
//! [`ValidatedSubmission`] is the typed value the validator hands downstream;
//! it can only be produced by [`crate::validation::validate_submission`].
//! [`ContactMessage`] is the stored entity with its generated fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store; strictly increasing in insertion order
pub type MessageId = u64;

/// A stored contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    /// Project category; `None` when the visitor did not answer
    pub project: Option<String>,
    /// Budget range; `None` when the visitor did not answer
    pub budget: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Form data that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    name: String,
    email: String,
    project: Option<String>,
    budget: Option<String>,
    message: String,
}

impl ValidatedSubmission {
    pub(crate) fn new(
        name: String,
        email: String,
        project: Option<String>,
        budget: Option<String>,
        message: String,
    ) -> Self {
        Self {
            name,
            email,
            project,
            budget,
            message,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attach the store-generated fields
    pub fn into_message(self, id: MessageId, created_at: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            project: self.project,
            budget: self.budget,
            message: self.message,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_into_message_keeps_fields() {
        let submission = ValidatedSubmission::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            Some("landing-page".to_string()),
            None,
            "Need a landing page".to_string(),
        );
        let created_at = Utc.with_ymd_and_hms(2026, 10, 18, 14, 3, 7).unwrap();

        let message = submission.into_message(7, created_at);
        assert_eq!(message.id, 7);
        assert_eq!(message.name, "Jane Doe");
        assert_eq!(message.project.as_deref(), Some("landing-page"));
        assert!(message.budget.is_none());
        assert_eq!(message.created_at, created_at);
    }

    #[test]
    fn test_serializes_camel_case_with_null_optionals() {
        let created_at = Utc.with_ymd_and_hms(2026, 10, 18, 14, 3, 7).unwrap();
        let message = ContactMessage {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            project: None,
            budget: Some("1k-5k".to_string()),
            message: "Hello".to_string(),
            created_at,
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["createdAt"], "2026-10-18T14:03:07Z");
        assert!(json["project"].is_null());
        assert_eq!(json["budget"], "1k-5k");
    }
}
