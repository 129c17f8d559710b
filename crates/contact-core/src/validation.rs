//! Contact form schema validation
//!
//! Turns an untyped JSON body into a [`ValidatedSubmission`] or a
//! [`ValidationError`] listing every field that failed. Validation is pure:
//! no I/O, no panics, and unknown fields are ignored.
//!
//! | field     | required | rule                          |
//! |-----------|----------|-------------------------------|
//! | `name`    | yes      | string, at least 1 character  |
//! | `email`   | yes      | string, email address shape   |
//! | `project` | no       | string (`null` means absent)  |
//! | `budget`  | no       | string (`null` means absent)  |
//! | `message` | yes      | string, at least 1 character  |

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::error::{FieldError, ValidationError};
use crate::model::ValidatedSubmission;

pub const REASON_REQUIRED: &str = "Required";
pub const REASON_TOO_SHORT: &str = "String must contain at least 1 character(s)";
pub const REASON_INVALID_EMAIL: &str = "Invalid email";

/// Field name reported when the body itself is not an object
pub const BODY_FIELD: &str = "body";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Check a string against the email address shape
///
/// Local part may not start with a dot and the address may not contain
/// consecutive dots.
pub fn is_valid_email(candidate: &str) -> bool {
    !candidate.starts_with('.') && !candidate.contains("..") && email_pattern().is_match(candidate)
}

/// Validate an untyped submission body
pub fn validate_submission(input: &Value) -> Result<ValidatedSubmission, ValidationError> {
    let Some(fields) = input.as_object() else {
        return Err(ValidationError::single(
            BODY_FIELD,
            format!("Expected object, received {}", json_type_name(input)),
        ));
    };

    let mut errors = Vec::new();

    let name = required_text(fields, "name", &mut errors);
    let email = required_text(fields, "email", &mut errors);
    if let Some(ref address) = email {
        if !is_valid_email(address) {
            errors.push(FieldError::new("email", REASON_INVALID_EMAIL));
        }
    }
    let project = optional_text(fields, "project", &mut errors);
    let budget = optional_text(fields, "budget", &mut errors);
    let message = required_text(fields, "message", &mut errors);

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(
            ValidatedSubmission::new(name, email, project, budget, message),
        ),
        _ => Err(ValidationError::new(errors)),
    }
}

/// Parse a raw request body and validate it
///
/// Malformed JSON is reported as a failure of the `body` field.
pub fn validate_body(body: &[u8]) -> Result<ValidatedSubmission, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationError::single(BODY_FIELD, format!("Malformed JSON: {}", e))
    })?;
    validate_submission(&value)
}

/// A required string field; `email` skips the length rule since the
/// address check already rejects empty strings.
fn required_text(
    fields: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, REASON_REQUIRED));
            None
        }
        Some(Value::String(s)) => {
            if s.is_empty() && field != "email" {
                errors.push(FieldError::new(field, REASON_TOO_SHORT));
                return None;
            }
            Some(s.clone())
        }
        Some(other) => {
            errors.push(type_mismatch(field, other));
            None
        }
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(type_mismatch(field, other));
            None
        }
    }
}

fn type_mismatch(field: &str, value: &Value) -> FieldError {
    FieldError::new(
        field,
        format!("Expected string, received {}", json_type_name(value)),
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
