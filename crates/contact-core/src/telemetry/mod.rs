//! Telemetry for the contact pipeline
//!
//! Prometheus counters for submissions, listings, and notification
//! delivery. Notification failures never reach the client, so the
//! failure counter is the operator's only aggregate view of them.

pub mod metrics;

pub use metrics::{ContactMetrics, ContactMetricsRegistry, SubmissionOutcome};

use thiserror::Error;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
