//! Prometheus metrics for the contact pipeline
//!
//! - `contact_submissions_total` (counter) - submissions by outcome
//! - `contact_notifications_total` (counter) - notification attempts by result
//! - `contact_notification_failures_total` (counter) - failed notifications by kind
//! - `contact_listings_total` (counter) - listing requests by result

use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::Arc;

use super::{Result, TelemetryError};

/// Terminal outcome of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Rejected,
    Failed,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted => "accepted",
            SubmissionOutcome::Rejected => "rejected",
            SubmissionOutcome::Failed => "failed",
        }
    }
}

/// Contact pipeline metrics
pub struct ContactMetrics {
    submissions_total: IntCounterVec,
    notifications_total: IntCounterVec,
    notification_failures_total: IntCounterVec,
    listings_total: IntCounterVec,
}

impl ContactMetrics {
    /// Create the metrics and register them with the provided registry
    pub fn new(registry: &Registry) -> Result<Self> {
        let submissions_total = IntCounterVec::new(
            Opts::new("submissions_total", "Contact form submissions by outcome")
                .namespace("contact"),
            &["outcome"],
        )?;

        let notifications_total = IntCounterVec::new(
            Opts::new(
                "notifications_total",
                "Operator notification attempts by result",
            )
            .namespace("contact"),
            &["result"],
        )?;

        let notification_failures_total = IntCounterVec::new(
            Opts::new(
                "notification_failures_total",
                "Failed operator notifications by failure kind",
            )
            .namespace("contact"),
            &["kind"],
        )?;

        let listings_total = IntCounterVec::new(
            Opts::new("listings_total", "Message listing requests by result")
                .namespace("contact"),
            &["result"],
        )?;

        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(notifications_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(listings_total.clone()))?;

        Ok(Self {
            submissions_total,
            notifications_total,
            notification_failures_total,
            listings_total,
        })
    }

    pub fn record_submission(&self, outcome: SubmissionOutcome) {
        self.submissions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_notification_sent(&self) {
        self.notifications_total.with_label_values(&["sent"]).inc();
    }

    /// Record a failed notification under its failure kind
    pub fn record_notification_failure(&self, kind: &str) {
        self.notifications_total.with_label_values(&["failed"]).inc();
        self.notification_failures_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn record_listing(&self, ok: bool) {
        let result = if ok { "ok" } else { "failed" };
        self.listings_total.with_label_values(&[result]).inc();
    }

    pub fn submissions(&self, outcome: SubmissionOutcome) -> u64 {
        self.submissions_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    pub fn notifications_sent(&self) -> u64 {
        self.notifications_total.with_label_values(&["sent"]).get()
    }

    /// Total failed notifications across all kinds
    pub fn notification_failures(&self) -> u64 {
        self.notifications_total.with_label_values(&["failed"]).get()
    }

    pub fn notification_failures_of_kind(&self, kind: &str) -> u64 {
        self.notification_failures_total
            .with_label_values(&[kind])
            .get()
    }
}

/// Registry owning the contact metrics
pub struct ContactMetricsRegistry {
    registry: Arc<Registry>,
    contact: Arc<ContactMetrics>,
}

impl ContactMetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let contact = Arc::new(ContactMetrics::new(&registry)?);

        Ok(Self { registry, contact })
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn contact(&self) -> Arc<ContactMetrics> {
        Arc::clone(&self.contact)
    }

    /// Encode metrics as text for scraping
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| TelemetryError::EncodingError(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingError(e.to_string()))
    }
}
