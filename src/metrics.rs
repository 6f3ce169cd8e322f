//! Prometheus metrics for monitoring reconciliation.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! avalanche-engine = { version = "0.1", features = ["metrics"] }
//! ```
//!
//! Exported metrics:
//!
//! - `avalanche_polls_issued_total` - Counter of polls handed to the transport
//! - `avalanche_votes_registered_total` - Counter of votes applied to records
//! - `avalanche_status_transitions_total` - Counter of status changes (by status)
//! - `avalanche_responses_rejected_total` - Counter of dropped responses (by reason)
//! - `avalanche_request_timeouts_total` - Counter of polls reaped without response

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter_vec, register_int_counter, CounterVec, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total polls handed to the transport
    pub static ref POLLS_ISSUED: IntCounter = register_int_counter!(
        "avalanche_polls_issued_total",
        "Total number of polls issued to peers"
    )
    .expect("Failed to create POLLS_ISSUED metric");

    /// Total votes applied to vote records
    pub static ref VOTES_REGISTERED: IntCounter = register_int_counter!(
        "avalanche_votes_registered_total",
        "Total number of votes applied to vote records"
    )
    .expect("Failed to create VOTES_REGISTERED metric");

    /// Total status transitions, labeled by the new status
    pub static ref STATUS_TRANSITIONS: CounterVec = register_counter_vec!(
        "avalanche_status_transitions_total",
        "Total number of target status transitions",
        &["status"]
    )
    .expect("Failed to create STATUS_TRANSITIONS metric");

    /// Total rejected responses, labeled by rejection reason
    pub static ref RESPONSES_REJECTED: CounterVec = register_counter_vec!(
        "avalanche_responses_rejected_total",
        "Total number of responses dropped for violating their poll",
        &["reason"]
    )
    .expect("Failed to create RESPONSES_REJECTED metric");

    /// Total polls reaped without a response
    pub static ref REQUEST_TIMEOUTS: IntCounter = register_int_counter!(
        "avalanche_request_timeouts_total",
        "Total number of polls that timed out"
    )
    .expect("Failed to create REQUEST_TIMEOUTS metric");
}

/// Record a poll handed to the transport
#[cfg(feature = "metrics")]
pub fn record_poll_issued() {
    POLLS_ISSUED.inc();
}

/// Record a vote applied to a record
#[cfg(feature = "metrics")]
pub fn record_vote_registered() {
    VOTES_REGISTERED.inc();
}

/// Record a status transition with its new status
#[cfg(feature = "metrics")]
pub fn record_status_transition(status: &str) {
    STATUS_TRANSITIONS.with_label_values(&[status]).inc();
}

/// Record a dropped response with reason
#[cfg(feature = "metrics")]
pub fn record_response_rejected(reason: &str) {
    RESPONSES_REJECTED.with_label_values(&[reason]).inc();
}

/// Record a poll reaped without response
#[cfg(feature = "metrics")]
pub fn record_request_timeout() {
    REQUEST_TIMEOUTS.inc();
}

// No-op implementations when the metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_poll_issued() {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_registered() {}

#[cfg(not(feature = "metrics"))]
pub fn record_status_transition(_status: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_response_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_request_timeout() {}
