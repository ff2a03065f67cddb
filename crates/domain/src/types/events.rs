//! Usage event types
//!
//! Usage events survive account erasure: the owner field is rewritten to
//! the anonymization sentinel and the metadata stripped, so aggregate
//! analytics keep working after the user record is gone.

use serde::{Deserialize, Serialize};

/// A single usage event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: String,
    /// Owner identifier, or the anonymization sentinel after erasure
    pub owner_id: String,
    pub event_type: String,
    /// Free-form JSON payload; stripped on anonymization because it may
    /// carry personal information
    pub metadata: Option<String>,
    pub created_at: i64,
}

/// Aggregate view of a user's events, safe for export
///
/// Contains counts and bounds only; raw event payloads never leave the
/// store through the export path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_events: i64,
    /// Distinct event types, sorted
    pub event_types: Vec<String>,
    pub first_event_at: Option<i64>,
    pub last_event_at: Option<i64>,
}
