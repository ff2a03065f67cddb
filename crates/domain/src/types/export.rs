//! Data portability and erasure result types

use serde::{Deserialize, Serialize};

use super::events::UsageSummary;
use super::garage::{Part, Vehicle};
use super::user::UserRecord;

/// One vehicle with its attached records, as exported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleExport {
    pub vehicle: Vehicle,
    pub parts: Vec<Part>,
    pub hotspot_count: usize,
}

/// Full data-portability payload for one user
///
/// The activity section is an aggregate summary; event-level records are
/// deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExport {
    pub profile: UserRecord,
    pub vehicles: Vec<VehicleExport>,
    pub activity: UsageSummary,
}

/// Counts reported back from a completed erasure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureReceipt {
    pub vehicles_deleted: usize,
    pub parts_deleted: usize,
    pub hotspots_deleted: usize,
    pub events_anonymized: usize,
    pub applications_deleted: usize,
    pub reports_reattributed: usize,
}
