//! Reconciliation batch report types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Audit report produced by the identity reconciliation batch job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Number of user records the identifier map was built from
    pub users_processed: usize,
    /// Rewritten-record count per dependent store
    pub updates_by_store: BTreeMap<String, usize>,
    /// The full identifier map (every observed shape -> canonical id),
    /// kept for audit purposes
    pub mapping: BTreeMap<String, String>,
}

impl ReconciliationReport {
    /// Total records rewritten across all stores
    pub fn total_updates(&self) -> usize {
        self.updates_by_store.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_updates_sums_stores() {
        let mut report = ReconciliationReport::default();
        report.updates_by_store.insert("vehicles".into(), 3);
        report.updates_by_store.insert("parts".into(), 2);
        assert_eq!(report.total_updates(), 5);
    }
}
