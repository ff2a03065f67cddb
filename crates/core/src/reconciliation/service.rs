//! Reconciliation batch job
//!
//! One-shot repair of owner-identifier drift across every dependent record
//! store. Historically the owner columns were written in whichever
//! identifier shape the calling code had at hand; this job rewrites them
//! all to the canonical subject.
//!
//! The job is idempotent: the rewrite target is a fixed point of the
//! identifier map, so a second run performs zero updates. There is no
//! checkpointing; a failure partway leaves already-rewritten records
//! correct, and re-running finishes the rest.

use std::sync::Arc;

use gearbook_domain::constants::is_sentinel_owner;
use gearbook_domain::{ReconciliationReport, Result};
use tracing::{info, warn};

use super::ports::OwnedRecordStore;
use crate::identity::IdentifierMap;
use crate::user::ports::UserRepository;

/// Reconciliation batch job over all dependent record stores
pub struct ReconciliationService {
    users: Arc<dyn UserRepository>,
    stores: Vec<Arc<dyn OwnedRecordStore>>,
}

impl ReconciliationService {
    /// Create the job over the given dependent stores
    pub fn new(users: Arc<dyn UserRepository>, stores: Vec<Arc<dyn OwnedRecordStore>>) -> Self {
        Self { users, stores }
    }

    /// Run the batch repair and produce the audit report.
    pub async fn run(&self) -> Result<ReconciliationReport> {
        let users = self.users.list_all().await?;
        let map = IdentifierMap::from_users(&users);
        info!(users = users.len(), identifiers = map.len(), "identifier map built");

        let mut report = ReconciliationReport {
            users_processed: users.len(),
            mapping: map.entries().clone(),
            ..ReconciliationReport::default()
        };

        for store in &self.stores {
            let mut updated = 0usize;
            let mut skipped_unknown = 0usize;

            for owner_ref in store.list_owner_refs().await? {
                // Anonymized and system-attributed records are not user
                // references and must never be rewritten
                if is_sentinel_owner(&owner_ref.owner_id) {
                    continue;
                }

                match map.canonical_for(&owner_ref.owner_id) {
                    Some(canonical) if canonical != owner_ref.owner_id => {
                        store.rewrite_owner(&owner_ref.record_id, canonical).await?;
                        updated += 1;
                    }
                    Some(_) => {} // already canonical
                    None => {
                        // Orphaned owner: leave untouched, never guess
                        skipped_unknown += 1;
                    }
                }
            }

            if skipped_unknown > 0 {
                warn!(
                    store = store.store_name(),
                    skipped_unknown, "owner identifiers with no mapping were left untouched"
                );
            }
            info!(store = store.store_name(), updated, "store reconciled");
            report.updates_by_store.insert(store.store_name().to_string(), updated);
        }

        Ok(report)
    }
}
