//! Port interface every dependent record store exposes to the batch job

use async_trait::async_trait;
use gearbook_domain::Result;

/// A record's id together with its stored owner identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    pub record_id: String,
    pub owner_id: String,
}

/// Reconciliation view of a dependent record store
///
/// Implemented by every collection that carries an owner foreign key so
/// the batch job can walk and repair them uniformly.
#[async_trait]
pub trait OwnedRecordStore: Send + Sync {
    /// Stable store name used in the audit report
    fn store_name(&self) -> &'static str;

    /// Every record's id and stored owner identifier
    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>>;

    /// Rewrite one record's owner identifier
    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()>;
}
