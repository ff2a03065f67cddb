//! Port interfaces for usage event persistence

use async_trait::async_trait;
use gearbook_domain::{Result, UsageEvent, UsageSummary};

/// Trait for usage event persistence
///
/// Events outlive their owners: erasure rewrites the owner column to the
/// anonymization sentinel and strips metadata instead of deleting rows, so
/// aggregate analytics keep working after an account is gone.
#[async_trait]
pub trait UsageEventRepository: Send + Sync {
    /// Record one event
    async fn record(&self, event: UsageEvent) -> Result<()>;

    /// Rewrite the owner column to `sentinel` and null out metadata for
    /// every event owned by any of the given shapes. Returns the number of
    /// events touched.
    async fn anonymize_by_owner(&self, owner_shapes: &[String], sentinel: &str) -> Result<usize>;

    /// Aggregate summary (count, distinct types, first/last timestamps)
    /// over events owned by any of the given shapes. Event-level payloads
    /// never cross this boundary.
    async fn summary_by_owner(&self, owner_shapes: &[String]) -> Result<UsageSummary>;
}
