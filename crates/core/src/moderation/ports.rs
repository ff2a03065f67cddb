//! Port interfaces for moderation persistence

use async_trait::async_trait;
use gearbook_domain::{
    AffiliateApplication, ApplicationStatus, IssueReport, IssueStatus, Result,
};

/// Trait for affiliate application persistence
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: AffiliateApplication) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<AffiliateApplication>>;

    /// The applicant's pending application, if one exists (one pending
    /// application per user)
    async fn pending_for_applicant(
        &self,
        applicant_shapes: &[String],
    ) -> Result<Option<AffiliateApplication>>;

    async fn list_by_status(&self, status: ApplicationStatus)
        -> Result<Vec<AffiliateApplication>>;

    /// Stamp a review decision onto an application
    async fn set_review(
        &self,
        id: &str,
        status: ApplicationStatus,
        reviewed_by: &str,
        reviewed_at: i64,
    ) -> Result<()>;

    /// Delete all applications filed by any of the given shapes (erasure);
    /// returns the number removed
    async fn delete_by_applicant(&self, applicant_shapes: &[String]) -> Result<usize>;
}

/// Trait for issue report persistence
#[async_trait]
pub trait IssueReportRepository: Send + Sync {
    async fn insert(&self, report: IssueReport) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<IssueReport>>;

    async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<IssueReport>>;

    /// Mark a report resolved
    async fn resolve(&self, id: &str, resolved_by: &str, resolved_at: i64) -> Result<()>;

    /// Rewrite the reporter column to `sentinel` for every report filed by
    /// any of the given shapes, keeping the moderation history. Returns the
    /// number of reports touched.
    async fn reattribute_reporter(
        &self,
        reporter_shapes: &[String],
        sentinel: &str,
    ) -> Result<usize>;
}
