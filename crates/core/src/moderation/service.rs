//! Moderation service - affiliate application review and issue reports

use std::sync::Arc;

use chrono::Utc;
use gearbook_domain::constants::SYSTEM_ACTOR;
use gearbook_domain::{
    AffiliateApplication, ApplicationStatus, GearbookError, IssueReport, IssueStatus,
    ReportSubject, RequestContext, Result, UsageEvent,
};
use tracing::info;
use uuid::Uuid;

use super::ports::{ApplicationRepository, IssueReportRepository};
use crate::auth::AuthorizationPolicy;
use crate::events::ports::UsageEventRepository;
use crate::garage::ports::VehicleRepository;
use crate::garage::GarageService;
use crate::identity::IdentityResolver;

/// Input for submitting an affiliate application
#[derive(Debug, Clone)]
pub struct ApplicationInput {
    pub brand_name: String,
    pub website: String,
    pub pitch: String,
}

/// Moderation service
pub struct ModerationService {
    applications: Arc<dyn ApplicationRepository>,
    reports: Arc<dyn IssueReportRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    events: Arc<dyn UsageEventRepository>,
    garage: Arc<GarageService>,
    resolver: Arc<IdentityResolver>,
    policy: Arc<AuthorizationPolicy>,
}

impl ModerationService {
    /// Create a new moderation service
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        reports: Arc<dyn IssueReportRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        events: Arc<dyn UsageEventRepository>,
        garage: Arc<GarageService>,
        resolver: Arc<IdentityResolver>,
        policy: Arc<AuthorizationPolicy>,
    ) -> Self {
        Self { applications, reports, vehicles, events, garage, resolver, policy }
    }

    /// Submit an affiliate application; one pending application per user.
    pub async fn submit_application(
        &self,
        ctx: &RequestContext,
        input: ApplicationInput,
    ) -> Result<AffiliateApplication> {
        let principal = self.policy.require_authenticated(ctx).await?;

        if input.brand_name.is_empty() || input.website.is_empty() {
            return Err(GearbookError::InvalidInput("brand name and website are required".into()));
        }

        let shapes = self.resolver.identifier_shapes(principal.canonical_id()).await?;
        let shapes = if shapes.is_empty() {
            vec![principal.canonical_id().to_string()]
        } else {
            shapes
        };
        if self.applications.pending_for_applicant(&shapes).await?.is_some() {
            return Err(GearbookError::Conflict(
                "an application is already awaiting review".into(),
            ));
        }

        let application = AffiliateApplication {
            id: Uuid::now_v7().to_string(),
            applicant_id: principal.canonical_id().to_string(),
            brand_name: input.brand_name,
            website: input.website,
            pitch: input.pitch,
            status: ApplicationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now().timestamp(),
        };

        self.applications.insert(application.clone()).await?;
        info!(application_id = %application.id, "affiliate application submitted");
        Ok(application)
    }

    /// Applications awaiting review (admin)
    pub async fn list_pending_applications(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<AffiliateApplication>> {
        self.policy.require_admin(ctx).await?;
        self.applications.list_by_status(ApplicationStatus::Pending).await
    }

    /// Approve or reject a pending application (admin)
    pub async fn review_application(
        &self,
        ctx: &RequestContext,
        application_id: &str,
        approve: bool,
    ) -> Result<AffiliateApplication> {
        let reviewer = self.policy.require_admin(ctx).await?;

        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("application not found".into()))?;
        if application.status != ApplicationStatus::Pending {
            return Err(GearbookError::Conflict("application has already been reviewed".into()));
        }

        let status =
            if approve { ApplicationStatus::Approved } else { ApplicationStatus::Rejected };
        let reviewed_at = Utc::now().timestamp();
        self.applications
            .set_review(application_id, status, reviewer.canonical_id(), reviewed_at)
            .await?;

        info!(application_id, approved = approve, "affiliate application reviewed");
        Ok(AffiliateApplication {
            status,
            reviewed_by: Some(reviewer.canonical_id().to_string()),
            reviewed_at: Some(reviewed_at),
            ..application
        })
    }

    /// File an issue report against a vehicle or a user
    pub async fn file_report(
        &self,
        ctx: &RequestContext,
        subject_kind: ReportSubject,
        subject_id: &str,
        reason: String,
    ) -> Result<IssueReport> {
        let principal = self.policy.require_authenticated(ctx).await?;

        if reason.is_empty() {
            return Err(GearbookError::InvalidInput("a reason is required".into()));
        }

        // The reported subject must exist
        match subject_kind {
            ReportSubject::Vehicle => {
                if self.vehicles.get(subject_id).await?.is_none() {
                    return Err(GearbookError::NotFound("reported vehicle not found".into()));
                }
            }
            ReportSubject::User => {
                if self.resolver.find_by_any_identifier(subject_id).await?.is_none() {
                    return Err(GearbookError::NotFound("reported user not found".into()));
                }
            }
        }

        let report = IssueReport {
            id: Uuid::now_v7().to_string(),
            reporter_id: principal.canonical_id().to_string(),
            subject_kind,
            subject_id: subject_id.to_string(),
            reason,
            status: IssueStatus::Open,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now().timestamp(),
        };

        self.reports.insert(report.clone()).await?;
        Ok(report)
    }

    /// Open reports (admin)
    pub async fn list_open_reports(&self, ctx: &RequestContext) -> Result<Vec<IssueReport>> {
        self.policy.require_admin(ctx).await?;
        self.reports.list_by_status(IssueStatus::Open).await
    }

    /// Mark a report resolved (admin)
    pub async fn resolve_report(&self, ctx: &RequestContext, report_id: &str) -> Result<()> {
        let resolver = self.policy.require_admin(ctx).await?;

        let report = self
            .reports
            .get(report_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("report not found".into()))?;
        if report.status == IssueStatus::Resolved {
            return Err(GearbookError::Conflict("report is already resolved".into()));
        }

        self.reports
            .resolve(report_id, resolver.canonical_id(), Utc::now().timestamp())
            .await
    }

    /// Admin takedown of a vehicle that violates content rules.
    ///
    /// Cascades like an owner delete, then records an audit event
    /// attributed to the system sentinel rather than a human actor.
    pub async fn take_down_vehicle(&self, ctx: &RequestContext, vehicle_id: &str) -> Result<()> {
        self.policy.require_admin(ctx).await?;

        let vehicle = self
            .vehicles
            .get(vehicle_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("vehicle not found".into()))?;
        self.garage.delete_vehicle_cascade(&vehicle).await?;

        let audit = UsageEvent {
            id: Uuid::now_v7().to_string(),
            owner_id: SYSTEM_ACTOR.to_string(),
            event_type: "moderation.vehicle_removed".to_string(),
            metadata: Some(
                serde_json::json!({ "vehicle_id": vehicle.id, "owner_id": vehicle.owner_id })
                    .to_string(),
            ),
            created_at: Utc::now().timestamp(),
        };
        self.events.record(audit).await?;

        info!(vehicle_id, "vehicle taken down by moderation");
        Ok(())
    }
}
