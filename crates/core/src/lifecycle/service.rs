//! Lifecycle service - erasure and export
//!
//! Both operations resolve the full identity chain up front. Erasure fails
//! before touching anything when the caller is anonymous or has no record,
//! so a denied request never leaves partial deletions behind.

use std::sync::Arc;

use gearbook_domain::constants::ANONYMIZED_OWNER;
use gearbook_domain::{
    ErasureReceipt, GearbookError, RequestContext, Result, UserExport, VehicleExport,
};
use tracing::info;

use crate::events::ports::UsageEventRepository;
use crate::garage::ports::{HotspotRepository, PartRepository, VehicleRepository};
use crate::identity::IdentityResolver;
use crate::moderation::ports::{ApplicationRepository, IssueReportRepository};
use crate::user::ports::UserRepository;

/// Lifecycle service composing the resolver with every dependent store
pub struct LifecycleService {
    users: Arc<dyn UserRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    parts: Arc<dyn PartRepository>,
    hotspots: Arc<dyn HotspotRepository>,
    events: Arc<dyn UsageEventRepository>,
    applications: Arc<dyn ApplicationRepository>,
    reports: Arc<dyn IssueReportRepository>,
    resolver: Arc<IdentityResolver>,
}

impl LifecycleService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        parts: Arc<dyn PartRepository>,
        hotspots: Arc<dyn HotspotRepository>,
        events: Arc<dyn UsageEventRepository>,
        applications: Arc<dyn ApplicationRepository>,
        reports: Arc<dyn IssueReportRepository>,
        resolver: Arc<IdentityResolver>,
    ) -> Self {
        Self { users, vehicles, parts, hotspots, events, applications, reports, resolver }
    }

    /// Erase the caller's account and all personal data.
    ///
    /// Order matters: dependent deletions happen before the user record is
    /// removed so ownership lookups stay valid throughout the cascade.
    /// Usage events are anonymized, never deleted.
    pub async fn erase(&self, ctx: &RequestContext) -> Result<ErasureReceipt> {
        if ctx.auth().is_none() {
            return Err(GearbookError::Unauthenticated("sign in required".into()));
        }
        let user = self
            .resolver
            .resolve_from_context(ctx)
            .await?
            .ok_or_else(|| GearbookError::NotFound("no account to erase".into()))?;

        let shapes = user.identifier_shapes();
        info!(user_id = %user.id, "erasure started");

        let mut receipt = ErasureReceipt::default();

        // Cascade: hotspots and parts go before each vehicle
        for vehicle in self.vehicles.list_by_owner(&shapes).await? {
            receipt.hotspots_deleted += self.hotspots.delete_by_vehicle(&vehicle.id).await?;
            receipt.parts_deleted += self.parts.delete_by_vehicle(&vehicle.id).await?;
            self.vehicles.delete(&vehicle.id).await?;
            receipt.vehicles_deleted += 1;
        }

        receipt.events_anonymized =
            self.events.anonymize_by_owner(&shapes, ANONYMIZED_OWNER).await?;
        receipt.applications_deleted = self.applications.delete_by_applicant(&shapes).await?;
        receipt.reports_reattributed =
            self.reports.reattribute_reporter(&shapes, ANONYMIZED_OWNER).await?;

        // The user record goes last
        self.users.delete(&user.id).await?;

        info!(
            user_id = %user.id,
            vehicles = receipt.vehicles_deleted,
            parts = receipt.parts_deleted,
            hotspots = receipt.hotspots_deleted,
            events = receipt.events_anonymized,
            "erasure complete"
        );
        Ok(receipt)
    }

    /// Export everything the caller owns.
    ///
    /// Returns `None` (not an error) when the caller is anonymous or has
    /// no record: export is self-service and has no meaningful anonymous
    /// result. The activity section is an aggregate summary only.
    pub async fn export(&self, ctx: &RequestContext) -> Result<Option<UserExport>> {
        let Some(user) = self.resolver.resolve_from_context(ctx).await? else {
            return Ok(None);
        };

        let shapes = user.identifier_shapes();

        let mut vehicles = Vec::new();
        for vehicle in self.vehicles.list_by_owner(&shapes).await? {
            let parts = self.parts.list_by_vehicle(&vehicle.id).await?;
            let hotspot_count = self.hotspots.list_by_vehicle(&vehicle.id).await?.len();
            vehicles.push(VehicleExport { vehicle, parts, hotspot_count });
        }

        let activity = self.events.summary_by_owner(&shapes).await?;

        Ok(Some(UserExport { profile: user, vehicles, activity }))
    }
}
