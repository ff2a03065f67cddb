//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic unit tests without database dependencies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gearbook_core::{
    ApplicationRepository, HotspotRepository, IssueReportRepository, OwnedRecordStore, OwnerRef,
    PartRepository, UsageEventRepository, UserRepository, VehicleRepository,
};
use gearbook_domain::{
    AffiliateApplication, ApplicationStatus, Hotspot, IssueReport, IssueStatus, Part, Result,
    UsageEvent, UsageSummary, UserRecord, Vehicle,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// In-memory mock for `UserRepository`
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<UserRecord>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, user: UserRecord) -> Result<()> {
        lock(&self.users).push(user);
        Ok(())
    }

    async fn get_by_internal_id(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(lock(&self.users).iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_token_identifier(
        &self,
        token_identifier: &str,
    ) -> Result<Option<UserRecord>> {
        Ok(lock(&self.users).iter().find(|u| u.token_identifier == token_identifier).cloned())
    }

    async fn get_by_canonical_id(&self, subject: &str) -> Result<Option<UserRecord>> {
        Ok(lock(&self.users).iter().find(|u| u.subject == subject).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(lock(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(lock(&self.users).iter().find(|u| u.username.as_deref() == Some(username)).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>> {
        Ok(lock(&self.users).clone())
    }

    async fn update(&self, user: UserRecord) -> Result<()> {
        let mut users = lock(&self.users);
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user;
        }
        Ok(())
    }

    async fn set_role(&self, internal_id: &str, role: Option<&str>) -> Result<()> {
        let mut users = lock(&self.users);
        if let Some(existing) = users.iter_mut().find(|u| u.id == internal_id) {
            existing.role = role.map(str::to_string);
        }
        Ok(())
    }

    async fn delete(&self, internal_id: &str) -> Result<()> {
        lock(&self.users).retain(|u| u.id != internal_id);
        Ok(())
    }
}

/// In-memory mock for `VehicleRepository`
#[derive(Default, Clone)]
pub struct MockVehicleRepository {
    vehicles: Arc<Mutex<Vec<Vehicle>>>,
}

impl MockVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        lock(&self.vehicles).len()
    }
}

#[async_trait]
impl VehicleRepository for MockVehicleRepository {
    async fn insert(&self, vehicle: Vehicle) -> Result<()> {
        lock(&self.vehicles).push(vehicle);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Vehicle>> {
        Ok(lock(&self.vehicles).iter().find(|v| v.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_shapes: &[String]) -> Result<Vec<Vehicle>> {
        Ok(lock(&self.vehicles)
            .iter()
            .filter(|v| owner_shapes.contains(&v.owner_id))
            .cloned()
            .collect())
    }

    async fn list_public_by_owner(&self, owner_shapes: &[String]) -> Result<Vec<Vehicle>> {
        Ok(lock(&self.vehicles)
            .iter()
            .filter(|v| v.is_public && owner_shapes.contains(&v.owner_id))
            .cloned()
            .collect())
    }

    async fn update(&self, vehicle: Vehicle) -> Result<()> {
        let mut vehicles = lock(&self.vehicles);
        if let Some(existing) = vehicles.iter_mut().find(|v| v.id == vehicle.id) {
            *existing = vehicle;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        lock(&self.vehicles).retain(|v| v.id != id);
        Ok(())
    }
}

#[async_trait]
impl OwnedRecordStore for MockVehicleRepository {
    fn store_name(&self) -> &'static str {
        "vehicles"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.vehicles)
            .iter()
            .map(|v| OwnerRef { record_id: v.id.clone(), owner_id: v.owner_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut vehicles = lock(&self.vehicles);
        if let Some(vehicle) = vehicles.iter_mut().find(|v| v.id == record_id) {
            vehicle.owner_id = owner_id.to_string();
        }
        Ok(())
    }
}

/// In-memory mock for `PartRepository`
#[derive(Default, Clone)]
pub struct MockPartRepository {
    parts: Arc<Mutex<Vec<Part>>>,
}

impl MockPartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        lock(&self.parts).len()
    }
}

#[async_trait]
impl PartRepository for MockPartRepository {
    async fn insert(&self, part: Part) -> Result<()> {
        lock(&self.parts).push(part);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Part>> {
        Ok(lock(&self.parts).iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<Part>> {
        Ok(lock(&self.parts).iter().filter(|p| p.vehicle_id == vehicle_id).cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        lock(&self.parts).retain(|p| p.id != id);
        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: &str) -> Result<usize> {
        let mut parts = lock(&self.parts);
        let before = parts.len();
        parts.retain(|p| p.vehicle_id != vehicle_id);
        Ok(before - parts.len())
    }
}

#[async_trait]
impl OwnedRecordStore for MockPartRepository {
    fn store_name(&self) -> &'static str {
        "parts"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.parts)
            .iter()
            .map(|p| OwnerRef { record_id: p.id.clone(), owner_id: p.owner_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut parts = lock(&self.parts);
        if let Some(part) = parts.iter_mut().find(|p| p.id == record_id) {
            part.owner_id = owner_id.to_string();
        }
        Ok(())
    }
}

/// In-memory mock for `HotspotRepository`
#[derive(Default, Clone)]
pub struct MockHotspotRepository {
    hotspots: Arc<Mutex<Vec<Hotspot>>>,
}

impl MockHotspotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        lock(&self.hotspots).len()
    }
}

#[async_trait]
impl HotspotRepository for MockHotspotRepository {
    async fn insert(&self, hotspot: Hotspot) -> Result<()> {
        lock(&self.hotspots).push(hotspot);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Hotspot>> {
        Ok(lock(&self.hotspots).iter().find(|h| h.id == id).cloned())
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<Hotspot>> {
        Ok(lock(&self.hotspots).iter().filter(|h| h.vehicle_id == vehicle_id).cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        lock(&self.hotspots).retain(|h| h.id != id);
        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: &str) -> Result<usize> {
        let mut hotspots = lock(&self.hotspots);
        let before = hotspots.len();
        hotspots.retain(|h| h.vehicle_id != vehicle_id);
        Ok(before - hotspots.len())
    }
}

#[async_trait]
impl OwnedRecordStore for MockHotspotRepository {
    fn store_name(&self) -> &'static str {
        "hotspots"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.hotspots)
            .iter()
            .map(|h| OwnerRef { record_id: h.id.clone(), owner_id: h.owner_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut hotspots = lock(&self.hotspots);
        if let Some(hotspot) = hotspots.iter_mut().find(|h| h.id == record_id) {
            hotspot.owner_id = owner_id.to_string();
        }
        Ok(())
    }
}

/// In-memory mock for `UsageEventRepository`
#[derive(Default, Clone)]
pub struct MockUsageEventRepository {
    events: Arc<Mutex<Vec<UsageEvent>>>,
}

impl MockUsageEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<UsageEvent> {
        lock(&self.events).clone()
    }
}

#[async_trait]
impl UsageEventRepository for MockUsageEventRepository {
    async fn record(&self, event: UsageEvent) -> Result<()> {
        lock(&self.events).push(event);
        Ok(())
    }

    async fn anonymize_by_owner(&self, owner_shapes: &[String], sentinel: &str) -> Result<usize> {
        let mut events = lock(&self.events);
        let mut touched = 0;
        for event in events.iter_mut().filter(|e| owner_shapes.contains(&e.owner_id)) {
            event.owner_id = sentinel.to_string();
            event.metadata = None;
            touched += 1;
        }
        Ok(touched)
    }

    async fn summary_by_owner(&self, owner_shapes: &[String]) -> Result<UsageSummary> {
        let events = lock(&self.events);
        let owned: Vec<_> =
            events.iter().filter(|e| owner_shapes.contains(&e.owner_id)).collect();

        let mut event_types: Vec<String> =
            owned.iter().map(|e| e.event_type.clone()).collect();
        event_types.sort();
        event_types.dedup();

        Ok(UsageSummary {
            total_events: owned.len() as i64,
            event_types,
            first_event_at: owned.iter().map(|e| e.created_at).min(),
            last_event_at: owned.iter().map(|e| e.created_at).max(),
        })
    }
}

#[async_trait]
impl OwnedRecordStore for MockUsageEventRepository {
    fn store_name(&self) -> &'static str {
        "usage_events"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.events)
            .iter()
            .map(|e| OwnerRef { record_id: e.id.clone(), owner_id: e.owner_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut events = lock(&self.events);
        if let Some(event) = events.iter_mut().find(|e| e.id == record_id) {
            event.owner_id = owner_id.to_string();
        }
        Ok(())
    }
}

/// In-memory mock for `ApplicationRepository`
#[derive(Default, Clone)]
pub struct MockApplicationRepository {
    applications: Arc<Mutex<Vec<AffiliateApplication>>>,
}

impl MockApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        lock(&self.applications).len()
    }
}

#[async_trait]
impl ApplicationRepository for MockApplicationRepository {
    async fn insert(&self, application: AffiliateApplication) -> Result<()> {
        lock(&self.applications).push(application);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<AffiliateApplication>> {
        Ok(lock(&self.applications).iter().find(|a| a.id == id).cloned())
    }

    async fn pending_for_applicant(
        &self,
        applicant_shapes: &[String],
    ) -> Result<Option<AffiliateApplication>> {
        Ok(lock(&self.applications)
            .iter()
            .find(|a| {
                a.status == ApplicationStatus::Pending
                    && applicant_shapes.contains(&a.applicant_id)
            })
            .cloned())
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<AffiliateApplication>> {
        Ok(lock(&self.applications).iter().filter(|a| a.status == status).cloned().collect())
    }

    async fn set_review(
        &self,
        id: &str,
        status: ApplicationStatus,
        reviewed_by: &str,
        reviewed_at: i64,
    ) -> Result<()> {
        let mut applications = lock(&self.applications);
        if let Some(application) = applications.iter_mut().find(|a| a.id == id) {
            application.status = status;
            application.reviewed_by = Some(reviewed_by.to_string());
            application.reviewed_at = Some(reviewed_at);
        }
        Ok(())
    }

    async fn delete_by_applicant(&self, applicant_shapes: &[String]) -> Result<usize> {
        let mut applications = lock(&self.applications);
        let before = applications.len();
        applications.retain(|a| !applicant_shapes.contains(&a.applicant_id));
        Ok(before - applications.len())
    }
}

#[async_trait]
impl OwnedRecordStore for MockApplicationRepository {
    fn store_name(&self) -> &'static str {
        "affiliate_applications"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.applications)
            .iter()
            .map(|a| OwnerRef { record_id: a.id.clone(), owner_id: a.applicant_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut applications = lock(&self.applications);
        if let Some(application) = applications.iter_mut().find(|a| a.id == record_id) {
            application.applicant_id = owner_id.to_string();
        }
        Ok(())
    }
}

/// In-memory mock for `IssueReportRepository`
#[derive(Default, Clone)]
pub struct MockIssueReportRepository {
    reports: Arc<Mutex<Vec<IssueReport>>>,
}

impl MockIssueReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<IssueReport> {
        lock(&self.reports).clone()
    }
}

#[async_trait]
impl IssueReportRepository for MockIssueReportRepository {
    async fn insert(&self, report: IssueReport) -> Result<()> {
        lock(&self.reports).push(report);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<IssueReport>> {
        Ok(lock(&self.reports).iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_status(&self, status: IssueStatus) -> Result<Vec<IssueReport>> {
        Ok(lock(&self.reports).iter().filter(|r| r.status == status).cloned().collect())
    }

    async fn resolve(&self, id: &str, resolved_by: &str, resolved_at: i64) -> Result<()> {
        let mut reports = lock(&self.reports);
        if let Some(report) = reports.iter_mut().find(|r| r.id == id) {
            report.status = IssueStatus::Resolved;
            report.resolved_by = Some(resolved_by.to_string());
            report.resolved_at = Some(resolved_at);
        }
        Ok(())
    }

    async fn reattribute_reporter(
        &self,
        reporter_shapes: &[String],
        sentinel: &str,
    ) -> Result<usize> {
        let mut reports = lock(&self.reports);
        let mut touched = 0;
        for report in reports.iter_mut().filter(|r| reporter_shapes.contains(&r.reporter_id)) {
            report.reporter_id = sentinel.to_string();
            touched += 1;
        }
        Ok(touched)
    }
}

#[async_trait]
impl OwnedRecordStore for MockIssueReportRepository {
    fn store_name(&self) -> &'static str {
        "issue_reports"
    }

    async fn list_owner_refs(&self) -> Result<Vec<OwnerRef>> {
        Ok(lock(&self.reports)
            .iter()
            .map(|r| OwnerRef { record_id: r.id.clone(), owner_id: r.reporter_id.clone() })
            .collect())
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> Result<()> {
        let mut reports = lock(&self.reports);
        if let Some(report) = reports.iter_mut().find(|r| r.id == record_id) {
            report.reporter_id = owner_id.to_string();
        }
        Ok(())
    }
}
