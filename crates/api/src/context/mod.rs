//! Application context - dependency injection container

use std::sync::Arc;

use gearbook_core::events::ports::UsageEventRepository as UsageEventRepositoryPort;
use gearbook_core::garage::ports::{
    HotspotRepository as HotspotRepositoryPort, PartRepository as PartRepositoryPort,
    VehicleRepository as VehicleRepositoryPort,
};
use gearbook_core::moderation::ports::{
    ApplicationRepository as ApplicationRepositoryPort,
    IssueReportRepository as IssueReportRepositoryPort,
};
use gearbook_core::reconciliation::ports::OwnedRecordStore;
use gearbook_core::user::ports::UserRepository as UserRepositoryPort;
use gearbook_core::{
    AuthorizationPolicy, GarageService, IdentityResolver, LifecycleService, ModerationService,
    ReconciliationService, UserService,
};
use gearbook_domain::{Config, Result};
use gearbook_infra::database::{
    DbManager, SqlCipherApplicationRepository, SqlCipherHotspotRepository,
    SqlCipherIssueReportRepository, SqlCipherPartRepository, SqlCipherUsageEventRepository,
    SqlCipherUserRepository, SqlCipherVehicleRepository,
};

/// Type alias for user repository port trait object
type DynUserRepository = dyn UserRepositoryPort + 'static;

/// Type alias for vehicle repository port trait object
type DynVehicleRepository = dyn VehicleRepositoryPort + 'static;

/// Type alias for part repository port trait object
type DynPartRepository = dyn PartRepositoryPort + 'static;

/// Type alias for hotspot repository port trait object
type DynHotspotRepository = dyn HotspotRepositoryPort + 'static;

/// Type alias for usage event repository port trait object
type DynUsageEventRepository = dyn UsageEventRepositoryPort + 'static;

/// Type alias for application repository port trait object
type DynApplicationRepository = dyn ApplicationRepositoryPort + 'static;

/// Type alias for issue report repository port trait object
type DynIssueReportRepository = dyn IssueReportRepositoryPort + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    // Core services
    pub config: Config,
    pub db: Arc<DbManager>,

    // Repository ports
    pub users: Arc<DynUserRepository>,
    pub vehicles: Arc<DynVehicleRepository>,
    pub parts: Arc<DynPartRepository>,
    pub hotspots: Arc<DynHotspotRepository>,
    pub events: Arc<DynUsageEventRepository>,
    pub applications: Arc<DynApplicationRepository>,
    pub reports: Arc<DynIssueReportRepository>,

    // Domain services
    pub resolver: Arc<IdentityResolver>,
    pub policy: Arc<AuthorizationPolicy>,
    pub user_service: Arc<UserService>,
    pub garage: Arc<GarageService>,
    pub moderation: Arc<ModerationService>,
    pub lifecycle: Arc<LifecycleService>,
    pub reconciliation: Arc<ReconciliationService>,
}

impl AppContext {
    /// Create a context from configuration: open the database, run
    /// migrations, and wire every service.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(
            &config.database.path,
            config.database.pool_size,
            config.database.encryption_key.as_deref(),
        )?);
        db.run_migrations()?;
        Ok(Self::with_database(config, db))
    }

    /// Wire a context over an already-migrated database.
    ///
    /// Used by `new` and by integration tests that manage their own
    /// temporary databases.
    pub fn with_database(config: Config, db: Arc<DbManager>) -> Self {
        let user_repo = Arc::new(SqlCipherUserRepository::new(Arc::clone(&db)));
        let vehicle_repo = Arc::new(SqlCipherVehicleRepository::new(Arc::clone(&db)));
        let part_repo = Arc::new(SqlCipherPartRepository::new(Arc::clone(&db)));
        let hotspot_repo = Arc::new(SqlCipherHotspotRepository::new(Arc::clone(&db)));
        let event_repo = Arc::new(SqlCipherUsageEventRepository::new(Arc::clone(&db)));
        let application_repo = Arc::new(SqlCipherApplicationRepository::new(Arc::clone(&db)));
        let report_repo = Arc::new(SqlCipherIssueReportRepository::new(Arc::clone(&db)));

        let users: Arc<DynUserRepository> = user_repo.clone();
        let vehicles: Arc<DynVehicleRepository> = vehicle_repo.clone();
        let parts: Arc<DynPartRepository> = part_repo.clone();
        let hotspots: Arc<DynHotspotRepository> = hotspot_repo.clone();
        let events: Arc<DynUsageEventRepository> = event_repo.clone();
        let applications: Arc<DynApplicationRepository> = application_repo.clone();
        let reports: Arc<DynIssueReportRepository> = report_repo.clone();

        let resolver = Arc::new(IdentityResolver::new(users.clone()));
        let policy = Arc::new(AuthorizationPolicy::new(resolver.clone()));
        let user_service = Arc::new(UserService::new(users.clone()));

        let garage = Arc::new(GarageService::new(
            vehicles.clone(),
            parts.clone(),
            hotspots.clone(),
            users.clone(),
            resolver.clone(),
            policy.clone(),
        ));

        let moderation = Arc::new(ModerationService::new(
            applications.clone(),
            reports.clone(),
            vehicles.clone(),
            events.clone(),
            garage.clone(),
            resolver.clone(),
            policy.clone(),
        ));

        let lifecycle = Arc::new(LifecycleService::new(
            users.clone(),
            vehicles.clone(),
            parts.clone(),
            hotspots.clone(),
            events.clone(),
            applications.clone(),
            reports.clone(),
            resolver.clone(),
        ));

        // Every dependent store participates in the batch repair
        let owned_stores: Vec<Arc<dyn OwnedRecordStore>> = vec![
            vehicle_repo,
            part_repo,
            hotspot_repo,
            event_repo,
            application_repo,
            report_repo,
        ];
        let reconciliation =
            Arc::new(ReconciliationService::new(users.clone(), owned_stores));

        Self {
            config,
            db,
            users,
            vehicles,
            parts,
            hotspots,
            events,
            applications,
            reports,
            resolver,
            policy,
            user_service,
            garage,
            moderation,
            lifecycle,
            reconciliation,
        }
    }
}
