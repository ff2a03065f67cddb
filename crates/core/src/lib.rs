//! # Gearbook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Identity resolution across the three user-identifier shapes
//! - Authorization policy (authentication, admin, ownership gates)
//! - Port/adapter interfaces (traits)
//! - Use cases and services (garage, moderation, lifecycle, reconciliation)
//!
//! ## Architecture Principles
//! - Only depends on `gearbook-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod events;
pub mod garage;
pub mod identity;
pub mod lifecycle;
pub mod moderation;
pub mod reconciliation;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use auth::{AuthorizationPolicy, Principal};
pub use events::ports::UsageEventRepository;
pub use garage::ports::{HotspotRepository, PartRepository, VehicleRepository};
pub use garage::GarageService;
pub use identity::{canonical_from_composite, IdentifierMap, IdentifierShape, IdentityResolver};
pub use lifecycle::LifecycleService;
pub use moderation::ports::{ApplicationRepository, IssueReportRepository};
pub use moderation::ModerationService;
pub use reconciliation::ports::{OwnedRecordStore, OwnerRef};
pub use reconciliation::ReconciliationService;
pub use user::ports::UserRepository;
pub use user::{NewUser, UserService};
