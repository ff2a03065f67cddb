//! Port interfaces for garage persistence
//!
//! Owner-filtered reads take a slice of identifier shapes because legacy
//! rows may hold any of the three; passing only the canonical subject is
//! correct solely for collections the reconciliation job has normalized.

use async_trait::async_trait;
use gearbook_domain::{Hotspot, Part, Result, Vehicle};

/// Trait for vehicle persistence
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn insert(&self, vehicle: Vehicle) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Vehicle>>;

    /// Vehicles whose owner column matches any of the given shapes
    async fn list_by_owner(&self, owner_shapes: &[String]) -> Result<Vec<Vehicle>>;

    /// Public vehicles only, for profile pages
    async fn list_public_by_owner(&self, owner_shapes: &[String]) -> Result<Vec<Vehicle>>;

    async fn update(&self, vehicle: Vehicle) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Trait for part persistence
#[async_trait]
pub trait PartRepository: Send + Sync {
    async fn insert(&self, part: Part) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Part>>;

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<Part>>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete all parts of a vehicle, returning the number removed
    async fn delete_by_vehicle(&self, vehicle_id: &str) -> Result<usize>;
}

/// Trait for hotspot persistence
#[async_trait]
pub trait HotspotRepository: Send + Sync {
    async fn insert(&self, hotspot: Hotspot) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Hotspot>>;

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<Hotspot>>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete all hotspots of a vehicle, returning the number removed
    async fn delete_by_vehicle(&self, vehicle_id: &str) -> Result<usize>;
}
