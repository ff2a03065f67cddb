//! Garage service - ownership-gated vehicle, part, and hotspot operations

use std::sync::Arc;

use chrono::{Datelike, Utc};
use gearbook_domain::constants::MIN_VEHICLE_YEAR;
use gearbook_domain::{
    GearbookError, Hotspot, Part, PartInput, RequestContext, Result, Vehicle, VehicleInput,
};
use tracing::info;
use uuid::Uuid;

use super::ports::{HotspotRepository, PartRepository, VehicleRepository};
use crate::auth::AuthorizationPolicy;
use crate::identity::IdentityResolver;
use crate::user::ports::UserRepository;

/// Garage service
pub struct GarageService {
    vehicles: Arc<dyn VehicleRepository>,
    parts: Arc<dyn PartRepository>,
    hotspots: Arc<dyn HotspotRepository>,
    users: Arc<dyn UserRepository>,
    resolver: Arc<IdentityResolver>,
    policy: Arc<AuthorizationPolicy>,
}

impl GarageService {
    /// Create a new garage service
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        parts: Arc<dyn PartRepository>,
        hotspots: Arc<dyn HotspotRepository>,
        users: Arc<dyn UserRepository>,
        resolver: Arc<IdentityResolver>,
        policy: Arc<AuthorizationPolicy>,
    ) -> Self {
        Self { vehicles, parts, hotspots, users, resolver, policy }
    }

    /// Create a vehicle in the caller's garage.
    ///
    /// The owner column always receives the canonical subject; the other
    /// identifier shapes are read-compatibility shims only.
    pub async fn create_vehicle(
        &self,
        ctx: &RequestContext,
        input: VehicleInput,
    ) -> Result<Vehicle> {
        let principal = self.policy.require_authenticated(ctx).await?;
        validate_vehicle_input(&input)?;

        let now = Utc::now().timestamp();
        let vehicle = Vehicle {
            id: Uuid::now_v7().to_string(),
            owner_id: principal.canonical_id().to_string(),
            make: input.make,
            model: input.model,
            year: input.year,
            trim: input.trim,
            description: input.description,
            primary_image_url: input.primary_image_url,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        };

        self.vehicles.insert(vehicle.clone()).await?;
        info!(vehicle_id = %vehicle.id, "vehicle created");
        Ok(vehicle)
    }

    /// Update a vehicle the caller owns (or any vehicle, for admins)
    pub async fn update_vehicle(
        &self,
        ctx: &RequestContext,
        vehicle_id: &str,
        input: VehicleInput,
    ) -> Result<Vehicle> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;
        validate_vehicle_input(&input)?;

        let updated = Vehicle {
            make: input.make,
            model: input.model,
            year: input.year,
            trim: input.trim,
            description: input.description,
            primary_image_url: input.primary_image_url,
            is_public: input.is_public,
            updated_at: Utc::now().timestamp(),
            ..vehicle
        };

        self.vehicles.update(updated.clone()).await?;
        Ok(updated)
    }

    /// Delete a vehicle and cascade to its parts and hotspots
    pub async fn delete_vehicle(&self, ctx: &RequestContext, vehicle_id: &str) -> Result<()> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;
        self.delete_vehicle_cascade(&vehicle).await?;
        Ok(())
    }

    /// Cascade-delete a vehicle's dependents, then the vehicle itself.
    /// Returns (parts, hotspots) counts.
    pub(crate) async fn delete_vehicle_cascade(&self, vehicle: &Vehicle) -> Result<(usize, usize)> {
        let hotspots = self.hotspots.delete_by_vehicle(&vehicle.id).await?;
        let parts = self.parts.delete_by_vehicle(&vehicle.id).await?;
        self.vehicles.delete(&vehicle.id).await?;
        info!(vehicle_id = %vehicle.id, parts, hotspots, "vehicle deleted with dependents");
        Ok((parts, hotspots))
    }

    /// The caller's own garage, public and private vehicles alike
    pub async fn my_garage(&self, ctx: &RequestContext) -> Result<Vec<Vehicle>> {
        self.policy.require_authenticated(ctx).await?;
        // A signed-in caller whose record is not provisioned yet owns nothing
        let Some(user) = self.resolver.resolve_from_context(ctx).await? else {
            return Ok(Vec::new());
        };
        self.vehicles.list_by_owner(&user.identifier_shapes()).await
    }

    /// A user's public profile garage, looked up by username. Anonymous
    /// access is legal; `None` when no such username exists.
    pub async fn public_garage(&self, username: &str) -> Result<Option<Vec<Vehicle>>> {
        let Some(owner) = self.users.get_by_username(username).await? else {
            return Ok(None);
        };
        let vehicles = self.vehicles.list_public_by_owner(&owner.identifier_shapes()).await?;
        Ok(Some(vehicles))
    }

    /// Attach a part to a vehicle the caller owns
    pub async fn add_part(
        &self,
        ctx: &RequestContext,
        vehicle_id: &str,
        input: PartInput,
    ) -> Result<Part> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        let principal = self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;

        if input.name.is_empty() {
            return Err(GearbookError::InvalidInput("part name is required".into()));
        }

        let part = Part {
            id: Uuid::now_v7().to_string(),
            vehicle_id: vehicle.id.clone(),
            owner_id: principal.canonical_id().to_string(),
            name: input.name,
            category: input.category,
            brand: input.brand,
            price_cents: input.price_cents,
            purchase_url: input.purchase_url,
            notes: input.notes,
            installed_at: input.installed_at,
            created_at: Utc::now().timestamp(),
        };

        self.parts.insert(part.clone()).await?;
        Ok(part)
    }

    /// Remove a part from a vehicle the caller owns
    pub async fn remove_part(&self, ctx: &RequestContext, part_id: &str) -> Result<()> {
        let part = self
            .parts
            .get(part_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("part not found".into()))?;
        self.policy.require_owner_or_admin(ctx, &part.owner_id).await?;
        self.parts.delete(part_id).await
    }

    /// Parts of a vehicle; private vehicles require ownership
    pub async fn list_parts(&self, ctx: &RequestContext, vehicle_id: &str) -> Result<Vec<Part>> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        if !vehicle.is_public {
            self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;
        }
        self.parts.list_by_vehicle(vehicle_id).await
    }

    /// Pin a hotspot onto a vehicle photo
    pub async fn pin_hotspot(
        &self,
        ctx: &RequestContext,
        vehicle_id: &str,
        image_url: String,
        x: f64,
        y: f64,
        part_id: Option<String>,
        label: Option<String>,
    ) -> Result<Hotspot> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        let principal = self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;

        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(GearbookError::InvalidInput(
                "hotspot coordinates must be fractions in 0.0..=1.0".into(),
            ));
        }
        if let Some(part_id) = &part_id {
            let part = self
                .parts
                .get(part_id)
                .await?
                .ok_or_else(|| GearbookError::NotFound("linked part not found".into()))?;
            if part.vehicle_id != vehicle.id {
                return Err(GearbookError::InvalidInput(
                    "linked part belongs to a different vehicle".into(),
                ));
            }
        }

        let hotspot = Hotspot {
            id: Uuid::now_v7().to_string(),
            vehicle_id: vehicle.id.clone(),
            owner_id: principal.canonical_id().to_string(),
            image_url,
            x,
            y,
            part_id,
            label,
            created_at: Utc::now().timestamp(),
        };

        self.hotspots.insert(hotspot.clone()).await?;
        Ok(hotspot)
    }

    /// Remove a hotspot from a vehicle the caller owns
    pub async fn remove_hotspot(&self, ctx: &RequestContext, hotspot_id: &str) -> Result<()> {
        let hotspot = self
            .hotspots
            .get(hotspot_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("hotspot not found".into()))?;
        self.policy.require_owner_or_admin(ctx, &hotspot.owner_id).await?;
        self.hotspots.delete(hotspot_id).await
    }

    /// Hotspots of a vehicle; private vehicles require ownership
    pub async fn list_hotspots(
        &self,
        ctx: &RequestContext,
        vehicle_id: &str,
    ) -> Result<Vec<Hotspot>> {
        let vehicle = self.get_existing_vehicle(vehicle_id).await?;
        if !vehicle.is_public {
            self.policy.require_owner_or_admin(ctx, &vehicle.owner_id).await?;
        }
        self.hotspots.list_by_vehicle(vehicle_id).await
    }

    async fn get_existing_vehicle(&self, vehicle_id: &str) -> Result<Vehicle> {
        self.vehicles
            .get(vehicle_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("vehicle not found".into()))
    }
}

fn validate_vehicle_input(input: &VehicleInput) -> Result<()> {
    if input.make.is_empty() || input.model.is_empty() {
        return Err(GearbookError::InvalidInput("make and model are required".into()));
    }
    let next_year = Utc::now().year() + 1;
    if input.year < MIN_VEHICLE_YEAR || input.year > next_year {
        return Err(GearbookError::InvalidInput(format!(
            "year must be between {MIN_VEHICLE_YEAR} and {next_year}"
        )));
    }
    Ok(())
}
