//! Garage commands: vehicles, parts, hotspots

use gearbook_core::VehicleRepository;
use gearbook_domain::{
    GearbookError, Hotspot, Part, PartInput, RequestContext, Result, Vehicle, VehicleInput,
};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Input for pinning a hotspot onto a vehicle photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotInput {
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    pub part_id: Option<String>,
    pub label: Option<String>,
}

/// Create a vehicle in the caller's garage.
pub async fn create_vehicle(
    ctx: &AppContext,
    req: &RequestContext,
    input: VehicleInput,
) -> Result<Vehicle> {
    run_command("garage::create_vehicle", ctx.garage.create_vehicle(req, input)).await
}

/// Update a vehicle the caller owns.
pub async fn update_vehicle(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
    input: VehicleInput,
) -> Result<Vehicle> {
    run_command("garage::update_vehicle", ctx.garage.update_vehicle(req, vehicle_id, input))
        .await
}

/// Delete a vehicle the caller owns, cascading to parts and hotspots.
pub async fn delete_vehicle(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
) -> Result<()> {
    run_command("garage::delete_vehicle", ctx.garage.delete_vehicle(req, vehicle_id)).await
}

/// The caller's own garage.
pub async fn my_garage(ctx: &AppContext, req: &RequestContext) -> Result<Vec<Vehicle>> {
    run_command("garage::my_garage", ctx.garage.my_garage(req)).await
}

/// A single vehicle. Private vehicles require ownership or admin.
pub async fn get_vehicle(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
) -> Result<Vehicle> {
    run_command("garage::get_vehicle", async {
        let vehicle = ctx
            .vehicles
            .get(vehicle_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("vehicle not found".into()))?;
        if !vehicle.is_public {
            ctx.policy.require_owner_or_admin(req, &vehicle.owner_id).await?;
        }
        Ok(vehicle)
    })
    .await
}

/// Attach a part to a vehicle the caller owns.
pub async fn add_part(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
    input: PartInput,
) -> Result<Part> {
    run_command("garage::add_part", ctx.garage.add_part(req, vehicle_id, input)).await
}

/// Remove a part from a vehicle the caller owns.
pub async fn remove_part(ctx: &AppContext, req: &RequestContext, part_id: &str) -> Result<()> {
    run_command("garage::remove_part", ctx.garage.remove_part(req, part_id)).await
}

/// Parts of a vehicle. Private vehicles require ownership.
pub async fn vehicle_parts(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
) -> Result<Vec<Part>> {
    run_command("garage::vehicle_parts", ctx.garage.list_parts(req, vehicle_id)).await
}

/// Pin a hotspot onto a vehicle photo.
pub async fn pin_hotspot(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
    input: HotspotInput,
) -> Result<Hotspot> {
    run_command(
        "garage::pin_hotspot",
        ctx.garage.pin_hotspot(
            req,
            vehicle_id,
            input.image_url,
            input.x,
            input.y,
            input.part_id,
            input.label,
        ),
    )
    .await
}

/// Remove a hotspot from a vehicle the caller owns.
pub async fn remove_hotspot(
    ctx: &AppContext,
    req: &RequestContext,
    hotspot_id: &str,
) -> Result<()> {
    run_command("garage::remove_hotspot", ctx.garage.remove_hotspot(req, hotspot_id)).await
}

/// Hotspots of a vehicle. Private vehicles require ownership.
pub async fn vehicle_hotspots(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
) -> Result<Vec<Hotspot>> {
    run_command("garage::vehicle_hotspots", ctx.garage.list_hotspots(req, vehicle_id)).await
}
