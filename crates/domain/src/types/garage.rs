//! Garage types: vehicles, parts, photo hotspots
//!
//! Every record carries an `owner_id` foreign key. New writes always store
//! the owner's canonical subject; legacy rows may still hold an internal
//! storage id or a composite token identifier until the reconciliation job
//! has run over the collection.

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// A vehicle profile in a user's garage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Vehicle {
    pub id: String,
    /// Owner identifier (canonical subject on new writes)
    pub owner_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: Option<String>,
    pub description: Option<String>,
    /// Object-storage URL; the storage service itself is external
    pub primary_image_url: Option<String>,
    /// Whether the vehicle appears on the owner's public profile page
    pub is_public: bool,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub created_at: i64,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub updated_at: i64,
}

/// Input for creating or updating a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: Option<String>,
    pub description: Option<String>,
    pub primary_image_url: Option<String>,
    pub is_public: bool,
}

/// A modification/part record attached to a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Part {
    pub id: String,
    pub vehicle_id: String,
    pub owner_id: String,
    pub name: String,
    /// Free-form category, e.g. "suspension", "wheels"
    pub category: String,
    pub brand: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub price_cents: Option<i64>,
    pub purchase_url: Option<String>,
    pub notes: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub installed_at: Option<i64>,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub created_at: i64,
}

/// Input for attaching a part to a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PartInput {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub price_cents: Option<i64>,
    pub purchase_url: Option<String>,
    pub notes: Option<String>,
    pub installed_at: Option<i64>,
}

/// A hotspot pinning a part onto a vehicle photo
///
/// Coordinates are fractions of the image dimensions in `0.0..=1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Hotspot {
    pub id: String,
    pub vehicle_id: String,
    pub owner_id: String,
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    /// Part this hotspot links to, when any
    pub part_id: Option<String>,
    pub label: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub created_at: i64,
}
