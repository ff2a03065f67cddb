//! Database implementations

pub mod application_repository;
pub mod hotspot_repository;
pub mod manager;
pub mod part_repository;
pub mod report_repository;
pub mod repository;
pub mod sqlcipher_pool;
pub mod usage_event_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use application_repository::*;
pub use hotspot_repository::*;
pub use manager::*;
pub use part_repository::*;
pub use report_repository::*;
pub use sqlcipher_pool::*;
pub use usage_event_repository::*;
pub use user_repository::*;
pub use vehicle_repository::*;
