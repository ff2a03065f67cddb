//! # Gearbook Common
//!
//! Shared infrastructure plumbing with no business logic.
//!
//! This crate contains:
//! - SQLCipher connection pooling (r2d2-based)
//! - Storage error types
//!
//! ## Architecture
//! - No dependencies on other Gearbook crates
//! - Application schema management lives in `gearbook-infra`

pub mod storage;

pub use storage::error::{StorageError, StorageResult};
