//! # Gearbook API
//!
//! Server-side function layer - commands and the operator entry point.
//!
//! This crate contains:
//! - Commands (the queries/mutations the presentation layer calls)
//! - Application context (dependency injection)
//! - Operator CLI entry point (reconciliation batch job, health check)
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Every command takes an explicit per-request `RequestContext`

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
