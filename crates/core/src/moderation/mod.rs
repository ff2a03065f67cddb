//! Moderation: affiliate applications and issue reports

pub mod ports;
pub mod service;

pub use service::{ApplicationInput, ModerationService};
