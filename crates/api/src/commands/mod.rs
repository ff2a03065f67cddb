//! Server-side commands
//!
//! Thin functions the presentation layer calls. Every command takes the
//! application context plus the per-request caller context, gates through
//! the authorization policy, and delegates to a core service.

pub mod admin;
pub mod events;
pub mod garage;
pub mod gdpr;
pub mod moderation;
pub mod users;

pub use admin::*;
pub use events::*;
pub use garage::*;
pub use gdpr::*;
pub use moderation::*;
pub use users::*;
