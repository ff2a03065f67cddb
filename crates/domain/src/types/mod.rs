//! Domain data types

pub mod events;
pub mod export;
pub mod garage;
pub mod identity;
pub mod moderation;
pub mod reconciliation;
pub mod user;

pub use events::*;
pub use export::*;
pub use garage::*;
pub use identity::*;
pub use moderation::*;
pub use reconciliation::*;
pub use user::*;
