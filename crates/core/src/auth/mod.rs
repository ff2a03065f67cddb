//! Authorization policy

pub mod policy;

pub use policy::{AuthorizationPolicy, Principal};
