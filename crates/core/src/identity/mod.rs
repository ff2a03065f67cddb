//! Identity resolution
//!
//! A user is reachable by three identifier shapes: the internal storage id
//! assigned by the document store, the composite `"<issuer>|<subject>"`
//! token identifier, and the bare canonical subject issued by the identity
//! provider. This module maps between them.

pub mod mapping;
pub mod resolver;

pub use mapping::IdentifierMap;
pub use resolver::{canonical_from_composite, IdentifierShape, IdentityResolver};
