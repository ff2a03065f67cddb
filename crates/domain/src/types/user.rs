//! User record types
//!
//! One record per registered person, reachable by any of its three
//! identifier shapes: the internal storage id, the composite token
//! identifier, and the canonical provider subject.

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::ADMIN_ROLE;

/// User record stored in the user collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UserRecord {
    /// Internal storage id (UUIDv7, assigned on insert)
    pub id: String,
    /// Canonical account id: the provider-issued subject
    pub subject: String,
    /// Composite token identifier, `"<issuer>|<subject>"`
    pub token_identifier: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Mirrored role; `"admin"` grants administrative access
    pub role: Option<String>,
    pub profile_complete: bool,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub created_at: i64,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub updated_at: i64,
}

impl UserRecord {
    /// Whether the mirrored database role grants admin access.
    ///
    /// The provider metadata claim is the other admin source; the policy
    /// ORs the two.
    pub fn has_admin_role(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    /// All identifier shapes under which this record's dependent data may
    /// have been written: internal id, composite identifier, canonical
    /// subject.
    pub fn identifier_shapes(&self) -> Vec<String> {
        vec![self.id.clone(), self.token_identifier.clone(), self.subject.clone()]
    }
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
