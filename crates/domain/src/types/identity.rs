//! Request identity types
//!
//! Every server-side function receives an explicit `RequestContext` instead
//! of reading ambient authentication state. The provider integration
//! validates token signatures before constructing one; the core only ever
//! reads the claim fields.

use serde::{Deserialize, Serialize};

use crate::constants::ADMIN_ROLE;

/// Claims extracted from a validated identity-provider token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Canonical account id (the provider subject)
    pub subject: String,
    /// Composite token identifier, `"<issuer>|<subject>"`
    pub token_identifier: String,
    /// Email address as asserted by the provider
    pub email: Option<String>,
    /// Display name as asserted by the provider
    pub name: Option<String>,
    /// Optional role from the provider's public metadata
    pub role: Option<String>,
}

impl AuthClaims {
    /// Whether the provider metadata claim grants admin access
    pub fn has_admin_claim(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Per-request caller context
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    auth: Option<AuthClaims>,
}

impl RequestContext {
    /// Context for an unauthenticated (public) request
    pub fn anonymous() -> Self {
        Self { auth: None }
    }

    /// Context for an authenticated request
    pub fn authenticated(claims: AuthClaims) -> Self {
        Self { auth: Some(claims) }
    }

    /// The caller's claims, when authenticated
    pub fn auth(&self) -> Option<&AuthClaims> {
        self.auth.as_ref()
    }
}
