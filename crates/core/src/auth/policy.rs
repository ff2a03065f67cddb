//! Authorization policy
//!
//! Pure gating functions consulted at the start of every privileged
//! operation. Failures are raised before any mutation is attempted; no
//! partial writes ever precede an authorization check.

use std::sync::Arc;

use gearbook_domain::{AuthClaims, GearbookError, RequestContext, Result, UserRecord};

use crate::identity::IdentityResolver;

/// The authenticated acting principal
///
/// Carries the validated claims and, when one exists, the caller's user
/// record. A signed-in caller whose record has not been provisioned yet is
/// still a principal; operations that need a record check for themselves.
#[derive(Debug, Clone)]
pub struct Principal {
    pub claims: AuthClaims,
    pub user: Option<UserRecord>,
}

impl Principal {
    /// The caller's canonical account id
    pub fn canonical_id(&self) -> &str {
        &self.claims.subject
    }

    /// Admin access is granted by EITHER the provider metadata claim OR
    /// the mirrored role column on the user record. The role lives in two
    /// places for historical reasons; checking only one would lock out
    /// admins granted through the other until the data is unified.
    pub fn is_admin(&self) -> bool {
        self.claims.has_admin_claim()
            || self.user.as_ref().is_some_and(UserRecord::has_admin_role)
    }
}

/// Authorization policy over the identity resolver
pub struct AuthorizationPolicy {
    resolver: Arc<IdentityResolver>,
}

impl AuthorizationPolicy {
    /// Create a new policy
    pub fn new(resolver: Arc<IdentityResolver>) -> Self {
        Self { resolver }
    }

    /// Require a valid authenticated caller.
    pub async fn require_authenticated(&self, ctx: &RequestContext) -> Result<Principal> {
        let claims = ctx
            .auth()
            .cloned()
            .ok_or_else(|| GearbookError::Unauthenticated("sign in required".into()))?;
        let user = self.resolver.resolve_from_context(ctx).await?;
        Ok(Principal { claims, user })
    }

    /// Require an authenticated caller with admin access from either role
    /// source.
    pub async fn require_admin(&self, ctx: &RequestContext) -> Result<Principal> {
        let principal = self.require_authenticated(ctx).await?;
        if principal.is_admin() {
            Ok(principal)
        } else {
            Err(GearbookError::Forbidden("admin access required".into()))
        }
    }

    /// Require that the caller owns the resource or is an admin.
    ///
    /// `resource_owner_id` may be in any identifier shape; it is resolved
    /// to canonical form before comparison.
    pub async fn require_owner_or_admin(
        &self,
        ctx: &RequestContext,
        resource_owner_id: &str,
    ) -> Result<Principal> {
        let principal = self.require_authenticated(ctx).await?;

        // Fast path: the owner column already holds one of the caller's
        // own shapes, resolvable or not
        if resource_owner_id == principal.claims.subject
            || resource_owner_id == principal.claims.token_identifier
        {
            return Ok(principal);
        }

        if let Some(owner_canonical) = self.resolver.to_canonical_id(resource_owner_id).await? {
            if owner_canonical == principal.claims.subject {
                return Ok(principal);
            }
        }

        if principal.is_admin() {
            return Ok(principal);
        }

        Err(GearbookError::Forbidden("not the resource owner".into()))
    }
}
