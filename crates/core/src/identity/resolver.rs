//! Identity resolver service
//!
//! Maps any of the three user-identifier shapes (or an authenticated
//! request context) to the single matching user record. Resolution misses
//! return `None`; authorization failures are signalled by the policy layer,
//! never here.

use std::sync::Arc;

use gearbook_domain::constants::{is_sentinel_owner, IDENTIFIER_SEPARATOR};
use gearbook_domain::{RequestContext, Result, UserRecord};
use uuid::Uuid;

use crate::user::ports::UserRepository;

/// The shape of a user-identifier string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierShape {
    /// Internal storage id assigned on insert (UUID)
    InternalId,
    /// Composite token identifier, `"<issuer>|<subject>"`
    Composite,
    /// Bare canonical subject from the identity provider
    CanonicalSubject,
}

impl IdentifierShape {
    /// Classify an identifier string by shape.
    ///
    /// Internal ids parse as UUIDs and contain no separator; composite
    /// identifiers contain the issuer/subject separator; anything else is
    /// treated as a bare canonical subject.
    pub fn classify(id: &str) -> Self {
        if Uuid::try_parse(id).is_ok() {
            Self::InternalId
        } else if id.contains(IDENTIFIER_SEPARATOR) {
            Self::Composite
        } else {
            Self::CanonicalSubject
        }
    }
}

/// Extract the canonical subject from a composite token identifier.
///
/// Splits on the last separator so issuer tags that are URLs survive. A
/// separator-less value is returned whole: degraded legacy rows used the
/// raw token identifier as the canonical id, and that fallback is kept.
pub fn canonical_from_composite(token_identifier: &str) -> &str {
    token_identifier
        .rsplit(IDENTIFIER_SEPARATOR)
        .next()
        .unwrap_or(token_identifier)
}

/// Identity resolver over the user record store
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    /// Create a new resolver
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Resolve the caller of a request to their user record.
    ///
    /// Anonymous requests resolve to `None`; that is legal for public read
    /// paths and not an error. For authenticated requests the claims carry
    /// both the composite token identifier and the canonical subject, so no
    /// shape detection is needed.
    pub async fn resolve_from_context(&self, ctx: &RequestContext) -> Result<Option<UserRecord>> {
        let Some(claims) = ctx.auth() else {
            return Ok(None);
        };

        if let Some(user) = self.users.get_by_token_identifier(&claims.token_identifier).await? {
            return Ok(Some(user));
        }
        self.users.get_by_canonical_id(&claims.subject).await
    }

    /// Resolve an identifier in any of the three shapes to a user record.
    ///
    /// Strategies are tried in order until one matches:
    /// (a) UUID-shaped strings attempt the internal-id lookup;
    /// (b) strings containing the separator attempt the token-identifier
    ///     lookup, then their subject suffix;
    /// (c) anything else is an exact lookup on the canonical subject.
    ///
    /// Sentinel owner values (anonymized or system-attributed records)
    /// never resolve.
    pub async fn find_by_any_identifier(&self, id: &str) -> Result<Option<UserRecord>> {
        if id.is_empty() || is_sentinel_owner(id) {
            return Ok(None);
        }

        if IdentifierShape::classify(id) == IdentifierShape::InternalId {
            if let Some(user) = self.users.get_by_internal_id(id).await? {
                return Ok(Some(user));
            }
        }

        if id.contains(IDENTIFIER_SEPARATOR) {
            if let Some(user) = self.users.get_by_token_identifier(id).await? {
                return Ok(Some(user));
            }
            return self.users.get_by_canonical_id(canonical_from_composite(id)).await;
        }

        self.users.get_by_canonical_id(id).await
    }

    /// All identifier shapes for the user an identifier resolves to.
    ///
    /// Callers querying a dependent store with historically inconsistent
    /// owner columns must filter by every returned shape, not just the
    /// canonical one. Empty when the identifier resolves to nothing.
    pub async fn identifier_shapes(&self, id: &str) -> Result<Vec<String>> {
        Ok(self
            .find_by_any_identifier(id)
            .await?
            .map(|user| user.identifier_shapes())
            .unwrap_or_default())
    }

    /// Resolve an identifier and return only the canonical subject, the
    /// form all new writes use.
    pub async fn to_canonical_id(&self, id: &str) -> Result<Option<String>> {
        Ok(self.find_by_any_identifier(id).await?.map(|user| user.subject))
    }
}
