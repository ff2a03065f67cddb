//! Shared test support for core integration tests
#![allow(dead_code)]

pub mod repositories;

use gearbook_domain::{AuthClaims, RequestContext, UserRecord};
use uuid::Uuid;

/// Build a user record with consistent identifier shapes
pub fn user_record(subject: &str) -> UserRecord {
    UserRecord {
        id: Uuid::now_v7().to_string(),
        subject: subject.to_string(),
        token_identifier: format!("clerk|{subject}"),
        email: format!("{subject}@example.com"),
        username: Some(format!("{subject}_garage")),
        display_name: None,
        avatar_url: None,
        role: None,
        profile_complete: true,
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

/// Claims matching a user record, with no role metadata
pub fn claims_for(user: &UserRecord) -> AuthClaims {
    AuthClaims {
        subject: user.subject.clone(),
        token_identifier: user.token_identifier.clone(),
        email: Some(user.email.clone()),
        name: None,
        role: None,
    }
}

/// Authenticated request context for a user record
pub fn ctx_for(user: &UserRecord) -> RequestContext {
    RequestContext::authenticated(claims_for(user))
}

/// Authenticated context with an admin metadata claim
pub fn admin_ctx_for(user: &UserRecord) -> RequestContext {
    let mut claims = claims_for(user);
    claims.role = Some("admin".to_string());
    RequestContext::authenticated(claims)
}
