//! User account commands

use gearbook_core::UserRepository;
use gearbook_domain::{
    GearbookError, ProfileUpdate, RequestContext, Result, UserRecord, Vehicle,
};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Public profile page payload: the shareable view of a user's garage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub vehicles: Vec<Vehicle>,
}

/// Sign-in hook: return the caller's record, provisioning one from the
/// token claims on first sign-in.
pub async fn sign_in(ctx: &AppContext, req: &RequestContext) -> Result<UserRecord> {
    run_command("users::sign_in", async {
        let principal = ctx.policy.require_authenticated(req).await?;
        ctx.user_service.ensure_provisioned(&principal.claims).await
    })
    .await
}

/// The caller's own record; `None` when anonymous or not yet provisioned.
pub async fn get_me(ctx: &AppContext, req: &RequestContext) -> Result<Option<UserRecord>> {
    run_command("users::get_me", ctx.resolver.resolve_from_context(req)).await
}

/// Update the caller's profile fields.
pub async fn update_my_profile(
    ctx: &AppContext,
    req: &RequestContext,
    update: ProfileUpdate,
) -> Result<UserRecord> {
    run_command("users::update_my_profile", async {
        let principal = ctx.policy.require_authenticated(req).await?;
        let user = principal
            .user
            .ok_or_else(|| GearbookError::NotFound("account not provisioned".into()))?;
        ctx.user_service.update_profile(&user, update).await
    })
    .await
}

/// Claim a username for the caller; completes the profile.
pub async fn claim_username(
    ctx: &AppContext,
    req: &RequestContext,
    username: &str,
) -> Result<UserRecord> {
    run_command("users::claim_username", async {
        let principal = ctx.policy.require_authenticated(req).await?;
        let user = principal
            .user
            .ok_or_else(|| GearbookError::NotFound("account not provisioned".into()))?;
        ctx.user_service.set_username(&user, username).await
    })
    .await
}

/// Whether a username is valid and unclaimed. Public.
pub async fn check_username(ctx: &AppContext, username: &str) -> Result<bool> {
    run_command("users::check_username", ctx.user_service.is_username_available(username)).await
}

/// A user's shareable public profile, by username. Public; `None` when the
/// username is unknown.
pub async fn get_public_profile(
    ctx: &AppContext,
    username: &str,
) -> Result<Option<PublicProfile>> {
    run_command("users::get_public_profile", async {
        let Some(user) = ctx.users.get_by_username(username).await? else {
            return Ok(None);
        };
        let Some(vehicles) = ctx.garage.public_garage(username).await? else {
            return Ok(None);
        };

        Ok(Some(PublicProfile {
            username: username.to_string(),
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            vehicles,
        }))
    })
    .await
}
