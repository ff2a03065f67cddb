//! Administrative commands

use gearbook_core::UserRepository;
use gearbook_domain::{GearbookError, ReconciliationReport, RequestContext, Result, UserRecord};

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Grant or revoke a user's mirrored admin role. Admin.
///
/// `user_id` may be in any identifier shape; the target is resolved
/// through the identity resolver before the role column is touched.
pub async fn set_user_role(
    ctx: &AppContext,
    req: &RequestContext,
    user_id: &str,
    role: Option<&str>,
) -> Result<UserRecord> {
    run_command("admin::set_user_role", async {
        ctx.policy.require_admin(req).await?;

        let target = ctx
            .resolver
            .find_by_any_identifier(user_id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("user not found".into()))?;

        ctx.user_service.set_role(&target.id, role).await?;
        ctx.users
            .get_by_internal_id(&target.id)
            .await?
            .ok_or_else(|| GearbookError::NotFound("user not found".into()))
    })
    .await
}

/// Look up a user by any identifier shape. Admin.
pub async fn find_user(
    ctx: &AppContext,
    req: &RequestContext,
    user_id: &str,
) -> Result<Option<UserRecord>> {
    run_command("admin::find_user", async {
        ctx.policy.require_admin(req).await?;
        ctx.resolver.find_by_any_identifier(user_id).await
    })
    .await
}

/// Run the identity reconciliation batch job. Admin.
///
/// The operator CLI invokes the service directly; this command is the
/// in-band variant for the admin dashboard.
pub async fn run_identity_reconciliation(
    ctx: &AppContext,
    req: &RequestContext,
) -> Result<ReconciliationReport> {
    run_command("admin::run_identity_reconciliation", async {
        ctx.policy.require_admin(req).await?;
        ctx.reconciliation.run().await
    })
    .await
}
