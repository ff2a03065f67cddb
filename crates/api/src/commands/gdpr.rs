//! Data lifecycle commands: right to erasure and data portability

use gearbook_domain::{ErasureReceipt, RequestContext, Result, UserExport};

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Erase the caller's account: cascade-delete the garage, anonymize usage
/// events, delete the user record last.
pub async fn erase_me(ctx: &AppContext, req: &RequestContext) -> Result<ErasureReceipt> {
    run_command("gdpr::erase_me", ctx.lifecycle.erase(req)).await
}

/// Export everything the caller owns. `None` when anonymous or not
/// provisioned; the activity section is aggregate-only.
pub async fn export_my_data(
    ctx: &AppContext,
    req: &RequestContext,
) -> Result<Option<UserExport>> {
    run_command("gdpr::export_my_data", ctx.lifecycle.export(req)).await
}
