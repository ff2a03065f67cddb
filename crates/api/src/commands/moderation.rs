//! Moderation commands: affiliate applications and issue reports

use gearbook_core::moderation::service::ApplicationInput;
use gearbook_domain::{
    AffiliateApplication, IssueReport, ReportSubject, RequestContext, Result,
};

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Submit an affiliate application.
pub async fn submit_affiliate_application(
    ctx: &AppContext,
    req: &RequestContext,
    input: ApplicationInput,
) -> Result<AffiliateApplication> {
    run_command(
        "moderation::submit_affiliate_application",
        ctx.moderation.submit_application(req, input),
    )
    .await
}

/// Applications awaiting review. Admin.
pub async fn pending_affiliate_applications(
    ctx: &AppContext,
    req: &RequestContext,
) -> Result<Vec<AffiliateApplication>> {
    run_command(
        "moderation::pending_affiliate_applications",
        ctx.moderation.list_pending_applications(req),
    )
    .await
}

/// Approve or reject a pending application. Admin.
pub async fn review_affiliate_application(
    ctx: &AppContext,
    req: &RequestContext,
    application_id: &str,
    approve: bool,
) -> Result<AffiliateApplication> {
    run_command(
        "moderation::review_affiliate_application",
        ctx.moderation.review_application(req, application_id, approve),
    )
    .await
}

/// File an issue report against a vehicle or user.
pub async fn report_issue(
    ctx: &AppContext,
    req: &RequestContext,
    subject_kind: ReportSubject,
    subject_id: &str,
    reason: String,
) -> Result<IssueReport> {
    run_command(
        "moderation::report_issue",
        ctx.moderation.file_report(req, subject_kind, subject_id, reason),
    )
    .await
}

/// Open issue reports. Admin.
pub async fn open_issue_reports(
    ctx: &AppContext,
    req: &RequestContext,
) -> Result<Vec<IssueReport>> {
    run_command("moderation::open_issue_reports", ctx.moderation.list_open_reports(req)).await
}

/// Mark an issue report resolved. Admin.
pub async fn resolve_issue_report(
    ctx: &AppContext,
    req: &RequestContext,
    report_id: &str,
) -> Result<()> {
    run_command("moderation::resolve_issue_report", ctx.moderation.resolve_report(req, report_id))
        .await
}

/// Take down a vehicle that violates content rules. Admin; the audit trail
/// is attributed to the system actor.
pub async fn take_down_vehicle(
    ctx: &AppContext,
    req: &RequestContext,
    vehicle_id: &str,
) -> Result<()> {
    run_command("moderation::take_down_vehicle", ctx.moderation.take_down_vehicle(req, vehicle_id))
        .await
}
