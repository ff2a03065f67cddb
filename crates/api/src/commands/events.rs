//! Usage event commands

use chrono::Utc;
use gearbook_core::UsageEventRepository;
use gearbook_domain::{GearbookError, RequestContext, Result, UsageEvent};
use uuid::Uuid;

use crate::context::AppContext;
use crate::utils::logging::run_command;

/// Record a usage event for the caller.
///
/// The owner column always receives the canonical subject. Metadata, when
/// present, must be a JSON document; it is stripped wholesale if the owner
/// later erases their account.
pub async fn record_event(
    ctx: &AppContext,
    req: &RequestContext,
    event_type: &str,
    metadata: Option<String>,
) -> Result<()> {
    run_command("events::record_event", async {
        let principal = ctx.policy.require_authenticated(req).await?;

        if event_type.is_empty() {
            return Err(GearbookError::InvalidInput("event type is required".into()));
        }
        if let Some(metadata) = &metadata {
            serde_json::from_str::<serde_json::Value>(metadata).map_err(|e| {
                GearbookError::InvalidInput(format!("event metadata is not valid JSON: {e}"))
            })?;
        }

        ctx.events
            .record(UsageEvent {
                id: Uuid::now_v7().to_string(),
                owner_id: principal.canonical_id().to_string(),
                event_type: event_type.to_string(),
                metadata,
                created_at: Utc::now().timestamp(),
            })
            .await
    })
    .await
}
