//! Admin command coverage: role management and the in-band batch job

mod support;

use gearbook_core::VehicleRepository;
use gearbook_domain::{GearbookError, Vehicle, VehicleInput};
use gearbook_lib::commands;
use support::{admin_auth_ctx, auth_ctx, TestApp};
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread")]
async fn set_user_role_resolves_any_identifier_shape() {
    let app = TestApp::new();
    let admin = admin_auth_ctx("user_admin");
    commands::sign_in(&app.ctx, &admin).await.expect("admin signs in");

    let target_req = auth_ctx("user_target");
    let target = commands::sign_in(&app.ctx, &target_req).await.expect("target signs in");

    // Grant via the composite identifier shape
    let promoted =
        commands::set_user_role(&app.ctx, &admin, &target.token_identifier, Some("admin"))
            .await
            .expect("promote");
    assert_eq!(promoted.role.as_deref(), Some("admin"));

    // The mirrored role alone now passes the admin gate (no metadata claim)
    commands::pending_affiliate_applications(&app.ctx, &target_req)
        .await
        .expect("db-role admin passes the gate");

    // Revoke via the internal storage id shape
    let demoted = commands::set_user_role(&app.ctx, &admin, &target.id, None)
        .await
        .expect("demote");
    assert!(demoted.role.is_none());

    let denied = commands::pending_affiliate_applications(&app.ctx, &target_req).await;
    assert!(matches!(denied, Err(GearbookError::Forbidden(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_admin_cannot_touch_roles_or_run_the_batch_job() {
    let app = TestApp::new();
    let plain = auth_ctx("user_plain");
    let user = commands::sign_in(&app.ctx, &plain).await.expect("sign-in");

    let role = commands::set_user_role(&app.ctx, &plain, &user.id, Some("admin")).await;
    assert!(matches!(role, Err(GearbookError::Forbidden(_))));

    let job = commands::run_identity_reconciliation(&app.ctx, &plain).await;
    assert!(matches!(job, Err(GearbookError::Forbidden(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn reconciliation_command_repairs_legacy_rows() {
    let app = TestApp::new();
    let admin = admin_auth_ctx("user_admin");
    commands::sign_in(&app.ctx, &admin).await.expect("admin signs in");

    let owner_req = auth_ctx("user_owner");
    let owner = commands::sign_in(&app.ctx, &owner_req).await.expect("owner signs in");

    // Simulate a legacy row whose owner column holds the internal id
    let now = chrono::Utc::now().timestamp();
    let legacy = Vehicle {
        id: Uuid::now_v7().to_string(),
        owner_id: owner.id.clone(),
        make: "Subaru".into(),
        model: "Impreza".into(),
        year: 2004,
        trim: Some("STI".into()),
        description: None,
        primary_image_url: None,
        is_public: true,
        created_at: now,
        updated_at: now,
    };
    app.ctx.vehicles.insert(legacy.clone()).await.expect("legacy row");

    // A row created through the command layer is already canonical
    commands::create_vehicle(
        &app.ctx,
        &owner_req,
        VehicleInput {
            make: "Mitsubishi".into(),
            model: "Evo".into(),
            year: 2006,
            trim: None,
            description: None,
            primary_image_url: None,
            is_public: true,
        },
    )
    .await
    .expect("canonical row");

    let report =
        commands::run_identity_reconciliation(&app.ctx, &admin).await.expect("job ran");
    assert_eq!(report.updates_by_store["vehicles"], 1);

    let repaired = app.ctx.vehicles.get(&legacy.id).await.unwrap().unwrap();
    assert_eq!(repaired.owner_id, owner.subject);

    // Idempotence through the command surface as well
    let second =
        commands::run_identity_reconciliation(&app.ctx, &admin).await.expect("second run");
    assert_eq!(second.total_updates(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn find_user_is_admin_only() {
    let app = TestApp::new();
    let admin = admin_auth_ctx("user_admin");
    commands::sign_in(&app.ctx, &admin).await.expect("admin signs in");
    let target = commands::sign_in(&app.ctx, &auth_ctx("user_target")).await.expect("target");

    let found = commands::find_user(&app.ctx, &admin, &target.subject).await.unwrap();
    assert_eq!(found.expect("found").id, target.id);

    let denied = commands::find_user(&app.ctx, &auth_ctx("user_target"), "user_admin").await;
    assert!(matches!(denied, Err(GearbookError::Forbidden(_))));
}
