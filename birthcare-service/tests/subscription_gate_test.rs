//! Subscription gate tests: denial shape, advisory remaining header,
//! activation supersede and the expiry sweep.

mod common;

use birthcare_service::services::SubscriptionGate;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn owner_without_subscription_is_denied_with_code_and_redirect() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let facility_id = app.seed_facility(owner).await;
    let patient_id = app.seed_patient(facility_id).await;
    let token = app.token_for(owner, "owner", None);

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "subscription_required");
    assert_eq!(body["redirect"], "/subscription/plans");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn expired_subscription_does_not_open_the_gate() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let facility_id = app.seed_facility(owner).await;
    let patient_id = app.seed_patient(facility_id).await;
    let plan_id = app.seed_plan(30, false).await;
    // Still marked active but past its window: the sweep has not caught up.
    app.seed_subscription(owner, plan_id, "active", Utc::now() - Duration::seconds(5))
        .await;
    let token = app.token_for(owner, "owner", None);

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "subscription_required");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn gated_responses_carry_the_remaining_advisory_header() {
    let app = TestApp::spawn().await;
    let (token, _facility_id, patient_id) = app.seed_subscribed_owner().await;

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;

    assert_eq!(response.status(), 200);
    let remaining = response
        .headers()
        .get("x-subscription-remaining")
        .expect("advisory header missing")
        .to_str()
        .unwrap();
    // 30 days left: reported in whole days.
    assert!(remaining.ends_with('d'), "got {}", remaining);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn short_trial_remaining_is_reported_in_seconds() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let facility_id = app.seed_facility(owner).await;
    let patient_id = app.seed_patient(facility_id).await;
    let plan_id = app.seed_plan(1, true).await;
    app.seed_subscription(owner, plan_id, "active", Utc::now() + Duration::minutes(30))
        .await;
    let token = app.token_for(owner, "owner", None);

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;

    assert_eq!(response.status(), 200);
    let remaining = response
        .headers()
        .get("x-subscription-remaining")
        .expect("advisory header missing")
        .to_str()
        .unwrap();
    assert!(remaining.ends_with('s'), "got {}", remaining);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn admin_bypasses_the_gate() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let facility_id = app.seed_facility(owner).await;
    let patient_id = app.seed_patient(facility_id).await;
    let admin = app.seed_user("admin").await;
    let token = app.token_for(admin, "admin", None);

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn staff_inherit_the_owners_gate_decision() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let facility_id = app.seed_facility(owner).await;
    let patient_id = app.seed_patient(facility_id).await;
    let staff = app.seed_user("staff").await;
    let token = app.token_for(staff, "staff", Some(facility_id));

    // Owner unsubscribed: staff are denied too.
    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;
    assert_eq!(response.status(), 403);

    let plan_id = app.seed_plan(30, false).await;
    app.seed_subscription(owner, plan_id, "active", Utc::now() + Duration::days(30))
        .await;

    let response = app
        .get(&format!("/api/patients/{}/statement", patient_id), &token)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn activation_supersedes_the_previous_subscription() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let plan_id = app.seed_plan(30, false).await;
    app.seed_subscription(owner, plan_id, "active", Utc::now() + Duration::days(10))
        .await;
    let token = app.token_for(owner, "owner", None);

    let response = app
        .post_json(
            "/api/subscriptions/activate",
            &token,
            &json!({ "plan_id": plan_id }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE owner_id = $1 AND status = 'active'",
    )
    .bind(owner)
    .fetch_one(app.db.pool())
    .await
    .unwrap();
    assert_eq!(active, 1);

    let expired: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE owner_id = $1 AND status = 'expired'",
    )
    .bind(owner)
    .fetch_one(app.db.pool())
    .await
    .unwrap();
    assert_eq!(expired, 1);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn status_endpoint_reports_lapsed_subscriptions_with_redirect() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let plan_id = app.seed_plan(30, false).await;
    app.seed_subscription(owner, plan_id, "active", Utc::now() - Duration::minutes(1))
        .await;
    let token = app.token_for(owner, "owner", None);

    let response = app.get("/api/subscriptions/status", &token).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["active"], false);
    assert_eq!(body["status"], "expired");
    assert_eq!(body["redirect"], "/subscription/plans");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn sweep_expires_lapsed_rows_and_is_idempotent() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let plan_id = app.seed_plan(30, false).await;
    app.seed_subscription(owner, plan_id, "active", Utc::now() - Duration::seconds(1))
        .await;
    let fresh_owner = app.seed_user("owner").await;
    app.seed_subscription(
        fresh_owner,
        plan_id,
        "active",
        Utc::now() + Duration::days(5),
    )
    .await;

    let gate = SubscriptionGate::new(app.db.clone());

    let swept = gate.sweep_expired(Utc::now()).await.unwrap();
    assert_eq!(swept, 1);

    // Rerun: nothing left to sweep, the fresh subscription is untouched.
    let swept = gate.sweep_expired(Utc::now()).await.unwrap();
    assert_eq!(swept, 0);

    assert!(gate
        .is_active(fresh_owner, Utc::now())
        .await
        .unwrap()
        .is_some());
    assert!(gate.is_active(owner, Utc::now()).await.unwrap().is_none());
}
