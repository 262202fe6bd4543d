//! Application review workflow tests: registration, rejection with reason,
//! document replacement, resubmission and the rejected-merge rule.

mod common;

use common::TestApp;
use serde_json::json;

// "business permit body" / "updated body", base64-encoded.
const DOC_BODY: &str = "YnVzaW5lc3MgcGVybWl0IGJvZHk=";
const DOC_BODY_V2: &str = "dXBkYXRlZCBib2R5";

fn registration_payload(name: &str) -> serde_json::Value {
    json!({
        "facility_name": name,
        "address": "123 Mabini St, Santa Rosa",
        "documents": [
            { "kind": "business_permit", "content_type": "application/pdf", "data": DOC_BODY },
            { "kind": "doh_license", "content_type": "application/pdf", "data": DOC_BODY },
        ],
    })
}

async fn register(app: &TestApp, token: &str, name: &str) -> serde_json::Value {
    let response = app
        .post_json("/api/applications", token, &registration_payload(name))
        .await;
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn registration_creates_a_pending_application_with_documents() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let token = app.token_for(owner, "owner", None);

    let body = register(&app, &token, "Santa Rosa Birthing Home").await;

    assert_eq!(body["application"]["status"], "pending");
    assert!(body["application"]["rejection_reason"].is_null());
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn second_registration_while_pending_conflicts() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let token = app.token_for(owner, "owner", None);

    register(&app, &token, "First Attempt").await;

    let response = app
        .post_json("/api/applications", &token, &registration_payload("Second"))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn reject_requires_a_substantive_reason() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let admin = app.seed_user("admin").await;
    let admin_token = app.token_for(admin, "admin", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap();

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "" }),
        )
        .await;
    assert_eq!(response.status(), 422);

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "too short" }),
        )
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn reject_stores_reason_and_resubmit_clears_it() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let admin = app.seed_user("admin").await;
    let admin_token = app.token_for(admin, "admin", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "Missing sanitary permit" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "Missing sanitary permit");

    let response = app
        .post_json(
            &format!("/api/applications/{}/resubmit", application_id),
            &owner_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "pending");
    assert!(body["rejection_reason"].is_null());
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn review_actions_guard_their_source_state() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let admin = app.seed_user("admin").await;
    let admin_token = app.token_for(admin, "admin", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();

    // Resubmitting a pending application is a conflict.
    let response = app
        .post_json(
            &format!("/api/applications/{}/resubmit", application_id),
            &owner_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Approve, then approve again: the second is a conflict.
    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/approve", application_id),
            &admin_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/approve", application_id),
            &admin_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Rejecting an approved application is also a conflict.
    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "Changed our minds entirely" }),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn documents_can_only_be_replaced_while_rejected() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let admin = app.seed_user("admin").await;
    let admin_token = app.token_for(admin, "admin", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();
    let original_path = body["documents"][0]["storage_path"].as_str().unwrap().to_string();

    let replacement = json!({
        "documents": [
            { "kind": "business_permit", "content_type": "application/pdf", "data": DOC_BODY_V2 },
        ],
    });

    // Pending: refused.
    let response = app
        .put_json(
            &format!("/api/applications/{}/documents", application_id),
            &owner_token,
            &replacement,
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "Business permit is expired" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    // Rejected: replacement lands, status stays rejected.
    let response = app
        .put_json(
            &format!("/api/applications/{}/documents", application_id),
            &owner_token,
            &replacement,
        )
        .await;
    assert_eq!(response.status(), 200);
    let documents: serde_json::Value = response.json().await.unwrap();
    let permit = documents
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["kind"] == "business_permit")
        .unwrap();
    assert_ne!(permit["storage_path"].as_str().unwrap(), original_path);

    let response = app.get("/api/applications/me", &owner_token).await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["application"]["status"], "rejected");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn reregistering_while_rejected_merges_into_the_same_record() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let admin = app.seed_user("admin").await;
    let admin_token = app.token_for(admin, "admin", None);

    let body = register(&app, &owner_token, "First Name").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/reject", application_id),
            &admin_token,
            &json!({ "reason": "Missing mayor's permit" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    // A fresh registration call reuses the rejected record.
    let response = app
        .post_json(
            "/api/applications",
            &owner_token,
            &registration_payload("Renamed Birthing Home"),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["application"]["application_id"].as_str().unwrap(),
        application_id
    );
    assert_eq!(body["application"]["status"], "pending");
    assert!(body["application"]["rejection_reason"].is_null());
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn owners_cannot_touch_another_owners_application() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);
    let other = app.seed_user("owner").await;
    let other_token = app.token_for(other, "owner", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();

    let response = app
        .post_json(
            &format!("/api/applications/{}/resubmit", application_id),
            &other_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn review_endpoints_require_the_admin_role() {
    let app = TestApp::spawn().await;
    let owner = app.seed_user("owner").await;
    let owner_token = app.token_for(owner, "owner", None);

    let body = register(&app, &owner_token, "Santa Rosa Birthing Home").await;
    let application_id = body["application"]["application_id"].as_str().unwrap().to_string();

    let response = app
        .post_json(
            &format!("/api/admin/applications/{}/approve", application_id),
            &owner_token,
            &json!({}),
        )
        .await;
    assert_eq!(response.status(), 403);
}
