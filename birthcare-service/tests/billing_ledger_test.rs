//! Billing ledger integration tests: charge appending, the payment status
//! ladder and balance enforcement.

mod common;

use common::{json_money, money, TestApp};
use serde_json::json;

fn one_charge(description: &str, quantity: i64, unit_price: &str) -> serde_json::Value {
    json!({
        "description": description,
        "quantity": quantity,
        "unit_price": unit_price,
    })
}

async fn open_bill_with_total(
    app: &TestApp,
    token: &str,
    facility_id: uuid::Uuid,
    patient_id: uuid::Uuid,
    total: &str,
) -> uuid::Uuid {
    let response = app
        .post_json(
            "/api/bills/charges",
            token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [one_charge("Delivery package", 1, total)],
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    body["bill"]["bill_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("bill_id missing")
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn first_charge_opens_a_draft_bill_with_consistent_totals() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;

    let response = app
        .post_json(
            "/api/bills/charges",
            &token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [
                    one_charge("Delivery package", 1, "800.00"),
                    one_charge("Newborn screening", 2, "100.00"),
                ],
            }),
        )
        .await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "draft");
    assert_eq!(json_money(&body["bill"]["subtotal"]), money("1000.00"));
    assert_eq!(json_money(&body["bill"]["total"]), money("1000.00"));
    assert_eq!(json_money(&body["bill"]["paid"]), money("0"));
    assert_eq!(json_money(&body["bill"]["balance"]), money("1000.00"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn further_charges_append_to_the_open_bill() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;

    let first = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let response = app
        .post_json(
            "/api/bills/charges",
            &token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [one_charge("Medication", 1, "250.00")],
            }),
        )
        .await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["bill"]["bill_id"].as_str().unwrap(), first.to_string());
    assert_eq!(json_money(&body["bill"]["total"]), money("750.00"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn non_positive_quantity_is_rejected() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;

    let response = app
        .post_json(
            "/api/bills/charges",
            &token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [one_charge("Nothing", 0, "100.00")],
            }),
        )
        .await;

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn negative_unit_price_is_rejected() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;

    let response = app
        .post_json(
            "/api/bills/charges",
            &token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [one_charge("Refund in disguise", 1, "-5.00")],
            }),
        )
        .await;

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn payment_ladder_walks_partially_paid_then_paid_then_rejects() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "1000.00").await;

    let issue = app
        .post_json(&format!("/api/bills/{}/issue", bill_id), &token, &json!({}))
        .await;
    assert_eq!(issue.status(), 200);

    // 400 of 1000: partially paid, 600 outstanding.
    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "400.00", "method": "cash" }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "partially_paid");
    assert_eq!(json_money(&body["bill"]["balance"]), money("600.00"));

    // The remaining 600: settled.
    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "600.00", "method": "gcash" }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "paid");
    assert_eq!(json_money(&body["bill"]["balance"]), money("0.00"));

    // Any further positive amount exceeds the zero balance.
    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "0.01", "method": "cash" }),
        )
        .await;
    assert_eq!(response.status(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"].as_str().unwrap().contains("PHP 0.00"),
        "message should carry the outstanding balance: {}",
        body["error"]
    );
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn overpayment_is_rejected_and_leaves_the_bill_untouched() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "500.01", "method": "card" }),
        )
        .await;

    assert_eq!(response.status(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("PHP 500.00"));

    let bill = app.get(&format!("/api/bills/{}", bill_id), &token).await;
    let body: serde_json::Value = bill.json().await.unwrap();
    assert_eq!(json_money(&body["bill"]["balance"]), money("500.00"));
    assert_eq!(json_money(&body["bill"]["paid"]), money("0.00"));
    assert!(body["payments"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn zero_amount_payment_is_rejected() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "0", "method": "cash" }),
        )
        .await;

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn charges_after_settlement_open_a_fresh_bill() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;

    let first = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;
    let response = app
        .post_json(
            &format!("/api/bills/{}/payments", first),
            &token,
            &json!({ "amount": "500.00", "method": "cash" }),
        )
        .await;
    assert_eq!(response.status(), 201);

    // New charge of 1000: a second, separate draft bill.
    let response = app
        .post_json(
            "/api/bills/charges",
            &token,
            &json!({
                "patient_id": patient_id,
                "facility_id": facility_id,
                "charges": [one_charge("Postnatal checkup", 1, "1000.00")],
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let second: uuid::Uuid = body["bill"]["bill_id"].as_str().unwrap().parse().unwrap();
    assert_ne!(second, first);
    assert_eq!(body["bill"]["status"], "draft");
    assert_eq!(json_money(&body["bill"]["total"]), money("1000.00"));

    // The settled bill is untouched.
    let bill = app.get(&format!("/api/bills/{}", first), &token).await;
    let body: serde_json::Value = bill.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "paid");
    assert_eq!(json_money(&body["bill"]["total"]), money("500.00"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn issuing_a_non_draft_bill_conflicts() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let first = app
        .post_json(&format!("/api/bills/{}/issue", bill_id), &token, &json!({}))
        .await;
    assert_eq!(first.status(), 200);

    let second = app
        .post_json(&format!("/api/bills/{}/issue", bill_id), &token, &json!({}))
        .await;
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn cancelled_bill_accepts_no_payments_and_no_second_cancel() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let cancel = app
        .post_json(&format!("/api/bills/{}/cancel", bill_id), &token, &json!({}))
        .await;
    assert_eq!(cancel.status(), 200);

    let payment = app
        .post_json(
            &format!("/api/bills/{}/payments", bill_id),
            &token,
            &json!({ "amount": "100.00", "method": "cash" }),
        )
        .await;
    assert_eq!(payment.status(), 409);

    let again = app
        .post_json(&format!("/api/bills/{}/cancel", bill_id), &token, &json!({}))
        .await;
    assert_eq!(again.status(), 409);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn simultaneous_full_payments_settle_the_bill_exactly_once() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    // Two cashiers both see the 500.00 balance and submit the full amount.
    // The row lock serializes them: the loser re-reads a zero balance.
    let path = format!("/api/bills/{}/payments", bill_id);
    let payment = json!({ "amount": "500.00", "method": "cash" });
    let (first, second) = tokio::join!(
        app.post_json(&path, &token, &payment),
        app.post_json(&path, &token, &payment),
    );

    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 422]);

    let bill = app.get(&format!("/api/bills/{}", bill_id), &token).await;
    let body: serde_json::Value = bill.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "paid");
    assert_eq!(json_money(&body["bill"]["paid"]), money("500.00"));
    assert_eq!(json_money(&body["bill"]["balance"]), money("0.00"));
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn issuing_finalizes_tax_and_an_explicit_zero_discount() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let response = app
        .post_json(
            &format!("/api/bills/{}/issue", bill_id),
            &token,
            &json!({ "tax": "50.00", "discount": "0.00" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json_money(&body["bill"]["tax"]), money("50.00"));
    assert_eq!(json_money(&body["bill"]["discount"]), money("0.00"));
    assert_eq!(json_money(&body["bill"]["total"]), money("550.00"));
    assert_eq!(json_money(&body["bill"]["balance"]), money("550.00"));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn issued_bill_past_due_reads_overdue_but_stored_status_stays() {
    let app = TestApp::spawn().await;
    let (token, facility_id, patient_id) = app.seed_subscribed_owner().await;
    let bill_id = open_bill_with_total(&app, &token, facility_id, patient_id, "500.00").await;

    let issue = app
        .post_json(
            &format!("/api/bills/{}/issue", bill_id),
            &token,
            &json!({ "due_date": "2020-01-01" }),
        )
        .await;
    assert_eq!(issue.status(), 200);

    let bill = app.get(&format!("/api/bills/{}", bill_id), &token).await;
    let body: serde_json::Value = bill.json().await.unwrap();
    assert_eq!(body["bill"]["status"], "sent");
    assert_eq!(body["effective_status"], "overdue");
}
