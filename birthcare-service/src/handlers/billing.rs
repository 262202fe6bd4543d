//! Billing ledger endpoints: charges, issuance, cancellation, payments and
//! the statement of account.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use birthcare_core::error::AppError;
use chrono::Utc;
use uuid::Uuid;

use crate::dtos::billing::{
    AddChargesRequest, BillDetailResponse, BillResponse, IssueBillRequest,
    PaymentRecordedResponse, RecordPaymentRequest,
};
use crate::handlers::{load_bill_scoped, load_patient_scoped, resolve_facility_scope};
use crate::middleware::AuthContext;
use crate::models::{PaymentMethod, RecordPayment, StatementOfAccount};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Append charges to the patient's open bill, opening a draft when none is.
pub async fn add_charges(
    State(state): State<AppState>,
    context: AuthContext,
    ValidatedJson(payload): ValidatedJson<AddChargesRequest>,
) -> Result<(StatusCode, Json<BillResponse>), AppError> {
    let facility_id = resolve_facility_scope(&state, &context, payload.facility_id).await?;

    let drafts = payload.charges.into_iter().map(Into::into).collect();
    let bill = state
        .ledger
        .add_charges(payload.patient_id, facility_id, drafts)
        .await?;

    Ok((StatusCode::CREATED, Json(BillResponse::from_bill(bill))))
}

/// Issue a draft bill, optionally finalizing due date, tax and discount.
pub async fn issue_bill(
    State(state): State<AppState>,
    context: AuthContext,
    Path(bill_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<IssueBillRequest>,
) -> Result<Json<BillResponse>, AppError> {
    load_bill_scoped(&state, &context, bill_id).await?;

    let bill = state
        .ledger
        .issue_bill(bill_id, payload.due_date, payload.tax, payload.discount)
        .await?;

    Ok(Json(BillResponse::from_bill(bill)))
}

/// Cancel a bill that has not been settled.
pub async fn cancel_bill(
    State(state): State<AppState>,
    context: AuthContext,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<BillResponse>, AppError> {
    load_bill_scoped(&state, &context, bill_id).await?;

    let bill = state.ledger.cancel_bill(bill_id).await?;

    Ok(Json(BillResponse::from_bill(bill)))
}

/// Record a payment against a bill.
pub async fn record_payment(
    State(state): State<AppState>,
    context: AuthContext,
    Path(bill_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentRecordedResponse>), AppError> {
    load_bill_scoped(&state, &context, bill_id).await?;

    let method = PaymentMethod::parse(&payload.method).ok_or_else(|| {
        AppError::Validation(anyhow::anyhow!("Unknown payment method: {}", payload.method))
    })?;

    let (bill, payment) = state
        .ledger
        .record_payment(RecordPayment {
            bill_id,
            amount: payload.amount,
            method,
            reference: payload.reference,
            received_by: context.user_id,
            payment_date: payload.payment_date,
        })
        .await?;

    let effective_status = bill
        .effective_status(Utc::now().date_naive())
        .as_str()
        .to_string();

    Ok((
        StatusCode::CREATED,
        Json(PaymentRecordedResponse {
            bill,
            effective_status,
            payment,
        }),
    ))
}

/// Fetch a bill with its line items and payments.
pub async fn get_bill(
    State(state): State<AppState>,
    context: AuthContext,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<BillDetailResponse>, AppError> {
    let bill = load_bill_scoped(&state, &context, bill_id).await?;

    let line_items = state.db.get_line_items(bill_id).await?;
    let payments = state.db.get_payments(bill_id).await?;
    let effective_status = bill
        .effective_status(Utc::now().date_naive())
        .as_str()
        .to_string();

    Ok(Json(BillDetailResponse {
        bill,
        effective_status,
        line_items,
        payments,
    }))
}

/// Statement of account for a patient: the open bill itemized, closed bills
/// aggregated as history.
pub async fn patient_statement(
    State(state): State<AppState>,
    context: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<StatementOfAccount>, AppError> {
    load_patient_scoped(&state, &context, patient_id).await?;

    let statement = state.ledger.statement_of_account(patient_id).await?;

    Ok(Json(statement))
}
