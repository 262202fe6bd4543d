use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Bill, ChargeDraft, LineItem, Payment};

#[derive(Debug, Deserialize, Validate)]
pub struct AddChargesRequest {
    pub patient_id: Uuid,

    /// Facility scope. Owners must name one of their facilities; staff may
    /// omit it, their own facility is assumed.
    pub facility_id: Option<Uuid>,

    #[validate(length(min = 1, message = "At least one charge is required"), nested)]
    pub charges: Vec<ChargeItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ChargeItemRequest {
    /// Catalog item supplying description and unit price when set.
    pub service_item_id: Option<Uuid>,

    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    pub unit_price: Option<Decimal>,
}

impl From<ChargeItemRequest> for ChargeDraft {
    fn from(req: ChargeItemRequest) -> Self {
        ChargeDraft {
            service_item_id: req.service_item_id,
            description: req.description,
            quantity: req.quantity,
            unit_price: req.unit_price,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,

    /// One of `cash`, `card`, `bank_transfer`, `gcash`, `insurance`.
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub method: String,

    #[validate(length(max = 200, message = "Reference is too long"))]
    pub reference: Option<String>,

    /// Defaults to today when omitted.
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct IssueBillRequest {
    pub due_date: Option<NaiveDate>,
    pub tax: Option<Decimal>,
    pub discount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub bill: Bill,
    /// Read-time status; `overdue` when past due with a balance.
    pub effective_status: String,
}

impl BillResponse {
    pub fn from_bill(bill: Bill) -> Self {
        let effective_status = bill
            .effective_status(Utc::now().date_naive())
            .as_str()
            .to_string();
        Self {
            bill,
            effective_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillDetailResponse {
    pub bill: Bill,
    pub effective_status: String,
    pub line_items: Vec<LineItem>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize)]
pub struct PaymentRecordedResponse {
    pub bill: Bill,
    pub effective_status: String,
    pub payment: Payment,
}
