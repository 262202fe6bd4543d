//! Statement of account: the data contract handed to the PDF renderer.
//! Rendering itself is an external collaborator; this module only shapes the
//! figures.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{LineItem, Payment};

/// Itemized view of the patient's single open bill plus settled history.
#[derive(Debug, Clone, Serialize)]
pub struct StatementOfAccount {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub facility_id: Uuid,
    pub facility_name: String,
    pub generated_utc: DateTime<Utc>,
    /// The open bill, itemized. Absent when the patient owes nothing.
    pub active_bill: Option<StatementBill>,
    pub current_charges: Decimal,
    pub current_paid: Decimal,
    pub current_balance: Decimal,
    /// Display label for the open bill's effective status, `"Paid"` when
    /// there is no open bill.
    pub status: String,
    pub history: StatementHistory,
}

/// The open bill's detail block.
#[derive(Debug, Clone, Serialize)]
pub struct StatementBill {
    pub bill_id: Uuid,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub line_items: Vec<LineItem>,
    pub payments: Vec<Payment>,
}

/// Aggregates over the patient's closed bills.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatementHistory {
    pub paid_bills: i64,
    pub cancelled_bills: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
}
