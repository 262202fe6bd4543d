//! Bill model: the running ledger document for one patient at one facility.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bill status.
///
/// `Overdue` is never written to the database; it is derived at read time by
/// [`Bill::effective_status`] so a bill settled after its due date needs no
/// corrective write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    Sent,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "draft",
            BillStatus::Sent => "sent",
            BillStatus::PartiallyPaid => "partially_paid",
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
            BillStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => BillStatus::Sent,
            "partially_paid" => BillStatus::PartiallyPaid,
            "paid" => BillStatus::Paid,
            "overdue" => BillStatus::Overdue,
            "cancelled" => BillStatus::Cancelled,
            _ => BillStatus::Draft,
        }
    }

    /// Terminal statuses are excluded from open-bill lookups and accept no
    /// further charges or payments.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BillStatus::Paid | BillStatus::Cancelled)
    }

    /// Human-readable label used on the statement of account.
    pub fn display(&self) -> &'static str {
        match self {
            BillStatus::Draft => "Draft",
            BillStatus::Sent => "Sent",
            BillStatus::PartiallyPaid => "Partially Paid",
            BillStatus::Paid => "Paid",
            BillStatus::Overdue => "Overdue",
            BillStatus::Cancelled => "Cancelled",
        }
    }
}

/// Bill document. Monetary fields are recomputed from line items and payments
/// inside every mutating transaction; nothing increments them in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub bill_id: Uuid,
    pub patient_id: Uuid,
    pub facility_id: Uuid,
    pub status: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    pub due_date: Option<NaiveDate>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Bill {
    /// Status as seen by callers: a sent or partially paid bill past its due
    /// date with money outstanding reads as overdue. The stored column is
    /// left untouched.
    pub fn effective_status(&self, today: NaiveDate) -> BillStatus {
        if matches!(self.status.as_str(), "sent" | "partially_paid") {
            if let Some(due_date) = self.due_date {
                if due_date < today && self.balance > Decimal::ZERO {
                    return BillStatus::Overdue;
                }
            }
        }
        BillStatus::from_string(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill_with(status: &str, due_date: Option<NaiveDate>, balance: Decimal) -> Bill {
        Bill {
            bill_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            status: status.to_string(),
            subtotal: balance,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: balance,
            paid: Decimal::ZERO,
            balance,
            due_date,
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sent_bill_past_due_with_balance_reads_overdue() {
        let bill = bill_with("sent", Some(day(2026, 1, 10)), Decimal::new(50000, 2));
        assert_eq!(bill.effective_status(day(2026, 1, 11)), BillStatus::Overdue);
    }

    #[test]
    fn partially_paid_bill_past_due_reads_overdue() {
        let bill = bill_with("partially_paid", Some(day(2026, 1, 10)), Decimal::new(100, 2));
        assert_eq!(bill.effective_status(day(2026, 2, 1)), BillStatus::Overdue);
    }

    #[test]
    fn bill_on_due_date_is_not_overdue() {
        let bill = bill_with("sent", Some(day(2026, 1, 10)), Decimal::new(50000, 2));
        assert_eq!(bill.effective_status(day(2026, 1, 10)), BillStatus::Sent);
    }

    #[test]
    fn settled_bill_past_due_is_not_overdue() {
        let bill = bill_with("paid", Some(day(2026, 1, 10)), Decimal::ZERO);
        assert_eq!(bill.effective_status(day(2026, 3, 1)), BillStatus::Paid);
    }

    #[test]
    fn zero_balance_past_due_is_not_overdue() {
        let bill = bill_with("sent", Some(day(2026, 1, 10)), Decimal::ZERO);
        assert_eq!(bill.effective_status(day(2026, 1, 11)), BillStatus::Sent);
    }

    #[test]
    fn draft_bill_never_reads_overdue() {
        let bill = bill_with("draft", Some(day(2026, 1, 10)), Decimal::new(100, 2));
        assert_eq!(bill.effective_status(day(2026, 2, 1)), BillStatus::Draft);
    }

    #[test]
    fn bill_without_due_date_is_never_overdue() {
        let bill = bill_with("sent", None, Decimal::new(100, 2));
        assert_eq!(bill.effective_status(day(2026, 2, 1)), BillStatus::Sent);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BillStatus::Draft,
            BillStatus::Sent,
            BillStatus::PartiallyPaid,
            BillStatus::Paid,
            BillStatus::Overdue,
            BillStatus::Cancelled,
        ] {
            assert_eq!(BillStatus::from_string(status.as_str()), status);
        }
    }

    #[test]
    fn display_labels_are_title_cased() {
        assert_eq!(BillStatus::Paid.display(), "Paid");
        assert_eq!(BillStatus::PartiallyPaid.display(), "Partially Paid");
        assert_eq!(BillStatus::Overdue.display(), "Overdue");
    }

    #[test]
    fn only_paid_and_cancelled_are_terminal() {
        assert!(BillStatus::Paid.is_terminal());
        assert!(BillStatus::Cancelled.is_terminal());
        assert!(!BillStatus::Draft.is_terminal());
        assert!(!BillStatus::Sent.is_terminal());
        assert!(!BillStatus::PartiallyPaid.is_terminal());
        assert!(!BillStatus::Overdue.is_terminal());
    }
}
