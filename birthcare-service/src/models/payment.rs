//! Payment model. Payments are append-only: there is no update or delete
//! path, and bill totals are derived by summing this table.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Gcash,
    Insurance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Gcash => "gcash",
            PaymentMethod::Insurance => "insurance",
        }
    }

    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or(PaymentMethod::Cash)
    }

    /// Strict parse for request ingress; unknown methods are rejected there
    /// rather than coerced.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "gcash" => Some(PaymentMethod::Gcash),
            "insurance" => Some(PaymentMethod::Insurance),
            _ => None,
        }
    }
}

/// Payment record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub reference: Option<String>,
    pub received_by: Uuid,
    pub payment_date: NaiveDate,
    pub created_utc: DateTime<Utc>,
}

/// Input for recording a payment against a bill.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub received_by: Uuid,
    pub payment_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_round_trip_through_strings() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::BankTransfer,
            PaymentMethod::Gcash,
            PaymentMethod::Insurance,
        ] {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn unknown_method_fails_strict_parse() {
        assert_eq!(PaymentMethod::parse("cheque"), None);
        assert_eq!(PaymentMethod::parse(""), None);
    }
}
