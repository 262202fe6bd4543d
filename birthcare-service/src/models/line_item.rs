//! Line item model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single charge on a bill. `total_price` is always `quantity x unit_price`,
/// recomputed when the row is written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub line_item_id: Uuid,
    pub bill_id: Uuid,
    pub service_item_id: Option<Uuid>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub admission_id: Option<Uuid>,
    pub accrued_on: Option<NaiveDate>,
    pub created_utc: DateTime<Utc>,
}

/// A caller-submitted charge before catalog resolution. Description and
/// unit price may be omitted when the draft references a catalog item; the
/// ledger fills them from the catalog.
#[derive(Debug, Clone)]
pub struct ChargeDraft {
    pub service_item_id: Option<Uuid>,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

/// Input for appending one charge. `admission_id`/`accrued_on` are set only
/// by the room-charge accrual job; caller-submitted charges leave them unset.
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub service_item_id: Option<Uuid>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub admission_id: Option<Uuid>,
    pub accrued_on: Option<NaiveDate>,
}

impl NewCharge {
    /// A plain charge with no catalog or admission linkage.
    pub fn ad_hoc(description: impl Into<String>, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            service_item_id: None,
            description: description.into(),
            quantity,
            unit_price,
            admission_id: None,
            accrued_on: None,
        }
    }
}
