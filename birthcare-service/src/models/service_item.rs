//! Charge catalog model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chargeable service in a facility's catalog. Charges referencing an item
/// inherit its name and price when the caller omits them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceItem {
    pub service_item_id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}
