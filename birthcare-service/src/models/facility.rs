//! Facility model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Birthing facility. `currency` is the ISO 4217 code used when formatting
/// amounts in caller-facing messages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Facility {
    pub facility_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub currency: String,
    pub created_utc: DateTime<Utc>,
}

/// Facility fields captured at registration.
#[derive(Debug, Clone)]
pub struct CreateFacility {
    pub owner_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub currency: String,
}
