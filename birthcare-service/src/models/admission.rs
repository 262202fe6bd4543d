//! Admission model: a patient occupying a room, feeding the daily
//! room-charge accrual.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Admission record. Open while `discharged_utc` is null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admission {
    pub admission_id: Uuid,
    pub patient_id: Uuid,
    pub facility_id: Uuid,
    pub room_name: String,
    pub daily_rate: Decimal,
    pub admitted_utc: DateTime<Utc>,
    pub discharged_utc: Option<DateTime<Utc>>,
}

/// Input for admitting a patient.
#[derive(Debug, Clone)]
pub struct CreateAdmission {
    pub patient_id: Uuid,
    pub facility_id: Uuid,
    pub room_name: String,
    pub daily_rate: Decimal,
}
