//! Patient model. Deliberately thin: bills and admissions reference
//! patients, but patient administration itself lives elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub patient_id: Uuid,
    pub facility_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_utc: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
