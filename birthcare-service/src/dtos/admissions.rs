use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdmissionRequest {
    pub patient_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Room name is required"))]
    pub room_name: String,

    /// Charged once per day by the accrual job. Zero disables accrual.
    pub daily_rate: Decimal,
}
