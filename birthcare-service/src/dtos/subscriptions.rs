use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ActivateSubscriptionRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100, message = "Plan name is required"))]
    pub name: String,

    pub price: Decimal,

    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    pub duration_days: i32,

    #[serde(default)]
    pub trial: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Advisory remaining time, same format as the response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<String>,
    /// Where to send the caller when no subscription is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}
