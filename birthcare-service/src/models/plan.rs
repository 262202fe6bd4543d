//! Subscription plan model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A purchasable subscription plan. `duration_days` drives `ends_at` when a
/// subscription on this plan is activated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    pub plan_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub trial: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a plan (admin surface).
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub trial: bool,
}
