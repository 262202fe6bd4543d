//! Subscription model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "active" => SubscriptionStatus::Active,
            "expired" => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::Pending,
        }
    }
}

/// Subscription. `ends_at` is a full timestamp so short trial plans expire
/// with second precision rather than at day granularity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub subscription_id: Uuid,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
}

impl Subscription {
    /// Whole seconds of paid time left at `now`, clamped at zero.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at - now).num_seconds().max(0)
    }

    /// Advisory remaining-time label: seconds while under an hour remains,
    /// whole days otherwise. Anything between an hour and a day rounds up
    /// to `1d` rather than reporting zero days.
    pub fn remaining_label(&self, now: DateTime<Utc>) -> String {
        let secs = self.remaining_seconds(now);
        if secs < 3600 {
            format!("{}s", secs)
        } else {
            format!("{}d", (secs / 86_400).max(1))
        }
    }
}
