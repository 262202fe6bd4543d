//! Subscription gate: decides whether an owner's paid window is open.
//!
//! The predicate is read-only; expiry is handled by an explicit activation
//! transition plus a periodic sweep, never as a side effect of a read.

use crate::models::Subscription;
use crate::services::database::Database;
use crate::services::metrics::{DB_QUERY_DURATION, SUBSCRIPTIONS_EXPIRED_TOTAL};
use birthcare_core::error::AppError;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

/// Domain service for subscription state.
#[derive(Clone)]
pub struct SubscriptionGate {
    db: Database,
}

impl SubscriptionGate {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The owner's active subscription at `now`, if their paid window is
    /// open. Wall-clock comparison at second precision.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn is_active(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>, AppError> {
        self.db.get_active_subscription(owner_id, now).await
    }

    /// Activate a subscription on `plan_id` for the owner. Any currently
    /// active subscription is expired in the same transaction, keeping the
    /// single-active invariant an explicit transition rather than implicit
    /// overwrite.
    #[instrument(skip(self), fields(owner_id = %owner_id, plan_id = %plan_id))]
    pub async fn activate_subscription(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Subscription, AppError> {
        let plan = self
            .db
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plan {} not found", plan_id)))?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["activate_subscription"])
            .start_timer();

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let superseded = sqlx::query(
            "UPDATE subscriptions SET status = 'expired' WHERE owner_id = $1 AND status = 'active'",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to expire prior subscription: {}", e))
        })?
        .rows_affected();

        let now = Utc::now();
        let ends_at = now + Duration::days(i64::from(plan.duration_days));

        let result = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (subscription_id, owner_id, plan_id, status, starts_at, ends_at)
            VALUES ($1, $2, $3, 'active', $4, $5)
            RETURNING subscription_id, owner_id, plan_id, status, starts_at, ends_at, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(plan_id)
        .bind(now)
        .bind(ends_at)
        .fetch_one(&mut *tx)
        .await;

        let subscription = match result {
            Ok(subscription) => subscription,
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                // Concurrent activation won the single-active index.
                tx.rollback().await.ok();
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Another activation for this owner is in progress"
                )));
            }
            Err(e) => {
                return Err(AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to activate subscription: {}",
                    e
                )));
            }
        };

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            subscription_id = %subscription.subscription_id,
            owner_id = %owner_id,
            plan = %plan.name,
            ends_at = %subscription.ends_at,
            superseded = superseded,
            "Subscription activated"
        );

        Ok(subscription)
    }

    /// Flip active subscriptions whose window has closed to expired. Runs on
    /// a timer; idempotent, so overlapping runs are harmless.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["sweep_expired"])
            .start_timer();

        let swept = sqlx::query(
            "UPDATE subscriptions SET status = 'expired' WHERE status = 'active' AND ends_at <= $1",
        )
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to sweep subscriptions: {}", e))
        })?
        .rows_affected();

        timer.observe_duration();

        if swept > 0 {
            SUBSCRIPTIONS_EXPIRED_TOTAL.inc_by(swept);
            info!(swept = swept, "Expired subscriptions swept");
        }

        Ok(swept)
    }
}
