//! Owner-facing subscription endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use birthcare_core::error::AppError;
use chrono::Utc;

use crate::dtos::subscriptions::{ActivateSubscriptionRequest, SubscriptionStatusResponse};
use crate::middleware::{AuthContext, PLANS_REDIRECT};
use crate::models::{Role, Subscription, SubscriptionPlan};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Activate a plan for the calling owner, superseding any active one.
pub async fn activate(
    State(state): State<AppState>,
    context: AuthContext,
    ValidatedJson(payload): ValidatedJson<ActivateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    require_owner(&context)?;

    let subscription = state
        .gate
        .activate_subscription(context.user_id, payload.plan_id)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Current subscription state for the calling owner. Never gated: an owner
/// whose subscription lapsed still needs to see why.
pub async fn status(
    State(state): State<AppState>,
    context: AuthContext,
) -> Result<Json<SubscriptionStatusResponse>, AppError> {
    require_owner(&context)?;

    let now = Utc::now();
    if let Some(subscription) = state.gate.is_active(context.user_id, now).await? {
        let remaining = subscription.remaining_label(now);
        return Ok(Json(SubscriptionStatusResponse {
            active: true,
            subscription_id: Some(subscription.subscription_id),
            plan_id: Some(subscription.plan_id),
            status: Some(subscription.status),
            ends_at: Some(subscription.ends_at),
            remaining: Some(remaining),
            redirect: None,
        }));
    }

    let latest = state.db.get_latest_subscription(context.user_id).await?;
    let response = match latest {
        Some(subscription) => {
            // A stored 'active' row past its end reads as expired even if
            // the sweep has not caught up yet.
            let status = if subscription.status == "active" && subscription.ends_at <= now {
                "expired".to_string()
            } else {
                subscription.status.clone()
            };
            SubscriptionStatusResponse {
                active: false,
                subscription_id: Some(subscription.subscription_id),
                plan_id: Some(subscription.plan_id),
                status: Some(status),
                ends_at: Some(subscription.ends_at),
                remaining: None,
                redirect: Some(PLANS_REDIRECT),
            }
        }
        None => SubscriptionStatusResponse {
            active: false,
            subscription_id: None,
            plan_id: None,
            status: None,
            ends_at: None,
            remaining: None,
            redirect: Some(PLANS_REDIRECT),
        },
    };

    Ok(Json(response))
}

/// Available plans; what the redirect target renders.
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubscriptionPlan>>, AppError> {
    let plans = state.db.list_plans().await?;
    Ok(Json(plans))
}

fn require_owner(context: &AuthContext) -> Result<(), AppError> {
    if context.role != Role::Owner {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only facility owners hold subscriptions"
        )));
    }
    Ok(())
}
