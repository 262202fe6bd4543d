//! Subscription gate for facility-scoped routes.
//!
//! Runs after [`auth_middleware`](crate::middleware::auth::auth_middleware).
//! Owners are gated on their own subscription; staff on their facility
//! owner's; admins pass through. Denials carry the `subscription_required`
//! code and a redirect hint so clients can send the caller to the plans
//! page, and every allowed response gets an advisory header with the time
//! left on the subscription.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use birthcare_core::error::AppError;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::AuthContext;
use crate::models::Role;
use crate::services::metrics::GATE_DENIALS_TOTAL;
use crate::startup::AppState;

/// Where denied callers should be sent to fix their subscription state.
pub const PLANS_REDIRECT: &str = "/subscription/plans";

/// Advisory header carried by successful gated responses.
pub const REMAINING_HEADER: &str = "x-subscription-remaining";

pub async fn subscription_gate_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Auth context missing from request extensions"
            ))
        })?;

    if context.role.bypasses_subscription_gate() {
        return Ok(next.run(req).await);
    }

    let owner_id = if context.role == Role::Owner {
        context.user_id
    } else {
        staff_facility_owner(&state, &context).await?
    };

    let now = Utc::now();
    let subscription = state.gate.is_active(owner_id, now).await?;

    let subscription = match subscription {
        Some(subscription) => subscription,
        None => {
            GATE_DENIALS_TOTAL.inc();
            info!(owner_id = %owner_id, "Subscription gate denied request");
            return Err(AppError::SubscriptionRequired {
                redirect: PLANS_REDIRECT,
            });
        }
    };

    let remaining = subscription.remaining_label(now);
    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&remaining) {
        response.headers_mut().insert(REMAINING_HEADER, value);
    }

    Ok(response)
}

/// Staff inherit the gate decision of the facility owner.
async fn staff_facility_owner(state: &AppState, context: &AuthContext) -> Result<Uuid, AppError> {
    let facility_id = context.facility_id.ok_or_else(|| {
        AppError::Forbidden(anyhow::anyhow!(
            "Staff account is not associated with a facility"
        ))
    })?;

    let facility = state
        .db
        .get_facility(facility_id)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Facility {} not found", facility_id)))?;

    Ok(facility.owner_id)
}
