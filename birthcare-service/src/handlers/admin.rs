//! Platform-admin endpoints: application review, plan and user
//! administration. The admin middleware has already checked the role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use birthcare_core::error::AppError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dtos::applications::{ListApplicationsQuery, RejectApplicationRequest};
use crate::dtos::subscriptions::CreatePlanRequest;
use crate::dtos::users::UpdateRoleRequest;
use crate::middleware::AuthContext;
use crate::models::{
    ApplicationStatus, CreatePlan, FacilityApplication, Role, SubscriptionPlan, User,
};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Approve a pending application, creating the live facility.
pub async fn approve_application(
    State(state): State<AppState>,
    context: AuthContext,
    Path(application_id): Path<Uuid>,
) -> Result<Json<FacilityApplication>, AppError> {
    tracing::info!(
        application_id = %application_id,
        reviewer = %context.user_id,
        "Approving application"
    );

    let application = state.review.approve(application_id).await?;

    Ok(Json(application))
}

/// Reject a pending application with a reason the owner will see.
pub async fn reject_application(
    State(state): State<AppState>,
    context: AuthContext,
    Path(application_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RejectApplicationRequest>,
) -> Result<Json<FacilityApplication>, AppError> {
    tracing::info!(
        application_id = %application_id,
        reviewer = %context.user_id,
        "Rejecting application"
    );

    let application = state.review.reject(application_id, &payload.reason).await?;

    Ok(Json(application))
}

/// List applications, optionally filtered by status.
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<Vec<FacilityApplication>>, AppError> {
    let filter = match query.status.as_deref() {
        Some(raw) => Some(ApplicationStatus::parse(raw).ok_or_else(|| {
            AppError::Validation(anyhow::anyhow!("Unknown application status: {}", raw))
        })?),
        None => None,
    };

    let applications = state.db.list_applications(filter).await?;

    Ok(Json(applications))
}

/// Create a subscription plan.
pub async fn create_plan(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePlanRequest>,
) -> Result<(StatusCode, Json<SubscriptionPlan>), AppError> {
    if payload.price < Decimal::ZERO {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Plan price cannot be negative"
        )));
    }

    let plan = state
        .db
        .create_plan(&CreatePlan {
            name: payload.name,
            price: payload.price,
            duration_days: payload.duration_days,
            trial: payload.trial,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.db.list_users().await?;
    Ok(Json(users))
}

/// Change a user's role.
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<User>, AppError> {
    let role = Role::parse(&payload.role).ok_or_else(|| {
        AppError::Validation(anyhow::anyhow!("Unknown role: {}", payload.role))
    })?;

    let user = state.db.update_user_role(user_id, role.as_str()).await?;

    Ok(Json(user))
}
