//! HTTP handlers. Thin by design: extract the auth context, validate the
//! payload, call the domain service, shape the JSON.

pub mod admin;
pub mod admissions;
pub mod applications;
pub mod billing;
pub mod health;
pub mod subscriptions;

use birthcare_core::error::AppError;
use uuid::Uuid;

use crate::middleware::AuthContext;
use crate::models::{Admission, Bill, Patient, Role};
use crate::startup::AppState;

/// Whether the caller's tenancy covers the facility. Admins see everything;
/// owners their own facilities; staff the one on their token.
pub(crate) async fn facility_in_scope(
    state: &AppState,
    context: &AuthContext,
    facility_id: Uuid,
) -> Result<bool, AppError> {
    match context.role {
        Role::Admin => Ok(true),
        Role::Owner => {
            let facility = state.db.get_facility(facility_id).await?;
            Ok(facility.is_some_and(|f| f.owner_id == context.user_id))
        }
        Role::Staff => Ok(context.facility_id == Some(facility_id)),
    }
}

/// Resolve which facility an operation applies to. Staff are pinned to the
/// facility on their token; owners may omit the id when they hold exactly
/// one facility. Out-of-scope requests read as not found rather than
/// revealing what exists.
pub(crate) async fn resolve_facility_scope(
    state: &AppState,
    context: &AuthContext,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    match context.role {
        Role::Staff => {
            let own = context.facility_id.ok_or_else(|| {
                AppError::Forbidden(anyhow::anyhow!(
                    "Staff account is not associated with a facility"
                ))
            })?;
            if requested.is_some_and(|id| id != own) {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "Cannot operate on another facility"
                )));
            }
            Ok(own)
        }
        Role::Owner => match requested {
            Some(facility_id) => {
                if !facility_in_scope(state, context, facility_id).await? {
                    return Err(AppError::NotFound(anyhow::anyhow!(
                        "Facility {} not found",
                        facility_id
                    )));
                }
                Ok(facility_id)
            }
            None => {
                let facilities = state.db.get_facilities_by_owner(context.user_id).await?;
                if facilities.len() > 1 {
                    return Err(AppError::Validation(anyhow::anyhow!(
                        "facility_id is required when the owner holds more than one facility"
                    )));
                }
                facilities
                    .into_iter()
                    .next()
                    .map(|f| f.facility_id)
                    .ok_or_else(|| {
                        AppError::NotFound(anyhow::anyhow!("Owner has no registered facility"))
                    })
            }
        },
        Role::Admin => requested
            .ok_or_else(|| AppError::Validation(anyhow::anyhow!("facility_id is required"))),
    }
}

/// Load a bill the caller is allowed to see.
pub(crate) async fn load_bill_scoped(
    state: &AppState,
    context: &AuthContext,
    bill_id: Uuid,
) -> Result<Bill, AppError> {
    let bill = state
        .db
        .get_bill(bill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill {} not found", bill_id)))?;

    if !facility_in_scope(state, context, bill.facility_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Bill {} not found",
            bill_id
        )));
    }

    Ok(bill)
}

/// Load a patient the caller is allowed to see.
pub(crate) async fn load_patient_scoped(
    state: &AppState,
    context: &AuthContext,
    patient_id: Uuid,
) -> Result<Patient, AppError> {
    let patient = state
        .db
        .get_patient(patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient {} not found", patient_id)))?;

    if !facility_in_scope(state, context, patient.facility_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Patient {} not found",
            patient_id
        )));
    }

    Ok(patient)
}

/// Load an admission the caller is allowed to see.
pub(crate) async fn load_admission_scoped(
    state: &AppState,
    context: &AuthContext,
    admission_id: Uuid,
) -> Result<Admission, AppError> {
    let admission = state.db.get_admission(admission_id).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("Admission {} not found", admission_id))
    })?;

    if !facility_in_scope(state, context, admission.facility_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Admission {} not found",
            admission_id
        )));
    }

    Ok(admission)
}
