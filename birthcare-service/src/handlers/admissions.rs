//! Admission endpoints: the minimal surface the room-charge accrual needs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use birthcare_core::error::AppError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dtos::admissions::CreateAdmissionRequest;
use crate::handlers::{load_admission_scoped, load_patient_scoped};
use crate::middleware::AuthContext;
use crate::models::{Admission, CreateAdmission};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Admit a patient to a room.
pub async fn create_admission(
    State(state): State<AppState>,
    context: AuthContext,
    ValidatedJson(payload): ValidatedJson<CreateAdmissionRequest>,
) -> Result<(StatusCode, Json<Admission>), AppError> {
    if payload.daily_rate < Decimal::ZERO {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Daily rate cannot be negative"
        )));
    }

    let patient = load_patient_scoped(&state, &context, payload.patient_id).await?;

    let admission = state
        .db
        .create_admission(&CreateAdmission {
            patient_id: patient.patient_id,
            facility_id: patient.facility_id,
            room_name: payload.room_name,
            daily_rate: payload.daily_rate,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(admission)))
}

/// Discharge an admission; accrual stops after the discharge date.
pub async fn discharge_admission(
    State(state): State<AppState>,
    context: AuthContext,
    Path(admission_id): Path<Uuid>,
) -> Result<Json<Admission>, AppError> {
    load_admission_scoped(&state, &context, admission_id).await?;

    let admission = state.db.discharge_admission(admission_id).await?;

    Ok(Json(admission))
}
