//! Owner-facing application endpoints: registration, document replacement
//! and resubmission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::{engine::general_purpose, Engine as _};
use birthcare_core::error::AppError;
use uuid::Uuid;

use crate::dtos::applications::{
    ApplicationResponse, DocumentUploadRequest, RegisterApplicationRequest,
    UpdateDocumentsRequest,
};
use crate::middleware::AuthContext;
use crate::models::{
    ApplicationDocument, DocumentKind, DocumentUpload, FacilityApplication, RegisterApplication,
    Role,
};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Register a facility application, or merge into the caller's rejected one.
pub async fn register(
    State(state): State<AppState>,
    context: AuthContext,
    ValidatedJson(payload): ValidatedJson<RegisterApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    if context.role != Role::Owner {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only facility owners register applications"
        )));
    }

    let documents = decode_documents(payload.documents)?;

    let application = state
        .review
        .register(RegisterApplication {
            owner_id: context.user_id,
            facility_name: payload.facility_name,
            address: Some(payload.address),
            currency: payload.currency.unwrap_or_else(|| "PHP".to_string()),
            documents,
        })
        .await?;

    let documents = state.db.get_documents(application.application_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            application,
            documents,
        }),
    ))
}

/// The caller's own application, with its document bundle.
pub async fn get_my_application(
    State(state): State<AppState>,
    context: AuthContext,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = state
        .db
        .get_application_by_owner(context.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("No application found for this account"))
        })?;

    let documents = state.db.get_documents(application.application_id).await?;

    Ok(Json(ApplicationResponse {
        application,
        documents,
    }))
}

/// Replace documents on a rejected application.
pub async fn update_documents(
    State(state): State<AppState>,
    context: AuthContext,
    Path(application_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDocumentsRequest>,
) -> Result<Json<Vec<ApplicationDocument>>, AppError> {
    load_own_application(&state, &context, application_id).await?;

    let documents = decode_documents(payload.documents)?;
    let documents = state
        .review
        .update_documents(application_id, documents)
        .await?;

    Ok(Json(documents))
}

/// Resubmit a rejected application for review.
pub async fn resubmit(
    State(state): State<AppState>,
    context: AuthContext,
    Path(application_id): Path<Uuid>,
) -> Result<Json<FacilityApplication>, AppError> {
    load_own_application(&state, &context, application_id).await?;

    let application = state.review.resubmit(application_id).await?;

    Ok(Json(application))
}

/// Load an application the caller owns; anything else reads as not found.
async fn load_own_application(
    state: &AppState,
    context: &AuthContext,
    application_id: Uuid,
) -> Result<FacilityApplication, AppError> {
    let application = state
        .db
        .get_application(application_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Application {} not found", application_id))
        })?;

    if application.owner_id != context.user_id {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Application {} not found",
            application_id
        )));
    }

    Ok(application)
}

/// Parse kinds and decode base64 bodies into storable uploads.
fn decode_documents(
    requests: Vec<DocumentUploadRequest>,
) -> Result<Vec<DocumentUpload>, AppError> {
    let mut documents = Vec::with_capacity(requests.len());
    for request in requests {
        let kind = DocumentKind::parse(&request.kind).ok_or_else(|| {
            AppError::Validation(anyhow::anyhow!("Unknown document kind: {}", request.kind))
        })?;

        let data = general_purpose::STANDARD.decode(&request.data).map_err(|e| {
            AppError::Validation(anyhow::anyhow!(
                "Document {} is not valid base64: {}",
                request.kind,
                e
            ))
        })?;

        documents.push(DocumentUpload {
            kind,
            content_type: request.content_type,
            data,
        });
    }
    Ok(documents)
}
