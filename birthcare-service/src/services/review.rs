//! Facility application review workflow.
//!
//! One live application per owner. Registration while a previous attempt
//! sits rejected merges into the existing record (documents replaced, status
//! back to pending) instead of inserting a duplicate. Blob deletion is best
//! effort: a storage failure while replacing a document is logged and
//! swallowed, never surfaced to the caller.

use crate::models::{
    ApplicationDocument, ApplicationStatus, DocumentKind, DocumentUpload, FacilityApplication,
    RegisterApplication,
};
use crate::services::database::Database;
use crate::services::metrics::{APPLICATION_REVIEWS_TOTAL, DB_QUERY_DURATION};
use crate::services::storage::Storage;
use birthcare_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Minimum length of a rejection reason, so owners always learn what to fix.
const MIN_REJECTION_REASON_LEN: usize = 10;

/// What a registration call should do given the owner's existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegisterOutcome {
    CreateNew,
    Merge,
    AlreadyLive,
}

fn register_outcome(existing: Option<ApplicationStatus>) -> RegisterOutcome {
    match existing {
        None => RegisterOutcome::CreateNew,
        Some(ApplicationStatus::Rejected) => RegisterOutcome::Merge,
        Some(ApplicationStatus::Pending) | Some(ApplicationStatus::Approved) => {
            RegisterOutcome::AlreadyLive
        }
    }
}

fn validate_rejection_reason(reason: &str) -> Result<&str, AppError> {
    let trimmed = reason.trim();
    if trimmed.len() < MIN_REJECTION_REASON_LEN {
        return Err(AppError::Validation(anyhow::anyhow!(
            "Rejection reason must be at least {} characters",
            MIN_REJECTION_REASON_LEN
        )));
    }
    Ok(trimmed)
}

/// Uploads must not name the same document kind twice.
fn ensure_unique_kinds(documents: &[DocumentUpload]) -> Result<(), AppError> {
    let mut seen: Vec<DocumentKind> = Vec::with_capacity(documents.len());
    for upload in documents {
        if seen.contains(&upload.kind) {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Duplicate document kind {}",
                upload.kind.as_str()
            )));
        }
        seen.push(upload.kind);
    }
    Ok(())
}

/// Domain service for the application review workflow.
#[derive(Clone)]
pub struct ApplicationReview {
    db: Database,
    storage: Arc<dyn Storage>,
}

impl ApplicationReview {
    pub fn new(db: Database, storage: Arc<dyn Storage>) -> Self {
        Self { db, storage }
    }

    /// Register a facility application for the owner, or fold a
    /// re-registration into their rejected record.
    #[instrument(skip(self, input), fields(owner_id = %input.owner_id))]
    pub async fn register(
        &self,
        input: RegisterApplication,
    ) -> Result<FacilityApplication, AppError> {
        ensure_unique_kinds(&input.documents)?;

        let existing = self.db.get_application_by_owner(input.owner_id).await?;
        let status = existing
            .as_ref()
            .map(|app| ApplicationStatus::from_string(&app.status));

        match register_outcome(status) {
            RegisterOutcome::CreateNew => self.create_application(input).await,
            RegisterOutcome::Merge => {
                // Unwrap is safe: Merge only arises from an existing row.
                let application = existing.ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!("Merge without an application"))
                })?;
                self.merge_into_rejected(application, input).await
            }
            RegisterOutcome::AlreadyLive => Err(AppError::Conflict(anyhow::anyhow!(
                "An application already exists for this owner"
            ))),
        }
    }

    async fn create_application(
        &self,
        input: RegisterApplication,
    ) -> Result<FacilityApplication, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_application"])
            .start_timer();

        let facility_id = Uuid::new_v4();
        let application_id = Uuid::new_v4();

        // Blobs first: a failed transaction leaves orphans to clean up,
        // never an application pointing at missing documents.
        let mut stored = Vec::with_capacity(input.documents.len());
        for upload in &input.documents {
            let path = document_path(application_id, upload.kind);
            self.storage.upload(&path, upload.data.clone()).await?;
            stored.push((upload.kind, path, upload.content_type.clone()));
        }

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO facilities (facility_id, owner_id, name, address, currency)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(facility_id)
        .bind(input.owner_id)
        .bind(&input.facility_name)
        .bind(&input.address)
        .bind(&input.currency)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create facility: {}", e)))?;

        let application = sqlx::query_as::<_, FacilityApplication>(
            r#"
            INSERT INTO facility_applications (application_id, facility_id, owner_id)
            VALUES ($1, $2, $3)
            RETURNING application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            "#,
        )
        .bind(application_id)
        .bind(facility_id)
        .bind(input.owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create application: {}", e))
        })?;

        for (kind, path, content_type) in &stored {
            upsert_document(&mut tx, application_id, *kind, path, content_type).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            application_id = %application.application_id,
            facility_id = %facility_id,
            document_count = stored.len(),
            "Facility application submitted"
        );

        Ok(application)
    }

    /// Re-registration while rejected: replace the submitted documents,
    /// refresh the facility fields and put the same record back in review.
    async fn merge_into_rejected(
        &self,
        application: FacilityApplication,
        input: RegisterApplication,
    ) -> Result<FacilityApplication, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["merge_application"])
            .start_timer();

        let stored = self
            .replace_blobs(application.application_id, &input.documents)
            .await?;

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        for (kind, path, content_type) in &stored {
            upsert_document(&mut tx, application.application_id, *kind, path, content_type)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE facilities SET name = $2, address = $3, currency = $4
            WHERE facility_id = $1
            "#,
        )
        .bind(application.facility_id)
        .bind(&input.facility_name)
        .bind(&input.address)
        .bind(&input.currency)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update facility: {}", e)))?;

        let merged = sqlx::query_as::<_, FacilityApplication>(
            r#"
            UPDATE facility_applications
            SET status = 'pending', rejection_reason = NULL, reviewed_utc = NULL,
                submitted_utc = NOW()
            WHERE application_id = $1
            RETURNING application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            "#,
        )
        .bind(application.application_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to merge application: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            application_id = %merged.application_id,
            replaced_documents = stored.len(),
            "Rejected application re-registered"
        );

        Ok(merged)
    }

    /// Approve a pending application.
    #[instrument(skip(self), fields(application_id = %application_id))]
    pub async fn approve(&self, application_id: Uuid) -> Result<FacilityApplication, AppError> {
        let application = self.require_application(application_id).await?;
        if application.status != "pending" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Only pending applications can be approved; application is {}",
                application.status
            )));
        }

        let approved = sqlx::query_as::<_, FacilityApplication>(
            r#"
            UPDATE facility_applications
            SET status = 'approved', reviewed_utc = NOW()
            WHERE application_id = $1 AND status = 'pending'
            RETURNING application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            "#,
        )
        .bind(application_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to approve application: {}", e))
        })?
        .ok_or_else(|| {
            AppError::Conflict(anyhow::anyhow!("Application was reviewed concurrently"))
        })?;

        APPLICATION_REVIEWS_TOTAL
            .with_label_values(&["approved"])
            .inc();

        info!(application_id = %approved.application_id, "Application approved");

        Ok(approved)
    }

    /// Reject a pending application with a substantive reason.
    #[instrument(skip(self, reason), fields(application_id = %application_id))]
    pub async fn reject(
        &self,
        application_id: Uuid,
        reason: &str,
    ) -> Result<FacilityApplication, AppError> {
        let reason = validate_rejection_reason(reason)?;

        let application = self.require_application(application_id).await?;
        if application.status != "pending" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Only pending applications can be rejected; application is {}",
                application.status
            )));
        }

        let rejected = sqlx::query_as::<_, FacilityApplication>(
            r#"
            UPDATE facility_applications
            SET status = 'rejected', rejection_reason = $2, reviewed_utc = NOW()
            WHERE application_id = $1 AND status = 'pending'
            RETURNING application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            "#,
        )
        .bind(application_id)
        .bind(reason)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to reject application: {}", e))
        })?
        .ok_or_else(|| {
            AppError::Conflict(anyhow::anyhow!("Application was reviewed concurrently"))
        })?;

        APPLICATION_REVIEWS_TOTAL
            .with_label_values(&["rejected"])
            .inc();

        info!(application_id = %rejected.application_id, "Application rejected");

        Ok(rejected)
    }

    /// Replace documents on a rejected application without resubmitting.
    #[instrument(skip(self, documents), fields(application_id = %application_id, count = documents.len()))]
    pub async fn update_documents(
        &self,
        application_id: Uuid,
        documents: Vec<DocumentUpload>,
    ) -> Result<Vec<ApplicationDocument>, AppError> {
        ensure_unique_kinds(&documents)?;
        if documents.is_empty() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "At least one document is required"
            )));
        }

        let application = self.require_application(application_id).await?;
        if application.status != "rejected" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Documents can only be replaced while an application is rejected"
            )));
        }

        let stored = self.replace_blobs(application_id, &documents).await?;

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;
        for (kind, path, content_type) in &stored {
            upsert_document(&mut tx, application_id, *kind, path, content_type).await?;
        }
        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(
            application_id = %application_id,
            replaced = stored.len(),
            "Application documents replaced"
        );

        self.db.get_documents(application_id).await
    }

    /// Put a rejected application back into review.
    #[instrument(skip(self), fields(application_id = %application_id))]
    pub async fn resubmit(&self, application_id: Uuid) -> Result<FacilityApplication, AppError> {
        let application = self.require_application(application_id).await?;
        if application.status != "rejected" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Only rejected applications can be resubmitted; application is {}",
                application.status
            )));
        }

        let resubmitted = sqlx::query_as::<_, FacilityApplication>(
            r#"
            UPDATE facility_applications
            SET status = 'pending', rejection_reason = NULL, reviewed_utc = NULL,
                submitted_utc = NOW()
            WHERE application_id = $1 AND status = 'rejected'
            RETURNING application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            "#,
        )
        .bind(application_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to resubmit application: {}", e))
        })?
        .ok_or_else(|| {
            AppError::Conflict(anyhow::anyhow!("Application was reviewed concurrently"))
        })?;

        APPLICATION_REVIEWS_TOTAL
            .with_label_values(&["resubmitted"])
            .inc();

        info!(application_id = %resubmitted.application_id, "Application resubmitted");

        Ok(resubmitted)
    }

    /// For each upload: best-effort delete of the prior blob, then store the
    /// replacement under a fresh key. Returns (kind, new path, content type).
    async fn replace_blobs(
        &self,
        application_id: Uuid,
        documents: &[DocumentUpload],
    ) -> Result<Vec<(DocumentKind, String, String)>, AppError> {
        let existing = self.db.get_documents(application_id).await?;
        let by_kind: HashMap<&str, &ApplicationDocument> =
            existing.iter().map(|d| (d.kind.as_str(), d)).collect();

        let mut stored = Vec::with_capacity(documents.len());
        for upload in documents {
            if let Some(prior) = by_kind.get(upload.kind.as_str()) {
                if let Err(e) = self.storage.delete(&prior.storage_path).await {
                    // Losing an orphan blob is acceptable; losing the
                    // replacement is not.
                    warn!(
                        application_id = %application_id,
                        kind = upload.kind.as_str(),
                        path = %prior.storage_path,
                        error = %e,
                        "Failed to delete prior document blob"
                    );
                }
            }

            let path = document_path(application_id, upload.kind);
            self.storage.upload(&path, upload.data.clone()).await?;
            stored.push((upload.kind, path, upload.content_type.clone()));
        }

        Ok(stored)
    }

    async fn require_application(
        &self,
        application_id: Uuid,
    ) -> Result<FacilityApplication, AppError> {
        self.db.get_application(application_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Application {} not found", application_id))
        })
    }
}

/// Versioned blob key: replacements never overwrite the blob a concurrent
/// reader may still be streaming.
fn document_path(application_id: Uuid, kind: DocumentKind) -> String {
    format!("applications/{}/{}-{}", application_id, kind.as_str(), Uuid::new_v4())
}

async fn upsert_document(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    application_id: Uuid,
    kind: DocumentKind,
    storage_path: &str,
    content_type: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO application_documents (document_id, application_id, kind, storage_path, content_type)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (application_id, kind)
        DO UPDATE SET storage_path = EXCLUDED.storage_path,
            content_type = EXCLUDED.content_type, uploaded_utc = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(kind.as_str())
    .bind(storage_path)
    .bind(content_type)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to upsert document: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_creates_a_new_application() {
        assert_eq!(register_outcome(None), RegisterOutcome::CreateNew);
    }

    #[test]
    fn reregistering_while_rejected_merges() {
        assert_eq!(
            register_outcome(Some(ApplicationStatus::Rejected)),
            RegisterOutcome::Merge
        );
    }

    #[test]
    fn pending_or_approved_applications_block_reregistration() {
        assert_eq!(
            register_outcome(Some(ApplicationStatus::Pending)),
            RegisterOutcome::AlreadyLive
        );
        assert_eq!(
            register_outcome(Some(ApplicationStatus::Approved)),
            RegisterOutcome::AlreadyLive
        );
    }

    #[test]
    fn short_rejection_reasons_are_refused() {
        assert!(validate_rejection_reason("too vague").is_err());
        assert!(validate_rejection_reason("         ").is_err());
        assert!(validate_rejection_reason("   padded   ").is_err());
    }

    #[test]
    fn substantive_rejection_reason_is_trimmed_and_accepted() {
        let reason = validate_rejection_reason("  DOH license has expired  ").unwrap();
        assert_eq!(reason, "DOH license has expired");
    }

    #[test]
    fn duplicate_upload_kinds_are_refused() {
        let upload = |kind| DocumentUpload {
            kind,
            content_type: "application/pdf".to_string(),
            data: vec![1],
        };
        assert!(ensure_unique_kinds(&[
            upload(DocumentKind::BusinessPermit),
            upload(DocumentKind::DohLicense),
        ])
        .is_ok());
        assert!(ensure_unique_kinds(&[
            upload(DocumentKind::BusinessPermit),
            upload(DocumentKind::BusinessPermit),
        ])
        .is_err());
    }
}
