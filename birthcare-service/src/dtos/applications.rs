use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ApplicationDocument, FacilityApplication};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterApplicationRequest {
    #[validate(length(min = 1, max = 200, message = "Facility name is required"))]
    pub facility_name: String,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    /// ISO 4217 code; defaults to PHP.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    #[validate(length(min = 1, message = "At least one document is required"), nested)]
    pub documents: Vec<DocumentUploadRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DocumentUploadRequest {
    /// One of `business_permit`, `doh_license`, `sanitary_permit`,
    /// `mayors_permit`.
    #[validate(length(min = 1, message = "Document kind is required"))]
    pub kind: String,

    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,

    /// Base64-encoded file body.
    #[validate(length(min = 1, message = "Document body is required"))]
    pub data: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentsRequest {
    #[validate(length(min = 1, message = "At least one document is required"), nested)]
    pub documents: Vec<DocumentUploadRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectApplicationRequest {
    #[validate(length(min = 10, message = "Rejection reason must be at least 10 characters"))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    /// Filter: `pending`, `approved` or `rejected`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application: FacilityApplication,
    pub documents: Vec<ApplicationDocument>,
}
