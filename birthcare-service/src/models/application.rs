//! Facility application model: the review workflow record and its document
//! bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "approved" => ApplicationStatus::Approved,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Pending,
        }
    }

    /// Strict parse for the admin list filter.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// Compliance document kinds a facility application carries. The set is
/// closed; uploads naming anything else are rejected at ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    BusinessPermit,
    DohLicense,
    SanitaryPermit,
    MayorsPermit,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::BusinessPermit,
        DocumentKind::DohLicense,
        DocumentKind::SanitaryPermit,
        DocumentKind::MayorsPermit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::BusinessPermit => "business_permit",
            DocumentKind::DohLicense => "doh_license",
            DocumentKind::SanitaryPermit => "sanitary_permit",
            DocumentKind::MayorsPermit => "mayors_permit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business_permit" => Some(DocumentKind::BusinessPermit),
            "doh_license" => Some(DocumentKind::DohLicense),
            "sanitary_permit" => Some(DocumentKind::SanitaryPermit),
            "mayors_permit" => Some(DocumentKind::MayorsPermit),
            _ => None,
        }
    }
}

/// Facility application. One live row per owner: re-registration while
/// rejected merges into this record instead of inserting a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FacilityApplication {
    pub application_id: Uuid,
    pub facility_id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub submitted_utc: DateTime<Utc>,
    pub reviewed_utc: Option<DateTime<Utc>>,
}

/// Stored document row. `storage_path` is the blob key handed to the storage
/// backend; the row is upserted per (application, kind).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationDocument {
    pub document_id: Uuid,
    pub application_id: Uuid,
    pub kind: String,
    pub storage_path: String,
    pub content_type: String,
    pub uploaded_utc: DateTime<Utc>,
}

/// One decoded upload handed to the review service.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Input for registering (or re-registering) a facility application.
#[derive(Debug, Clone)]
pub struct RegisterApplication {
    pub owner_id: Uuid,
    pub facility_name: String,
    pub address: Option<String>,
    pub currency: String,
    pub documents: Vec<DocumentUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_kind_fails_parse() {
        assert_eq!(DocumentKind::parse("fire_cert"), None);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::from_string(status.as_str()), status);
        }
    }
}
