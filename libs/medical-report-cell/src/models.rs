use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Doctor-authored report tied to a patient and appointment. All three ids
/// are soft references: the archive validates nothing against other stores,
/// and rows are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: Uuid,
    pub appointment_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub title: String,
    pub findings: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata half of the multipart creation request; the other half is the
/// image attachments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMedicalReportRequest {
    pub appointment_id: String,
    pub patient_id: String,
    pub title: String,
    pub findings: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
}

/// An accepted image attachment, already extension-checked and size-checked.
#[derive(Debug, Clone)]
pub struct ReportImage {
    pub extension: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
