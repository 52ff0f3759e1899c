use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreateMedicalReportRequest, MedicalReport, ReportImage};

const REPORT_BUCKET: &str = "medical-reports";

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct ReportService {
    supabase: SupabaseClient,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Store the attachments under random names, then insert the report row
    /// carrying their public URLs. Pure insert: appointment and patient ids
    /// are not validated against other stores.
    pub async fn create_report(
        &self,
        request: CreateMedicalReportRequest,
        doctor_id: &str,
        images: Vec<ReportImage>,
    ) -> Result<MedicalReport, AppError> {
        debug!("Creating medical report '{}' with {} attachments", request.title, images.len());

        let mut image_urls = Vec::with_capacity(images.len());
        for image in images {
            let object_path = format!("{}.{}", Uuid::new_v4(), image.extension);
            self.supabase
                .upload_object(REPORT_BUCKET, &object_path, image.bytes, &image.content_type)
                .await
                .map_err(AppError::from)?;
            image_urls.push(self.supabase.get_public_url(REPORT_BUCKET, &object_path));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let report_data = json!({
            "appointment_id": request.appointment_id,
            "patient_id": request.patient_id,
            "doctor_id": doctor_id,
            "title": request.title,
            "findings": request.findings,
            "recommendations": request.recommendations,
            "notes": request.notes,
            "image_urls": image_urls,
            "created_at": now,
            "updated_at": now,
        });

        let created: Vec<MedicalReport> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/medical_reports",
                Some(report_data),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create medical report".to_string()))
    }

    pub async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<MedicalReport>, AppError> {
        let reports: Vec<MedicalReport> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/medical_reports?patient_id=eq.{}&order=created_at.desc",
                    patient_id
                ),
                None,
            )
            .await
            .map_err(AppError::from)?;

        Ok(reports)
    }

    pub async fn find_by_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Vec<MedicalReport>, AppError> {
        let reports: Vec<MedicalReport> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/medical_reports?appointment_id=eq.{}&order=created_at.desc",
                    appointment_id
                ),
                None,
            )
            .await
            .map_err(AppError::from)?;

        Ok(reports)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<MedicalReport, AppError> {
        let reports: Vec<MedicalReport> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/medical_reports?id=eq.{}", id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        reports
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Medical report not found".to_string()))
    }
}
