use std::sync::{Arc, OnceLock};

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{CreateMedicalReportRequest, MedicalReport, ReportImage};
use crate::services::report::ReportService;

const MAX_IMAGES: usize = 10;
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

fn image_extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(jpg|jpeg|png|gif)$").expect("valid extension pattern"))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(CreateMedicalReportRequest, Vec<ReportImage>), AppError> {
    let mut request = CreateMedicalReportRequest::default();
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let extension = image_extension_pattern()
                .captures(&filename)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| AppError::BadRequest("Only image files are allowed!".to_string()))?;

            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            if bytes.len() > MAX_IMAGE_BYTES {
                return Err(AppError::BadRequest(
                    "Image attachments are limited to 5 MB each".to_string(),
                ));
            }
            if images.len() == MAX_IMAGES {
                return Err(AppError::BadRequest(
                    "At most 10 image attachments are allowed".to_string(),
                ));
            }

            images.push(ReportImage {
                content_type: format!("image/{}", extension),
                extension,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "appointment_id" => request.appointment_id = value,
            "patient_id" => request.patient_id = value,
            "title" => request.title = value,
            "findings" => request.findings = Some(value),
            "recommendations" => request.recommendations = Some(value),
            "notes" => request.notes = Some(value),
            _ => {}
        }
    }

    if request.title.is_empty() {
        return Err(AppError::ValidationError("title must not be empty".to_string()));
    }
    if request.appointment_id.is_empty() || request.patient_id.is_empty() {
        return Err(AppError::ValidationError(
            "appointment_id and patient_id are required".to_string(),
        ));
    }

    Ok((request, images))
}

#[axum::debug_handler]
pub async fn create_report(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MedicalReport>), AppError> {
    debug!("Creating medical report authored by user: {}", user.id);

    let (request, images) = read_multipart(multipart).await?;

    let service = ReportService::new(&state);
    let report = service.create_report(request, &user.id, images).await?;

    Ok((StatusCode::CREATED, Json(report)))
}

#[axum::debug_handler]
pub async fn find_by_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<MedicalReport>>, AppError> {
    let service = ReportService::new(&state);
    Ok(Json(service.find_by_patient(&patient_id).await?))
}

#[axum::debug_handler]
pub async fn find_by_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Vec<MedicalReport>>, AppError> {
    let service = ReportService::new(&state);
    Ok(Json(service.find_by_appointment(&appointment_id).await?))
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalReport>, AppError> {
    let service = ReportService::new(&state);
    Ok(Json(service.find_one(id).await?))
}
