use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, Patient, RosterEntry, UpdatePatientRequest};
use crate::services::patient::PatientService;
use crate::services::roster::RosterService;

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let service = PatientService::new(&state);
    Ok(Json(service.find_all().await?))
}

#[axum::debug_handler]
pub async fn my_patients(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    let service = RosterService::new(&state);
    Ok(Json(service.find_patients_by_doctor(&user.id).await?))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let service = PatientService::new(&state);
    let patient = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);
    Ok(Json(service.find_one(&id).await?))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);
    Ok(Json(service.update(&id, request).await?))
}
