use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    CreateDoctorRequest, Doctor, TimeSlotsResponse, UpdateDoctorRequest, UpdateTimeSlotsRequest,
};
use crate::services::doctor::DoctorService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.create_doctor(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.find_all().await?))
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.find_one(id).await?))
}

#[axum::debug_handler]
pub async fn find_by_user_id(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.find_by_user_id(&user_id.to_string()).await?))
}

#[axum::debug_handler]
pub async fn get_time_slots(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlotsResponse>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.find_one(id).await?;
    Ok(Json(TimeSlotsResponse::from_doctor(&doctor)))
}

#[axum::debug_handler]
pub async fn get_my_time_slots(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TimeSlotsResponse>, AppError> {
    debug!("Fetching time slots for authenticated user: {}", user.id);

    let service = DoctorService::new(&state);
    let doctor = service.find_by_user_id(&user.id).await?;
    Ok(Json(TimeSlotsResponse::from_doctor(&doctor)))
}

#[axum::debug_handler]
pub async fn update_my_time_slots(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateTimeSlotsRequest>,
) -> Result<Json<TimeSlotsResponse>, AppError> {
    debug!("Updating time slots for authenticated user: {}", user.id);

    let service = DoctorService::new(&state);
    let doctor = service
        .update_time_slots(&user.id, request.available_time_slots)
        .await?;
    Ok(Json(TimeSlotsResponse::from_doctor(&doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let service = DoctorService::new(&state);
    Ok(Json(service.update_doctor(id, request).await?))
}

#[axum::debug_handler]
pub async fn remove_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    service.remove(id).await?;
    Ok(Json(json!({ "success": true })))
}
