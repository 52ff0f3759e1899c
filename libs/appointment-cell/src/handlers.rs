use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentStatus, AppointmentView, CreateAppointmentRequest, UpdateStatusRequest,
};
use crate::services::scheduling::SchedulingService;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let service = SchedulingService::new(&state);
    let appointment = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn find_by_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let service = SchedulingService::new(&state);
    Ok(Json(service.find_by_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn my_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AppointmentView>>, AppError> {
    let service = SchedulingService::new(&state);
    Ok(Json(service.find_by_authenticated_doctor(&user.id).await?))
}

#[axum::debug_handler]
pub async fn accept_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = SchedulingService::new(&state);
    Ok(Json(service.update_status(id, AppointmentStatus::Accepted).await?))
}

#[axum::debug_handler]
pub async fn reject_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = SchedulingService::new(&state);
    Ok(Json(service.update_status(id, AppointmentStatus::Rejected).await?))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = SchedulingService::new(&state);
    Ok(Json(service.update_status(id, request.status).await?))
}
