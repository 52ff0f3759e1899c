use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    CreatePaidAppointmentRequest, PaidAppointment, PaidAppointmentStatus, PaidAppointmentView,
    UpdatePaidAppointmentRequest,
};
use crate::services::billing::BillingService;

#[axum::debug_handler]
pub async fn create_paid_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreatePaidAppointmentRequest>,
) -> Result<(StatusCode, Json<PaidAppointment>), AppError> {
    let service = BillingService::new(&state);
    let appointment = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn find_all(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<PaidAppointmentView>>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.find_all().await?))
}

#[axum::debug_handler]
pub async fn my_paid_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PaidAppointmentView>>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.find_by_user_id(&user.id).await?))
}

#[axum::debug_handler]
pub async fn my_finished_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PaidAppointmentView>>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(
        service
            .find_by_user_id_and_status(&user.id, PaidAppointmentStatus::Finished)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn find_by_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<PaidAppointmentView>>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.find_by_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn find_by_doctor_and_status(
    State(state): State<Arc<AppConfig>>,
    Path((doctor_id, status)): Path<(Uuid, PaidAppointmentStatus)>,
) -> Result<Json<Vec<PaidAppointmentView>>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.find_by_doctor_and_status(doctor_id, status).await?))
}

#[axum::debug_handler]
pub async fn find_one(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaidAppointment>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.find_one(id).await?))
}

#[axum::debug_handler]
pub async fn update_paid_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaidAppointmentRequest>,
) -> Result<Json<PaidAppointment>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.update(id, request).await?))
}

#[axum::debug_handler]
pub async fn mark_as_finished(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaidAppointment>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.mark_as_finished(id).await?))
}

#[axum::debug_handler]
pub async fn mark_as_in_progress(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaidAppointment>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.mark_as_in_progress(id).await?))
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaidAppointment>, AppError> {
    let service = BillingService::new(&state);
    Ok(Json(service.cancel(id).await?))
}

#[axum::debug_handler]
pub async fn remove(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&state);
    service.remove(id).await?;
    Ok(Json(json!({ "success": true })))
}
