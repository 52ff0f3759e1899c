use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{Appointment, AppointmentStatus, AppointmentView, CreateAppointmentRequest};

#[derive(Debug, Deserialize)]
struct DoctorRef {
    id: Uuid,
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct SchedulingService {
    supabase: SupabaseClient,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn resolve_doctor(&self, query: &str) -> Result<Option<Uuid>, AppError> {
        let doctors: Vec<DoctorRef> = self
            .supabase
            .request(Method::GET, &format!("/rest/v1/doctors?{}&select=id", query), None)
            .await
            .map_err(AppError::from)?;

        Ok(doctors.into_iter().next().map(|d| d.id))
    }

    /// Book a free appointment. The doctor must exist; the row always starts
    /// Pending regardless of anything the caller supplied. No ownership check
    /// is made on the caller.
    pub async fn create(&self, request: CreateAppointmentRequest) -> Result<Appointment, AppError> {
        let doctor_id = self
            .resolve_doctor(&format!("id=eq.{}", request.doctor_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let appointment_data = json!({
            "doctor_id": doctor_id,
            "patient_id": request.patient_id,
            "patient_name": request.patient_name,
            "scheduled_at": request.scheduled_at.map(|t| t.to_rfc3339()),
            "notes": request.notes,
            "status": AppointmentStatus::Pending,
        });

        let created: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(appointment_data),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create appointment".to_string()))
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<AppointmentView>, AppError> {
        let appointments: Vec<Appointment> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/appointments?doctor_id=eq.{}", doctor_id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        Ok(appointments.into_iter().map(AppointmentView::from).collect())
    }

    /// List a doctor's appointments. A non-existent doctor yields an empty
    /// sequence, not an error.
    pub async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<AppointmentView>, AppError> {
        debug!("Listing appointments for doctor: {}", doctor_id);

        match self.resolve_doctor(&format!("id=eq.{}", doctor_id)).await? {
            Some(id) => self.list_for_doctor(id).await,
            None => {
                debug!("Doctor not found for id: {}", doctor_id);
                Ok(Vec::new())
            }
        }
    }

    /// The account→doctor indirection: resolve the caller's profile first,
    /// then list as that doctor. No linked profile yields an empty sequence.
    pub async fn find_by_authenticated_doctor(
        &self,
        user_id: &str,
    ) -> Result<Vec<AppointmentView>, AppError> {
        debug!("Listing appointments for authenticated user: {}", user_id);

        match self.resolve_doctor(&format!("user_id=eq.{}", user_id)).await? {
            Some(doctor_id) => self.list_for_doctor(doctor_id).await,
            None => {
                debug!("No doctor profile linked to user: {}", user_id);
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the status unconditionally. There is no transition guard;
    /// any target status is accepted at any time.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        debug!("Setting appointment {} status to {}", id, status);

        let updated: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/appointments?id=eq.{}", id),
                Some(json!({ "status": status })),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
    }
}
