use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{
    CreatePaidAppointmentRequest, PaidAppointment, PaidAppointmentStatus, PaidAppointmentView,
    UpdatePaidAppointmentRequest,
};
use crate::services::proof::generate_completion_proof;

#[derive(Debug, Deserialize)]
struct DoctorRef {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct DoctorName {
    id: Uuid,
    name: String,
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct BillingService {
    supabase: SupabaseClient,
}

impl BillingService {
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

    /// Create a paid appointment. The doctor must exist; the row always
    /// starts IN_PROGRESS.
    pub async fn create(
        &self,
        request: CreatePaidAppointmentRequest,
    ) -> Result<PaidAppointment, AppError> {
        let doctor_id = self
            .resolve_doctor(&format!("id=eq.{}", request.doctor_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        let appointment_data = json!({
            "doctor_id": doctor_id,
            "patient_id": request.patient_id,
            "patient_name": request.patient_name,
            "scheduled_at": request.scheduled_at.map(|t| t.to_rfc3339()),
            "notes": request.notes,
            "status": PaidAppointmentStatus::InProgress,
            "amount": request.amount,
            "payment_date": request.payment_date.map(|t| t.to_rfc3339()),
            "payment_method": request.payment_method,
            "created_at": now,
            "updated_at": now,
        });

        let created: Vec<PaidAppointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/paid_appointments",
                Some(appointment_data),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create paid appointment".to_string()))
    }

    /// Every paid appointment, enriched with the owning doctor's name.
    pub async fn find_all(&self) -> Result<Vec<PaidAppointmentView>, AppError> {
        let appointments: Vec<PaidAppointment> = self
            .supabase
            .request(Method::GET, "/rest/v1/paid_appointments", None)
            .await
            .map_err(AppError::from)?;

        let mut doctor_ids: Vec<String> = appointments
            .iter()
            .map(|a| a.doctor_id.to_string())
            .collect();
        doctor_ids.sort();
        doctor_ids.dedup();

        let names: HashMap<Uuid, String> = if doctor_ids.is_empty() {
            HashMap::new()
        } else {
            let doctors: Vec<DoctorName> = self
                .supabase
                .request(
                    Method::GET,
                    &format!("/rest/v1/doctors?id=in.({})&select=id,name", doctor_ids.join(",")),
                    None,
                )
                .await
                .map_err(AppError::from)?;
            doctors.into_iter().map(|d| (d.id, d.name)).collect()
        };

        Ok(appointments
            .into_iter()
            .map(|appt| {
                let name = names.get(&appt.doctor_id).cloned();
                PaidAppointmentView::with_doctor_name(appt, name)
            })
            .collect())
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: Option<&PaidAppointmentStatus>,
    ) -> Result<Vec<PaidAppointmentView>, AppError> {
        let mut path = format!("/rest/v1/paid_appointments?doctor_id=eq.{}", doctor_id);
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", status));
        }

        let appointments: Vec<PaidAppointment> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(AppError::from)?;

        Ok(appointments.into_iter().map(PaidAppointmentView::from).collect())
    }

    pub async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<PaidAppointmentView>, AppError> {
        self.list_for_doctor(doctor_id, None).await
    }

    pub async fn find_by_doctor_and_status(
        &self,
        doctor_id: Uuid,
        status: PaidAppointmentStatus,
    ) -> Result<Vec<PaidAppointmentView>, AppError> {
        self.list_for_doctor(doctor_id, Some(&status)).await
    }

    /// Account→doctor indirection: no linked profile yields an empty
    /// sequence, not an error.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<PaidAppointmentView>, AppError> {
        debug!("Listing paid appointments for user: {}", user_id);

        match self.resolve_doctor(&format!("user_id=eq.{}", user_id)).await? {
            Some(doctor_id) => self.list_for_doctor(doctor_id, None).await,
            None => {
                debug!("No doctor profile linked to user: {}", user_id);
                Ok(Vec::new())
            }
        }
    }

    pub async fn find_by_user_id_and_status(
        &self,
        user_id: &str,
        status: PaidAppointmentStatus,
    ) -> Result<Vec<PaidAppointmentView>, AppError> {
        match self.resolve_doctor(&format!("user_id=eq.{}", user_id)).await? {
            Some(doctor_id) => self.list_for_doctor(doctor_id, Some(&status)).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn find_one(&self, id: Uuid) -> Result<PaidAppointment, AppError> {
        let appointments: Vec<PaidAppointment> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/paid_appointments?id=eq.{}", id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        appointments
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Paid appointment not found".to_string()))
    }

    /// Generic update: any field combination, including a status overwrite
    /// with no transition check (Finished back to InProgress is legal here).
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePaidAppointmentRequest,
    ) -> Result<PaidAppointment, AppError> {
        let mut update_data = serde_json::Map::new();
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        if let Some(amount) = request.amount {
            update_data.insert("amount".to_string(), json!(amount));
        }
        if let Some(payment_date) = request.payment_date {
            update_data.insert("payment_date".to_string(), json!(payment_date.to_rfc3339()));
        }
        if let Some(payment_method) = request.payment_method {
            update_data.insert("payment_method".to_string(), json!(payment_method));
        }
        update_data.insert("updated_at".to_string(), json!(chrono::Utc::now().to_rfc3339()));

        self.apply_patch(id, Value::Object(update_data)).await
    }

    /// Finish the appointment: set FINISHED and persist a freshly generated
    /// completion proof. Re-finishing overwrites the prior proof; the last
    /// writer wins.
    pub async fn mark_as_finished(&self, id: Uuid) -> Result<PaidAppointment, AppError> {
        let appointment = self.find_one(id).await?;

        let proof = generate_completion_proof(&appointment)?;

        debug!("Finishing paid appointment {} with new completion proof", id);

        self.apply_patch(
            id,
            json!({
                "status": PaidAppointmentStatus::Finished,
                "qr_code": proof,
                "updated_at": chrono::Utc::now().to_rfc3339(),
            }),
        )
        .await
    }

    pub async fn mark_as_in_progress(&self, id: Uuid) -> Result<PaidAppointment, AppError> {
        self.set_status(id, PaidAppointmentStatus::InProgress).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<PaidAppointment, AppError> {
        self.set_status(id, PaidAppointmentStatus::Cancelled).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: PaidAppointmentStatus,
    ) -> Result<PaidAppointment, AppError> {
        debug!("Setting paid appointment {} status to {}", id, status);

        self.apply_patch(
            id,
            json!({
                "status": status,
                "updated_at": chrono::Utc::now().to_rfc3339(),
            }),
        )
        .await
    }

    async fn apply_patch(&self, id: Uuid, body: Value) -> Result<PaidAppointment, AppError> {
        let updated: Vec<PaidAppointment> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/paid_appointments?id=eq.{}", id),
                Some(body),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Paid appointment not found".to_string()))
    }

    /// Hard delete. NotFound when no row was affected.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let deleted: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &format!("/rest/v1/paid_appointments?id=eq.{}", id),
                None,
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        if deleted.is_empty() {
            return Err(AppError::NotFound("Paid appointment not found".to_string()));
        }

        Ok(())
    }
}
