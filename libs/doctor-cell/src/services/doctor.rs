use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, Doctor, UpdateDoctorRequest};

/// Account projection used for the user→doctor linkage checks; the
/// credential hash is deliberately not selected.
#[derive(Debug, Deserialize)]
struct AccountRef {
    id: Uuid,
    email: String,
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create a doctor profile for an existing account. The profile email is
    /// taken from the account, not the request.
    pub async fn create_doctor(
        &self,
        user_id: Uuid,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, AppError> {
        debug!("Creating doctor profile for user: {}", user_id);

        let users: Vec<AccountRef> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/users?id=eq.{}&select=id,email", user_id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let doctor_data = json!({
            "name": request.name,
            "email": user.email,
            "specialization": request.specialization,
            "contact_number": request.contact_number,
            "nic": request.nic,
            "gender": request.gender,
            "available_time_slots": request.available_time_slots,
            "user_id": user.id,
        });

        let created: Vec<Doctor> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/doctors",
                Some(doctor_data),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create doctor profile".to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<Doctor>, AppError> {
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, "/rest/v1/doctors", None)
            .await
            .map_err(AppError::from)?;

        Ok(doctors)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Doctor, AppError> {
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &format!("/rest/v1/doctors?id=eq.{}", id), None)
            .await
            .map_err(AppError::from)?;

        doctors
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    /// Resolve the doctor profile linked to a login account.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Doctor, AppError> {
        let doctors: Vec<Doctor> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/doctors?user_id=eq.{}", user_id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        doctors
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor profile not found for this user".to_string()))
    }

    pub async fn update_doctor(
        &self,
        id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, AppError> {
        debug!("Updating doctor profile: {}", id);

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(contact_number) = request.contact_number {
            update_data.insert("contact_number".to_string(), json!(contact_number));
        }
        if let Some(nic) = request.nic {
            update_data.insert("nic".to_string(), json!(nic));
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(slots) = request.available_time_slots {
            update_data.insert("available_time_slots".to_string(), json!(slots));
        }

        let updated: Vec<Doctor> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/doctors?id=eq.{}", id),
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    /// Replace the whole available-time-slot list of the caller's profile.
    pub async fn update_time_slots(
        &self,
        user_id: &str,
        time_slots: Vec<String>,
    ) -> Result<Doctor, AppError> {
        let doctor = self.find_by_user_id(user_id).await?;

        let updated: Vec<Doctor> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/doctors?id=eq.{}", doctor.id),
                Some(json!({ "available_time_slots": time_slots })),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        debug!("Deleting doctor profile: {}", id);

        let _: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &format!("/rest/v1/doctors?id=eq.{}", id),
                None,
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
