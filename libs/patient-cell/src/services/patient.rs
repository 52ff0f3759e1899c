use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Patient>, AppError> {
        let patients: Vec<Patient> = self
            .supabase
            .request(Method::GET, "/rest/v1/patients", None)
            .await
            .map_err(AppError::from)?;

        Ok(patients)
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, AppError> {
        debug!("Creating patient record for: {}", request.email);

        let patient_data = json!({
            "name": request.name,
            "email": request.email,
            "contact_number": request.contact_number,
            "address": request.address,
            "date_of_birth": request.date_of_birth,
            "gender": request.gender,
        });

        let created: Vec<Patient> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/patients",
                Some(patient_data),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create patient record".to_string()))
    }

    pub async fn find_one(&self, id: &str) -> Result<Patient, AppError> {
        let patients: Vec<Patient> = self
            .supabase
            .request(Method::GET, &format!("/rest/v1/patients?id=eq.{}", id), None)
            .await
            .map_err(AppError::from)?;

        patients
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn update(&self, id: &str, request: UpdatePatientRequest) -> Result<Patient, AppError> {
        debug!("Updating patient record: {}", id);

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(contact_number) = request.contact_number {
            update_data.insert("contact_number".to_string(), json!(contact_number));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }

        let updated: Vec<Patient> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/patients?id=eq.{}", id),
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await
            .map_err(AppError::from)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }
}
