use std::collections::HashMap;

use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{Patient, PlaceholderPatient, RosterEntry};

#[derive(Debug, Deserialize)]
struct DoctorRef {
    id: Uuid,
}

/// Patient reference captured on an appointment row.
#[derive(Debug, Deserialize)]
struct PatientStub {
    patient_id: String,
    patient_name: Option<String>,
}

pub struct RosterService {
    supabase: SupabaseClient,
}

impl RosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Assemble the roster of patients a doctor has seen: the union of
    /// distinct patient ids across both appointment tables, each resolved to
    /// a formal record or synthesized as a placeholder. Exactly one entry per
    /// distinct id; ordering is unspecified.
    pub async fn find_patients_by_doctor(&self, user_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        debug!("Assembling patient roster for user: {}", user_id);

        let doctors: Vec<DoctorRef> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/doctors?user_id=eq.{}&select=id", user_id),
                None,
            )
            .await
            .map_err(AppError::from)?;

        let doctor = doctors
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let free: Vec<PatientStub> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/appointments?doctor_id=eq.{}&select=patient_id,patient_name",
                    doctor.id
                ),
                None,
            )
            .await
            .map_err(AppError::from)?;

        let paid: Vec<PatientStub> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/paid_appointments?doctor_id=eq.{}&select=patient_id,patient_name",
                    doctor.id
                ),
                None,
            )
            .await
            .map_err(AppError::from)?;

        // Union, not concatenation: duplicates collapse by id, first
        // captured name wins.
        let mut referenced: HashMap<String, Option<String>> = HashMap::new();
        for stub in free.into_iter().chain(paid) {
            referenced.entry(stub.patient_id).or_insert(stub.patient_name);
        }

        let mut roster = Vec::with_capacity(referenced.len());
        for (patient_id, patient_name) in referenced {
            let resolved: Vec<Patient> = self
                .supabase
                .request(
                    Method::GET,
                    &format!("/rest/v1/patients?id=eq.{}", patient_id),
                    None,
                )
                .await
                .map_err(AppError::from)?;

            match resolved.into_iter().next() {
                Some(patient) => roster.push(RosterEntry::Registered(patient)),
                None => {
                    debug!("No patient record for id {}, synthesizing placeholder", patient_id);
                    roster.push(RosterEntry::Placeholder(PlaceholderPatient::from_appointment(
                        patient_id,
                        patient_name,
                    )));
                }
            }
        }

        debug!("Roster holds {} unique patients", roster.len());
        Ok(roster)
    }
}
