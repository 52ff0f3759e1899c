use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A clinical-staff profile, optionally linked 1:1 to a login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub nic: Option<String>,
    pub gender: Option<String>,
    pub available_time_slots: Option<Vec<String>>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub nic: Option<String>,
    pub gender: Option<String>,
    pub available_time_slots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub nic: Option<String>,
    pub gender: Option<String>,
    pub available_time_slots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeSlotsRequest {
    pub available_time_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotsResponse {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub available_time_slots: Vec<String>,
}

impl TimeSlotsResponse {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            available_time_slots: doctor.available_time_slots.clone().unwrap_or_default(),
        }
    }
}
