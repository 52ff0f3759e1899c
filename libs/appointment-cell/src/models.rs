use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_utils::time::to_minute_string;

/// Free-appointment lifecycle. Pending/Accepted/Rejected is the canonical
/// vocabulary; a superseded Confirmed/Cancelled variant existed historically
/// and is not parsed. No state is enforced as terminal: status updates
/// overwrite unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "Pending"),
            AppointmentStatus::Accepted => write!(f, "Accepted"),
            AppointmentStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub status: AppointmentStatus,
    pub doctor_id: Uuid,
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Booking request. There is deliberately no status field: every new
/// appointment starts Pending no matter what the caller sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// List projection: `scheduled_at` is rendered at minute precision, or as an
/// empty string when unset. Observable API behavior, kept exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub status: AppointmentStatus,
    pub doctor_id: Uuid,
    pub scheduled_at: String,
    pub notes: Option<String>,
    pub patient_id: String,
    pub patient_name: Option<String>,
}

impl From<Appointment> for AppointmentView {
    fn from(appt: Appointment) -> Self {
        Self {
            id: appt.id,
            status: appt.status,
            doctor_id: appt.doctor_id,
            scheduled_at: to_minute_string(appt.scheduled_at),
            notes: appt.notes,
            patient_id: appt.patient_id,
            patient_name: appt.patient_name,
        }
    }
}
