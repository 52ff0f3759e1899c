use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_utils::time::to_minute_string;

/// Paid-appointment lifecycle. All three states are directly reachable via
/// dedicated operations and the generic update applies any target without a
/// transition check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaidAppointmentStatus {
    InProgress,
    Finished,
    Cancelled,
}

impl fmt::Display for PaidAppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaidAppointmentStatus::InProgress => write!(f, "IN_PROGRESS"),
            PaidAppointmentStatus::Finished => write!(f, "FINISHED"),
            PaidAppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaidAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: PaidAppointmentStatus,
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    /// Completion proof artifact; set only by the finish operation.
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation request. No status field: every new paid appointment starts
/// IN_PROGRESS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaidAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaidAppointmentRequest {
    pub status: Option<PaidAppointmentStatus>,
    pub notes: Option<String>,
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
}

/// List projection: both timestamps render at minute precision, empty string
/// when unset. `doctor_name` is filled only by the unfiltered listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaidAppointmentView {
    pub id: Uuid,
    pub status: PaidAppointmentStatus,
    pub doctor_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    pub scheduled_at: String,
    pub notes: Option<String>,
    pub patient_id: String,
    pub patient_name: String,
    pub amount: Option<f64>,
    pub payment_date: String,
    pub payment_method: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaidAppointmentView {
    pub fn with_doctor_name(appt: PaidAppointment, doctor_name: Option<String>) -> Self {
        Self {
            id: appt.id,
            status: appt.status,
            doctor_id: appt.doctor_id,
            doctor_name,
            scheduled_at: to_minute_string(appt.scheduled_at),
            notes: appt.notes,
            patient_id: appt.patient_id,
            patient_name: appt.patient_name,
            amount: appt.amount,
            payment_date: to_minute_string(appt.payment_date),
            payment_method: appt.payment_method,
            qr_code: appt.qr_code,
            created_at: appt.created_at,
            updated_at: appt.updated_at,
        }
    }
}

impl From<PaidAppointment> for PaidAppointmentView {
    fn from(appt: PaidAppointment) -> Self {
        Self::with_doctor_name(appt, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn paid_appointment() -> PaidAppointment {
        PaidAppointment {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            patient_id: "p1".to_string(),
            patient_name: "Pat Doe".to_string(),
            scheduled_at: Some(Utc.with_ymd_and_hms(2025, 2, 1, 8, 45, 10).unwrap()),
            notes: None,
            status: PaidAppointmentStatus::InProgress,
            amount: Some(45.0),
            payment_date: None,
            payment_method: Some("card".to_string()),
            qr_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn view_formats_both_timestamps() {
        let view = PaidAppointmentView::from(paid_appointment());
        assert_eq!(view.scheduled_at, "2025-02-01 08:45");
        assert_eq!(view.payment_date, "");
    }

    #[test]
    fn status_uses_screaming_snake_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaidAppointmentStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: PaidAppointmentStatus = serde_json::from_str("\"FINISHED\"").unwrap();
        assert_eq!(parsed, PaidAppointmentStatus::Finished);
    }
}
