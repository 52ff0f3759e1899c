use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use qrcode_generator::QrCodeEcc;
use serde_json::json;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::PaidAppointment;

/// Build the completion proof: a scannable QR image encoding a uniquely
/// seeded payload that ties the appointment, patient and doctor to the
/// completion instant. Each invocation embeds a fresh nonce, so finishing
/// again overwrites the prior artifact with a new one.
pub fn generate_completion_proof(appointment: &PaidAppointment) -> Result<String, AppError> {
    let payload = json!({
        "appointment_id": appointment.id,
        "patient_id": appointment.patient_id,
        "patient_name": appointment.patient_name,
        "doctor_id": appointment.doctor_id,
        "finished_at": Utc::now().to_rfc3339(),
        "unique_code": Uuid::new_v4(),
    });

    let png = qrcode_generator::to_png_to_vec(payload.to_string(), QrCodeEcc::Medium, 256)
        .map_err(|e| AppError::Internal(format!("failed to render completion proof: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}
